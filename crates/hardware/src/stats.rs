//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the pipeline. It provides:
//! 1. **Cycle and CPI:** Total cycles, retired instructions, and derived metrics.
//! 2. **Instruction mix:** Retired counts by class (ALU, load, store, branch, jump, system).
//! 3. **Hazards:** Load-use and interlock stalls, flushes and squashed instructions.
//! 4. **Forwarding:** Operands taken from EX/MEM and from MEM/WB.

use std::fmt;
use std::time::Instant;

use serde::Serialize;

use crate::core::cpu::CycleReport;
use crate::core::pipeline::hazards::ForwardSrc;
use crate::core::pipeline::signals::InstClass;
use crate::core::pipeline::stages::Commit;

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug, Serialize)]
pub struct SimStats {
    #[serde(skip)]
    start_time: Instant,
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions committed (retired).
    pub instructions_retired: u64,

    /// Count of ALU instructions retired (including LUI, AUIPC, FENCE).
    pub inst_alu: u64,
    /// Count of load instructions retired.
    pub inst_load: u64,
    /// Count of store instructions retired.
    pub inst_store: u64,
    /// Count of conditional branches retired.
    pub inst_branch: u64,
    /// Count of JAL/JALR retired.
    pub inst_jump: u64,
    /// Count of ECALL/EBREAK retired.
    pub inst_system: u64,

    /// Cycles Decode was held by a data hazard.
    pub stalls_data: u64,
    /// Cycles a taken branch or jump flushed the front of the pipeline.
    pub flushes: u64,
    /// Wrong-path instructions discarded by flushes.
    pub squashed: u64,

    /// Operands forwarded from the EX/MEM latch.
    pub forwards_ex_mem: u64,
    /// Operands forwarded from the MEM/WB latch.
    pub forwards_mem_wb: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            inst_alu: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            inst_jump: 0,
            inst_system: 0,
            stalls_data: 0,
            flushes: 0,
            squashed: 0,
            forwards_ex_mem: 0,
            forwards_mem_wb: 0,
        }
    }
}

impl SimStats {
    /// Accumulates one cycle's report.
    pub fn record(&mut self, report: &CycleReport) {
        self.cycles += 1;

        let retired = report
            .committed
            .filter(|(_, commit)| !matches!(commit, Commit::Trap(_)));
        if let Some((entry, _)) = retired {
            self.instructions_retired += 1;
            match entry.ctrl.class() {
                InstClass::Alu => self.inst_alu += 1,
                InstClass::Load => self.inst_load += 1,
                InstClass::Store => self.inst_store += 1,
                InstClass::Branch => self.inst_branch += 1,
                InstClass::Jump => self.inst_jump += 1,
                InstClass::System => self.inst_system += 1,
            }
        }

        if report.hazard.stall {
            self.stalls_data += 1;
        }
        if report.hazard.flush {
            self.flushes += 1;
            self.squashed += u64::from(report.squashed);
        }

        if let Some(ex) = &report.executed {
            for src in [ex.operands.rs1_src, ex.operands.rs2_src] {
                match src {
                    ForwardSrc::ExMem => self.forwards_ex_mem += 1,
                    ForwardSrc::MemWb => self.forwards_mem_wb += 1,
                    ForwardSrc::RegFile => {}
                }
            }
        }
    }

    /// Cycles per retired instruction; 0 before anything retires.
    pub fn cpi(&self) -> f64 {
        if self.instructions_retired == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions_retired as f64
        }
    }

    /// Serialises the counters (and CPI) as a JSON object.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            let _ = obj.insert("cpi".into(), serde_json::json!(self.cpi()));
        }
        serde_json::to_string_pretty(&value)
    }

    /// Prints all statistics to stdout.
    pub fn print(&self) {
        println!("{self}");
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let instr = self.instructions_retired.max(1) as f64;
        let pct = |n: u64| (n as f64 / instr) * 100.0;

        writeln!(f, "==========================================================")?;
        writeln!(f, "RV32I PIPELINE SIMULATION STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "host_seconds             {seconds:.4} s")?;
        writeln!(f, "sim_cycles               {}", self.cycles)?;
        writeln!(f, "sim_insts                {}", self.instructions_retired)?;
        writeln!(f, "sim_cpi                  {:.4}", self.cpi())?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "INSTRUCTION MIX")?;
        for (name, n) in [
            ("op.alu", self.inst_alu),
            ("op.load", self.inst_load),
            ("op.store", self.inst_store),
            ("op.branch", self.inst_branch),
            ("op.jump", self.inst_jump),
            ("op.system", self.inst_system),
        ] {
            writeln!(f, "  {name:<22} {n} ({:.2}%)", pct(n))?;
        }
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "HAZARDS")?;
        writeln!(f, "  stalls.data            {}", self.stalls_data)?;
        writeln!(f, "  flushes                {}", self.flushes)?;
        writeln!(f, "  squashed               {}", self.squashed)?;
        writeln!(f, "  forward.ex_mem         {}", self.forwards_ex_mem)?;
        writeln!(f, "  forward.mem_wb         {}", self.forwards_mem_wb)?;
        write!(f, "==========================================================")
    }
}
