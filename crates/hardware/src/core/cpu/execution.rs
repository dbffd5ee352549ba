//! Main Execution Loop.
//!
//! This module implements one clock cycle of the CPU. It performs the following:
//! 1. **Snapshot:** Every stage reads the latches as they were at the clock edge.
//! 2. **Stage Evaluation:** Writeback, Memory, Execute, hazard detection, Decode
//!    and Fetch are evaluated against that snapshot.
//! 3. **Latching:** The new latch contents, PC and register write are committed
//!    together, with flushes taking priority over stalls.
//!
//! A trap or a SYSTEM instruction reaching Writeback ends the cycle before any
//! younger stage runs, so no younger instruction touches memory or registers.

use tracing::debug;

use super::Cpu;
use crate::common::reg::RegWrite;
use crate::core::pipeline::hazards::{self, HazardControl};
use crate::core::pipeline::latches::{IdExEntry, IfIdEntry, MemWbEntry, PipelineLatches};
use crate::core::pipeline::stages::{
    Commit, ExecuteOutcome, decode_stage, execute_stage, fetch_stage, mem_stage, wb_stage,
};
use crate::soc::memory::MemRequest;
use crate::soc::traits::{DataMemory, InstructionMemory};

/// Everything that happened in one cycle, for statistics and probing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Latch contents at the start of the cycle.
    pub before: PipelineLatches,
    /// Instruction fetched this cycle; `None` when the cycle ended at Writeback.
    pub fetched: Option<IfIdEntry>,
    /// Decode output (computed even when a stall discards it).
    pub decoded: Option<IdExEntry>,
    /// Execute output.
    pub executed: Option<ExecuteOutcome>,
    /// Request the Memory stage issued.
    pub mem_request: Option<MemRequest>,
    /// Register write committed this cycle.
    pub write: RegWrite,
    /// The entry that left Writeback, and how it committed.
    pub committed: Option<(MemWbEntry, Commit)>,
    /// Stall and flush decision.
    pub hazard: HazardControl,
    /// Valid wrong-path instructions discarded by a flush.
    pub squashed: u32,
}

impl CycleReport {
    /// Whether the committing instruction ends the simulation.
    pub fn halts(&self) -> bool {
        matches!(
            self.committed,
            Some((_, Commit::Trap(_) | Commit::System(_)))
        )
    }
}

impl<I: InstructionMemory, D: DataMemory> Cpu<I, D> {
    /// Advances the pipeline by one clock cycle.
    ///
    /// When the instruction in Writeback carries a trap or is ECALL/EBREAK,
    /// the cycle stops there: no register is written, the latches and PC are
    /// left untouched, and the report's `committed` field says why.
    pub fn cycle(&mut self) -> CycleReport {
        let before = self.latches;
        let mut report = CycleReport {
            before,
            ..Default::default()
        };

        if let Some(wb) = before.mem_wb {
            let (write, commit) = wb_stage(&wb);
            report.write = write;
            report.committed = Some((wb, commit));
            if report.halts() {
                return report;
            }
        }
        let write = report.write;

        let mut next = PipelineLatches::default();

        if let Some(mem) = before.ex_mem {
            let (entry, req) = mem_stage(&mem, &mut self.dmem);
            next.mem_wb = Some(entry);
            report.mem_request = req;
        }

        let mut redirect = None;
        if let Some(ex) = before.id_ex {
            let outcome = execute_stage(
                &ex,
                before.ex_mem.as_ref(),
                before.mem_wb.as_ref(),
                self.forwarding,
            );
            next.ex_mem = Some(outcome.entry);
            redirect = outcome.redirect;
            report.executed = Some(outcome);
        }

        let stall = if self.forwarding {
            hazards::need_stall_load_use(before.id_ex.as_ref(), before.if_id.as_ref())
        } else {
            hazards::need_stall_interlock(
                before.if_id.as_ref(),
                before.id_ex.as_ref(),
                before.ex_mem.as_ref(),
            )
        };
        let hazard = hazards::arbitrate(stall, redirect);
        report.hazard = hazard;

        report.decoded = before
            .if_id
            .map(|entry| decode_stage(&entry, &self.regs, write));
        let fetched = fetch_stage(&mut self.imem, self.pc);
        report.fetched = Some(fetched);

        self.regs.write(write.rd, write.data, write.enable);

        match redirect {
            Some(target) if hazard.flush => {
                report.squashed = u32::from(report.decoded.is_some()) + 1;
                debug!(
                    target = format_args!("{target:#010x}"),
                    squashed = report.squashed,
                    "flush"
                );
                self.pc = target;
            }
            _ if hazard.stall => {
                debug!(pc = format_args!("{:#010x}", self.pc), "stall");
                next.if_id = before.if_id;
            }
            _ => {
                next.id_ex = report.decoded;
                next.if_id = Some(fetched);
                self.pc = self.predictor.next_pc(self.pc);
            }
        }

        self.latches = next;
        report
    }
}
