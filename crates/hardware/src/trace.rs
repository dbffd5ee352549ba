//! Per-cycle signal probe.
//!
//! A [`CycleProbe`] captures, after every cycle, the datapath signals a
//! waveform harness would watch: one group per stage, plus the register
//! file's ports. It provides:
//! 1. **Capture:** Built from a cycle's [`CycleReport`].
//! 2. **JSON lines:** `serde` serialisation with the canonical upper-case
//!    signal names (`F_PC`, `D_OPCODE`, `M_SIZE_ENCODED`, ...).
//! 3. **Text trace:** One `[F]`/`[D]`/`[R]`/`[E]`/`[M]`/`[W]` line per
//!    occupied stage, as printed by the command-line driver.

use std::fmt;

use serde::Serialize;

use crate::core::cpu::CycleReport;
use crate::isa::instruction::InstructionBits;

/// Signals sampled at the end of one cycle.
///
/// Each stage group has a validity flag; signals of an invalid (bubble)
/// stage are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct CycleProbe {
    /// Cycle number, starting at 1.
    pub cycle: u64,

    /// Fetch issued a read this cycle.
    pub f_valid: bool,
    /// Instruction memory address.
    #[serde(rename = "F_PC")]
    pub f_pc: u32,
    /// Instruction memory data out.
    #[serde(rename = "F_INSN")]
    pub f_insn: u32,

    /// Decode held an instruction.
    pub d_valid: bool,
    /// PC of the instruction in Decode.
    #[serde(rename = "D_PC")]
    pub d_pc: u32,
    /// Opcode field.
    #[serde(rename = "D_OPCODE")]
    pub d_opcode: u32,
    /// Destination register field.
    #[serde(rename = "D_RD")]
    pub d_rd: u32,
    /// First source register field.
    #[serde(rename = "D_RS1")]
    pub d_rs1: u32,
    /// Second source register field.
    #[serde(rename = "D_RS2")]
    pub d_rs2: u32,
    /// funct3 field.
    #[serde(rename = "D_FUNCT3")]
    pub d_funct3: u32,
    /// funct7 field.
    #[serde(rename = "D_FUNCT7")]
    pub d_funct7: u32,
    /// Sign-extended immediate.
    #[serde(rename = "D_IMM")]
    pub d_imm: u32,
    /// Shift amount (bits 24:20).
    #[serde(rename = "D_SHAMT")]
    pub d_shamt: u32,

    /// Register file write enable.
    #[serde(rename = "R_WRITE_ENABLE")]
    pub r_write_enable: bool,
    /// Register file write index.
    #[serde(rename = "R_WRITE_DESTINATION")]
    pub r_write_destination: u32,
    /// Register file write data.
    #[serde(rename = "R_WRITE_DATA")]
    pub r_write_data: u32,
    /// Register file read port A index.
    #[serde(rename = "R_READ_RS1")]
    pub r_read_rs1: u32,
    /// Register file read port B index.
    #[serde(rename = "R_READ_RS2")]
    pub r_read_rs2: u32,
    /// Register file read port A data.
    #[serde(rename = "R_READ_RS1_DATA")]
    pub r_read_rs1_data: u32,
    /// Register file read port B data.
    #[serde(rename = "R_READ_RS2_DATA")]
    pub r_read_rs2_data: u32,

    /// Execute held an instruction.
    pub e_valid: bool,
    /// PC of the instruction in Execute.
    #[serde(rename = "E_PC")]
    pub e_pc: u32,
    /// ALU result.
    #[serde(rename = "E_ALU_RES")]
    pub e_alu_res: u32,
    /// Branch (or jump) taken.
    #[serde(rename = "E_BR_TAKEN")]
    pub e_br_taken: bool,

    /// Memory held an instruction.
    pub m_valid: bool,
    /// PC of the instruction in Memory.
    #[serde(rename = "M_PC")]
    pub m_pc: u32,
    /// Data memory address.
    #[serde(rename = "M_ADDRESS")]
    pub m_address: u32,
    /// Data memory write enable.
    #[serde(rename = "M_RW")]
    pub m_rw: bool,
    /// Access size: 0 byte, 1 half, 2 word. 0 without an access.
    #[serde(rename = "M_SIZE_ENCODED")]
    pub m_size_encoded: u8,
    /// Data memory write data.
    #[serde(rename = "M_DATA")]
    pub m_data: u32,

    /// Writeback held an instruction.
    pub w_valid: bool,
    /// PC of the instruction in Writeback.
    #[serde(rename = "W_PC")]
    pub w_pc: u32,
    /// Writeback register write enable.
    #[serde(rename = "W_ENABLE")]
    pub w_enable: bool,
    /// Writeback destination register.
    #[serde(rename = "W_DESTINATION")]
    pub w_destination: u32,
    /// Writeback data.
    #[serde(rename = "W_DATA")]
    pub w_data: u32,
}

impl CycleProbe {
    /// Samples the signals of a finished cycle.
    pub fn capture(cycle: u64, report: &CycleReport) -> Self {
        let mut p = Self {
            cycle,
            ..Default::default()
        };

        if let Some(f) = report.fetched {
            p.f_valid = true;
            p.f_pc = f.pc;
            p.f_insn = f.inst;
        }

        if let (Some(id), Some(d)) = (report.before.if_id, report.decoded) {
            let inst = id.inst;
            p.d_valid = true;
            p.d_pc = id.pc;
            p.d_opcode = inst.opcode();
            p.d_rd = inst.rd() as u32;
            p.d_rs1 = inst.rs1() as u32;
            p.d_rs2 = inst.rs2() as u32;
            p.d_funct3 = inst.funct3();
            p.d_funct7 = inst.funct7();
            p.d_imm = d.imm as u32;
            p.d_shamt = inst.shamt();
            p.r_read_rs1 = d.rs1 as u32;
            p.r_read_rs2 = d.rs2 as u32;
            p.r_read_rs1_data = d.rv1;
            p.r_read_rs2_data = d.rv2;
        }

        p.r_write_enable = report.write.enable;
        p.r_write_destination = report.write.rd as u32;
        p.r_write_data = report.write.data;

        if let (Some(ex), Some(out)) = (report.before.id_ex, report.executed) {
            p.e_valid = true;
            p.e_pc = ex.pc;
            p.e_alu_res = out.entry.alu;
            p.e_br_taken = out.redirect.is_some();
        }

        if let Some(mem) = report.before.ex_mem {
            p.m_valid = true;
            p.m_pc = mem.pc;
            p.m_address = mem.alu;
            if let Some(req) = report.mem_request {
                p.m_rw = req.write;
                p.m_size_encoded = req.size.encoded();
                p.m_data = req.wdata;
            }
        }

        if let Some(wb) = report.before.mem_wb {
            p.w_valid = true;
            p.w_pc = wb.pc;
            p.w_enable = report.write.enable;
            p.w_destination = report.write.rd as u32;
            p.w_data = report.write.data;
        }

        p
    }

    /// The probe as a single JSON line.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for CycleProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = u8::from;
        if self.f_valid {
            writeln!(f, "[F] {:08x} {:08x}", self.f_pc, self.f_insn)?;
        }
        if self.d_valid {
            writeln!(
                f,
                "[D] {:08x} {:02x} {:02} {:02} {:02} {:x} {:02x} {:08x} {:02}",
                self.d_pc,
                self.d_opcode,
                self.d_rd,
                self.d_rs1,
                self.d_rs2,
                self.d_funct3,
                self.d_funct7,
                self.d_imm,
                self.d_shamt
            )?;
            writeln!(
                f,
                "[R] {:02} {:02} {:08x} {:08x}",
                self.r_read_rs1, self.r_read_rs2, self.r_read_rs1_data, self.r_read_rs2_data
            )?;
        }
        if self.e_valid {
            writeln!(
                f,
                "[E] {:08x} {:08x} {}",
                self.e_pc,
                self.e_alu_res,
                flag(self.e_br_taken)
            )?;
        }
        if self.m_valid {
            writeln!(
                f,
                "[M] {:08x} {:08x} {} {} {:08x}",
                self.m_pc,
                self.m_address,
                flag(self.m_rw),
                self.m_size_encoded,
                self.m_data
            )?;
        }
        if self.w_valid {
            writeln!(
                f,
                "[W] {:08x} {} {:02} {:08x}",
                self.w_pc,
                flag(self.w_enable),
                self.w_destination,
                self.w_data
            )?;
        }
        Ok(())
    }
}
