//! Instruction Decode (ID) Stage.
//!
//! This module implements the second stage of the pipeline. It performs the following:
//! 1. **Decoding:** Splits the raw instruction into fields with the table-driven decoder.
//! 2. **Register Read:** Reads `rs1` and `rs2` through the register file's write-first
//!    port, so a value Writeback commits this cycle is already visible.
//! 3. **Control Generation:** Produces the ALU, branch, memory and writeback controls
//!    for later stages, rejecting encodings outside RV32I.

use tracing::trace;

use crate::common::data::MemSize;
use crate::common::error::Trap;
use crate::common::reg::{RegWrite, RegisterFile};
use crate::core::pipeline::latches::{IdExEntry, IfIdEntry};
use crate::core::pipeline::signals::{
    AluOp, BranchCond, ControlSignals, OpASrc, OpBSrc, SystemOp,
};
use crate::isa::decode::decode;
use crate::isa::instruction::Decoded;
use crate::isa::rv32i::{funct3 as f3, funct7 as f7, opcodes as op};

/// Executes the instruction decode stage.
///
/// # Arguments
///
/// * `if_id` - Snapshot of the IF/ID latch entry being decoded.
/// * `regs` - The register file, before this cycle's writeback.
/// * `wb` - The write Writeback performs this cycle.
///
/// # Returns
///
/// The ID/EX entry. Faults from Fetch and illegal encodings are carried on
/// the entry with inert control signals.
pub fn decode_stage(if_id: &IfIdEntry, regs: &RegisterFile, wb: RegWrite) -> IdExEntry {
    let base = IdExEntry {
        pc: if_id.pc,
        inst: if_id.inst,
        trap: if_id.trap,
        ..Default::default()
    };
    if if_id.trap.is_some() {
        return base;
    }

    let (d, ctrl) = match decode(if_id.inst).and_then(|d| control_signals(&d).map(|c| (d, c))) {
        Ok(ok) => ok,
        Err(trap) => {
            trace!(pc = format_args!("{:#010x}", if_id.pc), %trap, "ID");
            return IdExEntry {
                trap: Some(trap),
                ..base
            };
        }
    };

    let (rs1, rs2) = (d.src1(), d.src2());
    let (rv1, rv2) = regs.read_bypassed(rs1, rs2, wb);
    trace!(
        pc = format_args!("{:#010x}", if_id.pc),
        rd = d.rd,
        rs1,
        rs2,
        imm = d.imm,
        "ID"
    );

    IdExEntry {
        decoded: d,
        rs1,
        rs2,
        rd: if ctrl.reg_write { d.rd } else { 0 },
        imm: d.imm,
        rv1,
        rv2,
        ctrl,
        ..base
    }
}

/// Derives control signals from a decoded instruction.
///
/// # Errors
///
/// Returns [`Trap::IllegalInstruction`] for a `funct3`/`funct7` combination
/// (or SYSTEM encoding) that RV32I does not define.
pub fn control_signals(d: &Decoded) -> Result<ControlSignals, Trap> {
    let illegal = Trap::IllegalInstruction(d.raw);
    let mut c = ControlSignals::default();

    match d.opcode {
        op::OP_LUI => {
            c.reg_write = true;
            c.a_src = OpASrc::Zero;
        }
        op::OP_AUIPC => {
            c.reg_write = true;
            c.a_src = OpASrc::Pc;
        }
        op::OP_JAL => {
            c.reg_write = true;
            c.jump = true;
            c.a_src = OpASrc::Pc;
        }
        op::OP_JALR => {
            if d.funct3 != f3::JALR {
                return Err(illegal);
            }
            c.reg_write = true;
            c.jump = true;
        }
        op::OP_BRANCH => {
            c.branch = true;
            c.a_src = OpASrc::Pc;
            c.cond = match d.funct3 {
                f3::BEQ => BranchCond::Eq,
                f3::BNE => BranchCond::Ne,
                f3::BLT => BranchCond::Lt,
                f3::BGE => BranchCond::Ge,
                f3::BLTU => BranchCond::Ltu,
                f3::BGEU => BranchCond::Geu,
                _ => return Err(illegal),
            };
        }
        op::OP_LOAD => {
            c.reg_write = true;
            c.mem_read = true;
            (c.width, c.signed_load) = match d.funct3 {
                f3::LB => (MemSize::Byte, true),
                f3::LH => (MemSize::Half, true),
                f3::LW => (MemSize::Word, true),
                f3::LBU => (MemSize::Byte, false),
                f3::LHU => (MemSize::Half, false),
                _ => return Err(illegal),
            };
        }
        op::OP_STORE => {
            c.mem_write = true;
            c.width = match d.funct3 {
                f3::SB => MemSize::Byte,
                f3::SH => MemSize::Half,
                f3::SW => MemSize::Word,
                _ => return Err(illegal),
            };
        }
        op::OP_IMM => {
            c.reg_write = true;
            c.alu = match (d.funct3, d.funct7) {
                (f3::SLL, f7::DEFAULT) => AluOp::Sll,
                (f3::SRL_SRA, f7::DEFAULT) => AluOp::Srl,
                (f3::SRL_SRA, f7::SRA) => AluOp::Sra,
                (f3::SLL | f3::SRL_SRA, _) => return Err(illegal),
                (funct3, _) => base_alu_op(funct3),
            };
        }
        op::OP_REG => {
            c.reg_write = true;
            c.b_src = OpBSrc::Reg2;
            c.alu = match (d.funct3, d.funct7) {
                (f3::ADD_SUB, f7::SUB) => AluOp::Sub,
                (f3::SRL_SRA, f7::SRA) => AluOp::Sra,
                (funct3, f7::DEFAULT) => base_alu_op(funct3),
                _ => return Err(illegal),
            };
        }
        op::OP_MISC_MEM => {
            if d.funct3 != f3::FENCE {
                return Err(illegal);
            }
        }
        op::OP_SYSTEM => {
            c.system = match d.raw {
                op::ECALL => SystemOp::Ecall,
                op::EBREAK => SystemOp::Ebreak,
                _ => return Err(illegal),
            };
        }
        _ => return Err(illegal),
    }

    Ok(c)
}

/// ALU operation for a `funct3` with the default `funct7`.
const fn base_alu_op(funct3: u32) -> AluOp {
    match funct3 {
        f3::SLL => AluOp::Sll,
        f3::SLT => AluOp::Slt,
        f3::SLTU => AluOp::Sltu,
        f3::XOR => AluOp::Xor,
        f3::SRL_SRA => AluOp::Srl,
        f3::OR => AluOp::Or,
        f3::AND => AluOp::And,
        _ => AluOp::Add,
    }
}
