//! Pipeline latch structures for inter-stage communication.
//!
//! This module defines the entry types carried between the five stages:
//! Fetch → Decode → Execute → Memory → Writeback.
//!
//! 1. **Instruction Flow:** One entry per latch, carrying the instruction's PC
//!    alongside its data so every stage knows which instruction it holds.
//! 2. **Bubbles:** A latch is an `Option`; `None` is a bubble, which never
//!    writes a register, never touches memory and never redirects the PC.
//! 3. **Trap Propagation:** A fault rides on its entry until Writeback.

use crate::common::constants::INSTRUCTION_SIZE;
use crate::common::error::Trap;
use crate::core::pipeline::signals::ControlSignals;
use crate::isa::instruction::Decoded;

/// Entry in the IF/ID pipeline latch (Fetch to Decode stage).
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct IfIdEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// 32-bit instruction encoding (0 when the fetch faulted).
    pub inst: u32,
    /// Trap that occurred during fetch, if any.
    pub trap: Option<Trap>,
}

/// Entry in the ID/EX pipeline latch (Decode to Execute stage).
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct IdExEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// 32-bit instruction encoding.
    pub inst: u32,
    /// Decoded fields, kept for tracing.
    pub decoded: Decoded,
    /// First source register index; 0 when the format has no `rs1`.
    pub rs1: usize,
    /// Second source register index; 0 when the format has no `rs2`.
    pub rs2: usize,
    /// Destination register index.
    pub rd: usize,
    /// Sign-extended immediate value.
    pub imm: i32,
    /// Value read from `rs1` in Decode.
    pub rv1: u32,
    /// Value read from `rs2` in Decode.
    pub rv2: u32,
    /// Control signals for downstream pipeline stages.
    pub ctrl: ControlSignals,
    /// Trap raised by Fetch or Decode, if any.
    pub trap: Option<Trap>,
}

/// Entry in the EX/MEM pipeline latch (Execute to Memory stage).
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct ExMemEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// 32-bit instruction encoding.
    pub inst: u32,
    /// Destination register index.
    pub rd: usize,
    /// ALU result: arithmetic result, memory address, or jump target.
    pub alu: u32,
    /// Forwarded `rs2`, the store data.
    pub store_data: u32,
    /// Control signals.
    pub ctrl: ControlSignals,
    /// Trap carried from earlier stages, if any.
    pub trap: Option<Trap>,
}

impl ExMemEntry {
    /// Value this entry can forward to Execute.
    ///
    /// `None` when the entry writes no register or its value does not exist
    /// yet (a load still waiting on memory).
    pub const fn forward_value(&self) -> Option<u32> {
        if !writes_gpr(&self.ctrl, self.rd, self.trap) || self.ctrl.mem_read {
            return None;
        }
        if self.ctrl.jump {
            Some(self.pc.wrapping_add(INSTRUCTION_SIZE))
        } else {
            Some(self.alu)
        }
    }

    /// Whether this entry will write `rd != x0` if it retires.
    pub const fn writes_reg(&self) -> bool {
        writes_gpr(&self.ctrl, self.rd, self.trap)
    }
}

/// Entry in the MEM/WB pipeline latch (Memory to Writeback stage).
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct MemWbEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// 32-bit instruction encoding.
    pub inst: u32,
    /// Destination register index.
    pub rd: usize,
    /// ALU result from Execute.
    pub alu: u32,
    /// Extended load data (loads only).
    pub load_data: u32,
    /// Control signals.
    pub ctrl: ControlSignals,
    /// Trap carried from earlier stages or raised by memory, if any.
    pub trap: Option<Trap>,
}

impl MemWbEntry {
    /// Value Writeback commits: load data, `pc + 4` for jumps, else the ALU result.
    pub const fn wb_value(&self) -> u32 {
        if self.ctrl.mem_read {
            self.load_data
        } else if self.ctrl.jump {
            self.pc.wrapping_add(INSTRUCTION_SIZE)
        } else {
            self.alu
        }
    }

    /// Whether this entry writes `rd != x0`.
    pub const fn writes_reg(&self) -> bool {
        writes_gpr(&self.ctrl, self.rd, self.trap)
    }
}

const fn writes_gpr(ctrl: &ControlSignals, rd: usize, trap: Option<Trap>) -> bool {
    ctrl.reg_write && rd != 0 && trap.is_none()
}

/// The four inter-stage latches. `None` in a slot is a bubble.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct PipelineLatches {
    /// Fetch to Decode.
    pub if_id: Option<IfIdEntry>,
    /// Decode to Execute.
    pub id_ex: Option<IdExEntry>,
    /// Execute to Memory.
    pub ex_mem: Option<ExMemEntry>,
    /// Memory to Writeback.
    pub mem_wb: Option<MemWbEntry>,
}

impl PipelineLatches {
    /// Number of latches holding an instruction.
    pub fn occupancy(&self) -> usize {
        [
            self.if_id.is_some(),
            self.id_ex.is_some(),
            self.ex_mem.is_some(),
            self.mem_wb.is_some(),
        ]
        .into_iter()
        .filter(|&valid| valid)
        .count()
    }

    /// Whether every latch holds a bubble.
    pub fn is_empty(&self) -> bool {
        self.occupancy() == 0
    }
}
