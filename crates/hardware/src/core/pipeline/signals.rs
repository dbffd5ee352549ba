//! Pipeline control signals and operation types.
//!
//! This module defines the signals Decode generates and later stages obey:
//! 1. **Operation Classification:** ALU operations and branch conditions.
//! 2. **Operand Selection:** Sources for ALU inputs (registers, PC, immediate).
//! 3. **Memory Control:** Access width and sign extension for loads/stores.
//! 4. **Writeback Control:** Register write enable and halt requests.

use serde::Serialize;

use crate::common::data::MemSize;

/// ALU operation types for RV32I.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum AluOp {
    /// Addition (also address and jump-target generation).
    #[default]
    Add,

    /// Subtraction.
    Sub,

    /// Shift left logical.
    Sll,

    /// Set less than (signed).
    Slt,

    /// Set less than unsigned.
    Sltu,

    /// Bitwise XOR.
    Xor,

    /// Shift right logical.
    Srl,

    /// Shift right arithmetic.
    Sra,

    /// Bitwise OR.
    Or,

    /// Bitwise AND.
    And,
}

/// Condition evaluated by a conditional branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum BranchCond {
    /// `rs1 == rs2`.
    #[default]
    Eq,
    /// `rs1 != rs2`.
    Ne,
    /// `rs1 < rs2`, signed.
    Lt,
    /// `rs1 >= rs2`, signed.
    Ge,
    /// `rs1 < rs2`, unsigned.
    Ltu,
    /// `rs1 >= rs2`, unsigned.
    Geu,
}

/// Source for ALU operand A.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum OpASrc {
    /// Use the (forwarded) `rs1` value.
    #[default]
    Reg1,

    /// Use the instruction's PC.
    Pc,

    /// Use zero.
    Zero,
}

/// Source for ALU operand B.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum OpBSrc {
    /// Use the sign-extended immediate.
    #[default]
    Imm,

    /// Use the (forwarded) `rs2` value.
    Reg2,
}

/// SYSTEM instructions the core recognises.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum SystemOp {
    /// Not a SYSTEM instruction.
    #[default]
    None,
    /// `ECALL`: halt with `a0` as the exit code.
    Ecall,
    /// `EBREAK`: halt at this PC.
    Ebreak,
}

/// Coarse instruction class, used for statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum InstClass {
    /// Register or immediate arithmetic, LUI, AUIPC, FENCE.
    #[default]
    Alu,
    /// Load.
    Load,
    /// Store.
    Store,
    /// Conditional branch.
    Branch,
    /// JAL or JALR.
    Jump,
    /// ECALL or EBREAK.
    System,
}

/// Control signals for pipeline stage execution.
///
/// Generated once in Decode and carried unchanged to Writeback. A default
/// value is inert: no register write, no memory access, no control transfer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ControlSignals {
    /// Enable write to the destination register.
    pub reg_write: bool,
    /// Memory read (load).
    pub mem_read: bool,
    /// Memory write (store).
    pub mem_write: bool,
    /// Conditional branch; condition in `cond`.
    pub branch: bool,
    /// Branch condition (meaningful only when `branch`).
    pub cond: BranchCond,
    /// Unconditional jump (`JAL`/`JALR`); writes `pc + 4`.
    pub jump: bool,
    /// Width of the memory access.
    pub width: MemSize,
    /// Load result is sign-extended.
    pub signed_load: bool,
    /// ALU operation.
    pub alu: AluOp,
    /// Source selection for ALU operand A.
    pub a_src: OpASrc,
    /// Source selection for ALU operand B.
    pub b_src: OpBSrc,
    /// SYSTEM instruction kind.
    pub system: SystemOp,
}

impl ControlSignals {
    /// Instruction class for statistics.
    pub const fn class(&self) -> InstClass {
        if self.mem_read {
            InstClass::Load
        } else if self.mem_write {
            InstClass::Store
        } else if self.branch {
            InstClass::Branch
        } else if self.jump {
            InstClass::Jump
        } else if !matches!(self.system, SystemOp::None) {
            InstClass::System
        } else {
            InstClass::Alu
        }
    }
}
