//! Instruction encoding and decoding utilities.
//!
//! Provides bit extraction for the fixed RV32I field positions and the
//! `Decoded` structure produced once per instruction in the Decode stage.

use serde::Serialize;

/// Bit mask for extracting the opcode field (bits 0-6).
pub const OPCODE_MASK: u32 = 0x7F;
/// Bit mask for a 5-bit register index or shift amount.
pub const REG_MASK: u32 = 0x1F;
/// Bit mask for extracting the funct3 field (bits 12-14).
pub const FUNCT3_MASK: u32 = 0x7;
/// Bit mask for extracting the funct7 field (bits 25-31).
pub const FUNCT7_MASK: u32 = 0x7F;

/// Trait for extracting instruction fields from encoded instructions.
pub trait InstructionBits {
    /// Extracts the opcode field (bits 0-6).
    fn opcode(&self) -> u32;

    /// Extracts the destination register field (bits 7-11).
    fn rd(&self) -> usize;

    /// Extracts the first source register field (bits 15-19).
    fn rs1(&self) -> usize;

    /// Extracts the second source register field (bits 20-24).
    fn rs2(&self) -> usize;

    /// Extracts the funct3 field (bits 12-14).
    fn funct3(&self) -> u32;

    /// Extracts the funct7 field (bits 25-31).
    fn funct7(&self) -> u32;

    /// Extracts the shift amount for shift-immediates (bits 20-24).
    ///
    /// Shares its position with `rs2`; meaningful only for SLLI/SRLI/SRAI.
    fn shamt(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        self & OPCODE_MASK
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> 7) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs1(&self) -> usize {
        ((self >> 15) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs2(&self) -> usize {
        ((self >> 20) & REG_MASK) as usize
    }

    #[inline(always)]
    fn funct3(&self) -> u32 {
        (self >> 12) & FUNCT3_MASK
    }

    #[inline(always)]
    fn funct7(&self) -> u32 {
        (self >> 25) & FUNCT7_MASK
    }

    #[inline(always)]
    fn shamt(&self) -> u32 {
        (self >> 20) & REG_MASK
    }
}

/// Base instruction format, keyed by opcode class.
///
/// The format decides which register fields are meaningful and how the
/// immediate is assembled and sign-extended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum InstFormat {
    /// Register-register: rs1, rs2, rd; no immediate.
    #[default]
    R,
    /// Register-immediate, loads, JALR, SYSTEM, FENCE: rs1, rd, imm[11:0].
    I,
    /// Stores: rs1, rs2, imm[11:0] split across two fields.
    S,
    /// Conditional branches: rs1, rs2, imm[12:1].
    B,
    /// LUI/AUIPC: rd, imm[31:12].
    U,
    /// JAL: rd, imm[20:1].
    J,
}

impl InstFormat {
    /// Whether the format reads `rs1`.
    pub const fn uses_rs1(self) -> bool {
        matches!(self, Self::R | Self::I | Self::S | Self::B)
    }

    /// Whether the format reads `rs2`.
    pub const fn uses_rs2(self) -> bool {
        matches!(self, Self::R | Self::S | Self::B)
    }

    /// Whether the format carries a destination field.
    pub const fn has_rd(self) -> bool {
        matches!(self, Self::R | Self::I | Self::U | Self::J)
    }
}

/// Decoded instruction containing all extracted fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Decoded {
    /// Raw 32-bit instruction encoding.
    pub raw: u32,
    /// Instruction format.
    pub format: InstFormat,
    /// Opcode field (bits 0-6).
    pub opcode: u32,
    /// Destination register index (bits 7-11).
    pub rd: usize,
    /// First source register index (bits 15-19).
    pub rs1: usize,
    /// Second source register index (bits 20-24).
    pub rs2: usize,
    /// Function code 3 (bits 12-14).
    pub funct3: u32,
    /// Function code 7 (bits 25-31).
    pub funct7: u32,
    /// Sign-extended immediate (0 for R-type).
    pub imm: i32,
    /// Shift amount (bits 20-24).
    pub shamt: u32,
}

impl Decoded {
    /// `rs1` if the format reads it, otherwise `x0`.
    pub const fn src1(&self) -> usize {
        if self.format.uses_rs1() { self.rs1 } else { 0 }
    }

    /// `rs2` if the format reads it, otherwise `x0`.
    pub const fn src2(&self) -> usize {
        if self.format.uses_rs2() { self.rs2 } else { 0 }
    }
}
