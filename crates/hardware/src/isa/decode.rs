//! RISC-V Instruction Decoder.
//!
//! Decodes 32-bit RV32I encodings into a structured [`Decoded`]. Field
//! extraction is driven by two tables:
//! 1. **Format table:** maps each major opcode to its [`InstFormat`].
//! 2. **Immediate rules:** for each format, the list of instruction bit slices
//!    that are scattered into the immediate, and the immediate's width, which
//!    fixes where sign extension starts.

use crate::common::error::Trap;
use crate::isa::instruction::{Decoded, InstFormat, InstructionBits};
use crate::isa::rv32i::opcodes;

/// One contiguous slice of instruction bits placed into the immediate.
#[derive(Clone, Copy, Debug)]
struct ImmSlice {
    /// Lowest instruction bit of the slice.
    src_lsb: u32,
    /// Slice width in bits.
    width: u32,
    /// Immediate bit the slice's lowest bit lands on.
    dst_lsb: u32,
}

/// Assembly and sign-extension rule for one instruction format.
#[derive(Clone, Copy, Debug)]
struct ImmRule {
    slices: &'static [ImmSlice],
    /// Total immediate width; bit `bits - 1` is the sign bit.
    bits: u32,
}

const fn slice(src_lsb: u32, width: u32, dst_lsb: u32) -> ImmSlice {
    ImmSlice {
        src_lsb,
        width,
        dst_lsb,
    }
}

/// R-type: no immediate.
const R_IMM: ImmRule = ImmRule {
    slices: &[],
    bits: 0,
};

/// I-type: `imm[11:0] | rs1 | funct3 | rd | opcode`.
const I_IMM: ImmRule = ImmRule {
    slices: &[slice(20, 12, 0)],
    bits: 12,
};

/// S-type: `imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode`.
const S_IMM: ImmRule = ImmRule {
    slices: &[slice(7, 5, 0), slice(25, 7, 5)],
    bits: 12,
};

/// B-type: `imm[12] | imm[10:5] | rs2 | rs1 | funct3 | imm[4:1] | imm[11] | opcode`.
const B_IMM: ImmRule = ImmRule {
    slices: &[
        slice(8, 4, 1),
        slice(25, 6, 5),
        slice(7, 1, 11),
        slice(31, 1, 12),
    ],
    bits: 13,
};

/// U-type: `imm[31:12] | rd | opcode`.
const U_IMM: ImmRule = ImmRule {
    slices: &[slice(12, 20, 12)],
    bits: 32,
};

/// J-type: `imm[20] | imm[10:1] | imm[11] | imm[19:12] | rd | opcode`.
const J_IMM: ImmRule = ImmRule {
    slices: &[
        slice(21, 10, 1),
        slice(20, 1, 11),
        slice(12, 8, 12),
        slice(31, 1, 20),
    ],
    bits: 21,
};

/// Major opcode to instruction format.
const FORMAT_TABLE: [(u32, InstFormat); 11] = [
    (opcodes::OP_LUI, InstFormat::U),
    (opcodes::OP_AUIPC, InstFormat::U),
    (opcodes::OP_JAL, InstFormat::J),
    (opcodes::OP_JALR, InstFormat::I),
    (opcodes::OP_BRANCH, InstFormat::B),
    (opcodes::OP_LOAD, InstFormat::I),
    (opcodes::OP_STORE, InstFormat::S),
    (opcodes::OP_IMM, InstFormat::I),
    (opcodes::OP_REG, InstFormat::R),
    (opcodes::OP_MISC_MEM, InstFormat::I),
    (opcodes::OP_SYSTEM, InstFormat::I),
];

impl InstFormat {
    /// Looks up the format of a major opcode.
    pub fn of_opcode(opcode: u32) -> Option<Self> {
        FORMAT_TABLE
            .iter()
            .find(|(op, _)| *op == opcode)
            .map(|&(_, fmt)| fmt)
    }

    const fn imm_rule(self) -> &'static ImmRule {
        match self {
            Self::R => &R_IMM,
            Self::I => &I_IMM,
            Self::S => &S_IMM,
            Self::B => &B_IMM,
            Self::U => &U_IMM,
            Self::J => &J_IMM,
        }
    }

    /// Assembles and sign-extends this format's immediate from `inst`.
    pub fn immediate(self, inst: u32) -> i32 {
        let rule = self.imm_rule();
        if rule.bits == 0 {
            return 0;
        }
        let raw = rule.slices.iter().fold(0u32, |acc, s| {
            let field = (inst >> s.src_lsb) & ((1u32 << s.width) - 1);
            acc | (field << s.dst_lsb)
        });
        sign_extend(raw, rule.bits)
    }
}

/// Decodes a RISC-V instruction into its component fields.
///
/// Only the major opcode is validated here; `funct3`/`funct7` legality is
/// checked when control signals are generated.
///
/// # Errors
///
/// Returns [`Trap::IllegalInstruction`] when the major opcode is not part of RV32I.
pub fn decode(inst: u32) -> Result<Decoded, Trap> {
    let opcode = inst.opcode();
    let format = InstFormat::of_opcode(opcode).ok_or(Trap::IllegalInstruction(inst))?;

    Ok(Decoded {
        raw: inst,
        format,
        opcode,
        rd: inst.rd(),
        rs1: inst.rs1(),
        rs2: inst.rs2(),
        funct3: inst.funct3(),
        funct7: inst.funct7(),
        imm: format.immediate(inst),
        shamt: inst.shamt(),
    })
}

/// Sign extends the low `bits` of `val` to a 32-bit signed integer.
fn sign_extend(val: u32, bits: u32) -> i32 {
    let shift = u32::BITS - bits;
    ((val << shift) as i32) >> shift
}
