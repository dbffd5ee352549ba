//! ALU shift operations.
//!
//! The shift amount is the low 5 bits of operand B. SRA replicates the sign
//! bit; SRL shifts in zeros.

use crate::core::pipeline::signals::AluOp;

/// Mask for the shift amount.
const SHAMT_MASK: u32 = 0x1F;

/// Executes a shift operation.
///
/// Returns `0` for non-shift opcodes.
pub const fn execute(op: AluOp, a: u32, b: u32) -> u32 {
    let shamt = b & SHAMT_MASK;
    match op {
        AluOp::Sll => a << shamt,
        AluOp::Srl => a >> shamt,
        AluOp::Sra => ((a as i32) >> shamt) as u32,
        _ => 0,
    }
}
