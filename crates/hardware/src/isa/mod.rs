//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains definitions for opcodes, function codes, and decoding logic for
//! the RV32I base integer instruction set.

/// Application Binary Interface (ABI) register names.
pub mod abi;

/// Table-driven instruction decoding for the R, I, S, B, U and J formats.
pub mod decode;

/// Instruction disassembler for trace output and diagnostics.
pub mod disasm;

/// Instruction encoding structures and bit extraction utilities.
pub mod instruction;

/// Base integer instruction set (opcodes, funct3, funct7).
pub mod rv32i;
