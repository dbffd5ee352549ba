//! Trap and simulator error definitions.
//!
//! This module defines the error handling for the simulator. It provides:
//! 1. **Trap Representation:** Synchronous faults raised by decode or by a memory
//!    collaborator, carried on the pipeline entry that caused them.
//! 2. **Simulator Errors:** Halting conditions and host-side failures (config,
//!    program loading) surfaced through `Result`.
//!
//! The core does not handle traps: a trap that reaches Writeback halts the
//! simulation with [`SimError::Trap`]. A trap on a flushed wrong-path entry is
//! discarded with the entry.

use std::io;

use thiserror::Error;

/// Synchronous fault recorded on a pipeline entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Trap {
    /// Fetch address not aligned to 4 bytes.
    #[error("InstructionAddressMisaligned({0:#x})")]
    InstructionAddressMisaligned(u32),

    /// Fetch address outside the instruction memory.
    #[error("InstructionAccessFault({0:#x})")]
    InstructionAccessFault(u32),

    /// Encoding outside the supported RV32I subset. Carries the raw word.
    #[error("IllegalInstruction({0:#010x})")]
    IllegalInstruction(u32),

    /// Load address not aligned to the access size.
    #[error("LoadAddressMisaligned({0:#x})")]
    LoadAddressMisaligned(u32),

    /// Load address outside the data memory.
    #[error("LoadAccessFault({0:#x})")]
    LoadAccessFault(u32),

    /// Store address not aligned to the access size.
    #[error("StoreAddressMisaligned({0:#x})")]
    StoreAddressMisaligned(u32),

    /// Store address outside the data memory.
    #[error("StoreAccessFault({0:#x})")]
    StoreAccessFault(u32),
}

/// Errors surfaced by the simulator and its host-side collaborators.
#[derive(Debug, Error)]
pub enum SimError {
    /// A trapping instruction reached Writeback.
    #[error("trap at pc {pc:#010x}: {trap}")]
    Trap {
        /// PC of the faulting instruction.
        pc: u32,
        /// The fault.
        trap: Trap,
    },

    /// `run` exhausted its cycle budget without a halt.
    #[error("no halt within {0} cycles")]
    CycleLimit(u64),

    /// Invalid or unparsable configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A program file could not be read.
    #[error("could not read '{path}': {source}")]
    Load {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A program image does not fit in memory.
    #[error("image of {len} bytes at {addr:#010x} does not fit in memory")]
    ImageTooLarge {
        /// Load address.
        addr: u32,
        /// Image length in bytes.
        len: usize,
    },

    /// Malformed ELF file.
    #[error("bad ELF image: {0}")]
    Elf(String),

    /// Malformed `$readmemh`-style hex image.
    #[error("hex image line {line}: {reason}")]
    HexImage {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
