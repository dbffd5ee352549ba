//! Memory collaborators of the core.
//!
//! The pipeline sees memory only through the [`InstructionMemory`] and
//! [`DataMemory`] traits. [`Memory`] is the flat array store used by the
//! simulator and the reference executor.

/// Flat byte-addressed memory and the data-memory request type.
pub mod memory;

/// Instruction and data memory interface traits.
pub mod traits;

pub use memory::{MemRequest, Memory};
pub use traits::{DataMemory, InstructionMemory};
