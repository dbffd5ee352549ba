//! Common utilities and types used throughout the pipeline simulator.
//!
//! This module provides the building blocks shared by every stage:
//! 1. **Constants:** Reset values, instruction size, register counts.
//! 2. **Memory Access:** Access direction and size encodings.
//! 3. **Error Handling:** Trap representations and simulator-level errors.
//! 4. **Register Management:** The 32-entry integer register file.

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types and trap definitions.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use data::{AccessType, MemSize};
pub use error::{SimError, Trap};
pub use reg::RegisterFile;
