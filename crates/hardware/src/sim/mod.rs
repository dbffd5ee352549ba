//! Simulation driver, program loading and the reference executor.
//!
//! Provides the [`Simulator`] harnesses drive cycle by cycle, utilities for
//! placing programs in memory, and a non-pipelined executor to check the
//! pipeline against.

/// Binary, hex and ELF program loading.
pub mod loader;

/// Single-cycle reference executor.
pub mod reference;

/// The cycle-level simulator.
pub mod simulator;

pub use reference::ReferenceCpu;
pub use simulator::{Halt, RunSummary, Simulator};
