//! Memory interface traits.
//!
//! The core reaches its two memories only through these traits:
//! 1. **Instruction memory:** one 32-bit read per cycle, driven by Fetch.
//! 2. **Data memory:** one load or store per cycle, driven by the Memory stage.
//!
//! Both are single-cycle and synchronous. Alignment and range checks belong
//! to the implementor, which reports them as a [`Trap`].

use std::fmt::Debug;

use crate::common::error::Trap;
use crate::soc::memory::MemRequest;

/// Instruction memory as seen by the Fetch stage.
pub trait InstructionMemory: Debug {
    /// Reads the 32-bit instruction word at byte address `addr`.
    ///
    /// # Errors
    ///
    /// Returns the fault for a misaligned or out-of-range fetch.
    fn read(&mut self, addr: u32) -> Result<u32, Trap>;
}

/// Data memory as seen by the Memory stage.
pub trait DataMemory: Debug {
    /// Performs one load or store.
    ///
    /// Loads return the zero-extended value of `req.size` bytes; the Memory
    /// stage applies sign extension. Stores write the low `req.size` bytes of
    /// `req.wdata` and return 0.
    ///
    /// # Errors
    ///
    /// Returns the fault for a misaligned or out-of-range access.
    fn access(&mut self, req: &MemRequest) -> Result<u32, Trap>;
}
