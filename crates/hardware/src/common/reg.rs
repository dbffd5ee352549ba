//! Integer Register File.
//!
//! This module provides the `RegisterFile` struct: 32 general-purpose registers
//! with two read ports and one write port. It performs:
//! 1. **Storage:** `x0`-`x31`, with `x0` hard-wired to zero.
//! 2. **Write-first bypass:** A value committed by Writeback in a cycle is
//!    visible to the Decode-stage reads of that same cycle.
//! 3. **Observability:** Snapshot and dump helpers for harnesses and tests.

use std::fmt;

use crate::common::constants::NUM_REGS;

/// A pending register write driven by the Writeback stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegWrite {
    /// Write enable.
    pub enable: bool,
    /// Destination register index.
    pub rd: usize,
    /// Value to write.
    pub data: u32,
}

/// General-purpose register file.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u32; NUM_REGS],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Creates a register file with every register zero.
    pub const fn new() -> Self {
        Self {
            regs: [0; NUM_REGS],
        }
    }

    /// Reads a single register. `x0` always returns 0.
    pub fn read(&self, idx: usize) -> u32 {
        if idx == 0 { 0 } else { self.regs[idx & 0x1F] }
    }

    /// Reads both source ports at once.
    pub fn read_pair(&self, rs1: usize, rs2: usize) -> (u32, u32) {
        (self.read(rs1), self.read(rs2))
    }

    /// Writes a register when `enable` is set. Writes to `x0` are dropped.
    pub fn write(&mut self, idx: usize, val: u32, enable: bool) {
        if enable && idx != 0 {
            self.regs[idx & 0x1F] = val;
        }
    }

    /// Reads both ports with a same-cycle write applied first.
    ///
    /// Equivalent to committing `wr` and then reading, so a read of the register
    /// being written returns the new value and `x0` still reads zero.
    pub fn read_bypassed(&self, rs1: usize, rs2: usize, wr: RegWrite) -> (u32, u32) {
        let port = |idx: usize| {
            if wr.enable && idx != 0 && idx == wr.rd {
                wr.data
            } else {
                self.read(idx)
            }
        };
        (port(rs1), port(rs2))
    }

    /// Copy of all 32 registers, `x0` included.
    pub const fn snapshot(&self) -> [u32; NUM_REGS] {
        self.regs
    }
}

impl fmt::Debug for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..NUM_REGS).step_by(4) {
            writeln!(
                f,
                "x{:<2}={:#010x} x{:<2}={:#010x} x{:<2}={:#010x} x{:<2}={:#010x}",
                i,
                self.regs[i],
                i + 1,
                self.regs[i + 1],
                i + 2,
                self.regs[i + 2],
                i + 3,
                self.regs[i + 3]
            )?;
        }
        Ok(())
    }
}
