//! Global System Constants.
//!
//! This module defines constants shared across the simulator:
//! 1. **Instruction Constants:** Instruction width and the canonical NOP.
//! 2. **Register Constants:** Register count.
//! 3. **Memory Map Defaults:** Reset PC, default memory geometry, cycle budget.

/// Size of an RV32I instruction in bytes.
pub const INSTRUCTION_SIZE: u32 = 4;

/// `ADDI x0, x0, 0`, the canonical NOP encoding.
pub const INSTRUCTION_NOP: u32 = 0x0000_0013;

/// Number of architectural integer registers.
pub const NUM_REGS: usize = 32;

/// Default reset PC and base address of both memories.
pub const DEFAULT_BASE: u32 = 0x0100_0000;

/// Default size of each memory in bytes (1 MiB).
pub const DEFAULT_MEM_SIZE: u32 = 1 << 20;

/// Default cycle budget for `Simulator::run`.
pub const DEFAULT_MAX_CYCLES: u64 = 1_000_000;
