//! Five-stage in-order RV32I pipeline simulator library.
//!
//! This crate implements a cycle-accurate model of a classic RISC pipeline with the following:
//! 1. **Core:** Fetch, Decode, Execute, Memory and Writeback stages joined by snapshot latches.
//! 2. **Hazards:** EX/MEM and MEM/WB forwarding, load-use stalls, and branch flushes.
//! 3. **ISA:** Table-driven RV32I decoding and a disassembler.
//! 4. **Memory:** Instruction and data memory interfaces with a flat array implementation.
//! 5. **Simulation:** Driver, loaders, reference executor, statistics and signal probes.

/// Common types and constants (registers, traps, access types).
pub mod common;
/// Simulator configuration (defaults, sections, validation).
pub mod config;
/// CPU core (pipeline, units, cycle orchestration).
pub mod core;
/// Instruction set (decode, instruction fields, ABI names, disassembly).
pub mod isa;
/// Simulation driver, loaders and reference executor.
pub mod sim;
/// Instruction and data memory interfaces and the flat memory.
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;
/// Per-cycle signal probe.
pub mod trace;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Main CPU type; holds the register file, PC, latches and memories.
pub use crate::core::Cpu;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
