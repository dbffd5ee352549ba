//! Core processor implementation.
//!
//! This module contains the CPU: the five-stage pipeline, the execution units
//! it drives, and the cycle orchestration that ties them together.

/// CPU core state and cycle orchestration.
pub mod cpu;

/// Instruction pipeline implementation (stages, latches, hazards, signals).
pub mod pipeline;

/// Execution units (ALU, branch unit).
pub mod units;

pub use self::cpu::Cpu;
