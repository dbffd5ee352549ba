//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which serves as the container for the
//! entire processor state. It coordinates the following:
//! 1. **State Management:** Maintains the register file and program counter.
//! 2. **Pipeline Control:** Holds the four inter-stage latches.
//! 3. **Memory Interfaces:** Owns the instruction and data memory collaborators.

/// Cycle orchestration: runs every stage once and latches the results.
pub mod execution;

pub use self::execution::CycleReport;

use crate::common::RegisterFile;
use crate::core::pipeline::latches::PipelineLatches;
use crate::core::units::bru::StaticPredictor;
use crate::soc::memory::Memory;
use crate::soc::traits::{DataMemory, InstructionMemory};

/// Main CPU structure containing all processor state and components.
///
/// Generic over its two memories so tests can substitute instrumented ones;
/// the simulator uses [`Memory`] for both.
#[derive(Debug)]
pub struct Cpu<I = Memory, D = Memory> {
    /// General purpose registers.
    pub regs: RegisterFile,
    /// Program Counter of the next fetch.
    pub pc: u32,
    /// IF/ID, ID/EX, EX/MEM and MEM/WB.
    pub latches: PipelineLatches,
    /// Instruction memory, read by Fetch.
    pub imem: I,
    /// Data memory, accessed by the Memory stage.
    pub dmem: D,
    /// Next-PC policy for Fetch.
    pub predictor: StaticPredictor,
    /// Whether Execute takes operands from the bypass network.
    pub forwarding: bool,
}

impl<I: InstructionMemory, D: DataMemory> Cpu<I, D> {
    /// Creates a CPU with an empty pipeline.
    ///
    /// # Arguments
    ///
    /// * `pc` - Reset PC.
    /// * `imem` - Instruction memory.
    /// * `dmem` - Data memory.
    /// * `forwarding` - Enable the EX/MEM and MEM/WB bypass paths.
    pub fn new(pc: u32, imem: I, dmem: D, forwarding: bool) -> Self {
        Self {
            regs: RegisterFile::new(),
            pc,
            latches: PipelineLatches::default(),
            imem,
            dmem,
            predictor: StaticPredictor,
            forwarding,
        }
    }
}
