//! Instruction Fetch (IF) Stage.
//!
//! This module implements the first stage of the instruction pipeline.
//! It reads the instruction word at the current Program Counter. The next PC
//! (sequential, a held PC on stall, or Execute's redirect) is chosen by the
//! cycle driver, since it depends on what the later stages decide this cycle.

use tracing::trace;

use crate::core::pipeline::latches::IfIdEntry;
use crate::soc::traits::InstructionMemory;

/// Executes the instruction fetch stage of the pipeline.
///
/// # Arguments
///
/// * `imem` - The instruction memory.
/// * `pc` - Address to fetch from.
///
/// # Returns
///
/// The IF/ID entry. A fault reported by the instruction memory is carried on
/// the entry with an all-zero instruction word and surfaces only if the entry
/// reaches Writeback.
pub fn fetch_stage(imem: &mut dyn InstructionMemory, pc: u32) -> IfIdEntry {
    match imem.read(pc) {
        Ok(inst) => {
            trace!(pc = format_args!("{pc:#010x}"), inst = format_args!("{inst:#010x}"), "IF");
            IfIdEntry {
                pc,
                inst,
                trap: None,
            }
        }
        Err(trap) => {
            trace!(pc = format_args!("{pc:#010x}"), %trap, "IF");
            IfIdEntry {
                pc,
                inst: 0,
                trap: Some(trap),
            }
        }
    }
}
