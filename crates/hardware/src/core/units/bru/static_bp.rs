//! Static Branch Predictor.
//!
//! Implements the "always not taken" policy: Fetch always continues at the
//! next sequential instruction. Taken branches and all jumps are discovered
//! in Execute, which redirects the PC and squashes the two younger
//! instructions fetched meanwhile.

use crate::common::constants::INSTRUCTION_SIZE;

/// Static predictor; holds no state.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticPredictor;

impl StaticPredictor {
    /// Predicted address of the instruction after `pc`.
    pub const fn next_pc(self, pc: u32) -> u32 {
        pc.wrapping_add(INSTRUCTION_SIZE)
    }
}
