//! Branch resolution unit (BRU).
//!
//! This module decides control flow for the Execute stage:
//! 1. **Condition evaluation:** BEQ/BNE/BLT/BGE/BLTU/BGEU on forwarded operands.
//! 2. **Target computation:** `pc + imm` for branches and JAL, `(rs1 + imm) & !1`
//!    for JALR.
//! 3. **Prediction:** the static not-taken policy Fetch follows (see [`static_bp`]).

/// Static branch predictor (always not-taken).
pub mod static_bp;

pub use self::static_bp::StaticPredictor;

use crate::core::pipeline::signals::{BranchCond, ControlSignals};

/// Outcome of resolving one instruction's control flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// The instruction transfers control.
    pub taken: bool,
    /// Where it transfers control to (meaningful only when `taken`).
    pub target: u32,
}

impl Resolution {
    /// PC redirect request, if control is transferred.
    pub const fn redirect(self) -> Option<u32> {
        if self.taken { Some(self.target) } else { None }
    }
}

/// Branch resolution unit.
#[derive(Debug)]
pub struct BranchUnit;

impl BranchUnit {
    /// Evaluates a branch condition.
    ///
    /// # Examples
    ///
    /// ```
    /// use rv32pipe_core::core::units::bru::BranchUnit;
    /// use rv32pipe_core::core::pipeline::signals::BranchCond;
    ///
    /// assert!(BranchUnit::taken(BranchCond::Lt, -1_i32 as u32, 0));
    /// assert!(!BranchUnit::taken(BranchCond::Ltu, -1_i32 as u32, 0));
    /// ```
    pub const fn taken(cond: BranchCond, a: u32, b: u32) -> bool {
        match cond {
            BranchCond::Eq => a == b,
            BranchCond::Ne => a != b,
            BranchCond::Lt => (a as i32) < (b as i32),
            BranchCond::Ge => (a as i32) >= (b as i32),
            BranchCond::Ltu => a < b,
            BranchCond::Geu => a >= b,
        }
    }

    /// Resolves a control-flow instruction in Execute.
    ///
    /// # Arguments
    ///
    /// * `ctrl` - Control signals of the instruction.
    /// * `pc` - Its PC.
    /// * `imm` - Its sign-extended immediate.
    /// * `rs1` - Forwarded `rs1` value.
    /// * `rs2` - Forwarded `rs2` value.
    /// * `alu` - ALU result; for jumps the ALU computes the un-masked target.
    ///
    /// # Returns
    ///
    /// Not-taken for anything other than a taken branch or a jump.
    pub const fn resolve(
        ctrl: &ControlSignals,
        pc: u32,
        imm: i32,
        rs1: u32,
        rs2: u32,
        alu: u32,
    ) -> Resolution {
        if ctrl.jump {
            return Resolution {
                taken: true,
                target: alu & !1,
            };
        }
        if ctrl.branch && Self::taken(ctrl.cond, rs1, rs2) {
            return Resolution {
                taken: true,
                target: pc.wrapping_add(imm as u32),
            };
        }
        Resolution {
            taken: false,
            target: 0,
        }
    }
}
