//! Execute (EX) Stage.
//!
//! This module implements the third stage of the instruction pipeline. It performs:
//! 1. **Operand Selection:** Applies the forwarding decision to `rs1`/`rs2`.
//! 2. **ALU Operations:** Arithmetic, logic, shifts, and address/target generation.
//! 3. **Branch Resolution:** Evaluates branch conditions and jump targets; a taken
//!    control transfer produces a PC redirect that flushes the younger stages.

use tracing::{debug, trace};

use crate::core::pipeline::hazards::{self, Forwarded};
use crate::core::pipeline::latches::{ExMemEntry, IdExEntry, MemWbEntry};
use crate::core::pipeline::signals::{OpASrc, OpBSrc};
use crate::core::units::alu::Alu;
use crate::core::units::bru::BranchUnit;

/// Everything Execute produces in one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecuteOutcome {
    /// The EX/MEM entry.
    pub entry: ExMemEntry,
    /// Redirect target when a branch is taken or a jump executes.
    pub redirect: Option<u32>,
    /// Final operand values and their sources.
    pub operands: Forwarded,
}

/// Executes the instruction execute stage.
///
/// # Arguments
///
/// * `id_ex` - Snapshot of the ID/EX entry being executed.
/// * `ex_mem` - Snapshot of the EX/MEM latch (forwarding source).
/// * `mem_wb` - Snapshot of the MEM/WB latch (forwarding source).
/// * `forwarding` - Whether bypass paths are enabled. When disabled, operands
///   are the values read in Decode; the Decode interlock guarantees they are
///   current.
pub fn execute_stage(
    id_ex: &IdExEntry,
    ex_mem: Option<&ExMemEntry>,
    mem_wb: Option<&MemWbEntry>,
    forwarding: bool,
) -> ExecuteOutcome {
    let passthrough = ExMemEntry {
        pc: id_ex.pc,
        inst: id_ex.inst,
        rd: id_ex.rd,
        ctrl: id_ex.ctrl,
        trap: id_ex.trap,
        ..Default::default()
    };
    if id_ex.trap.is_some() {
        return ExecuteOutcome {
            entry: passthrough,
            ..Default::default()
        };
    }

    let operands = if forwarding {
        hazards::forward_rs(id_ex, ex_mem, mem_wb)
    } else {
        Forwarded {
            rs1_val: id_ex.rv1,
            rs2_val: id_ex.rv2,
            ..Default::default()
        }
    };

    let ctrl = &id_ex.ctrl;
    let a = match ctrl.a_src {
        OpASrc::Reg1 => operands.rs1_val,
        OpASrc::Pc => id_ex.pc,
        OpASrc::Zero => 0,
    };
    let b = match ctrl.b_src {
        OpBSrc::Imm => id_ex.imm as u32,
        OpBSrc::Reg2 => operands.rs2_val,
    };
    let alu = Alu::execute(ctrl.alu, a, b);

    let resolution = BranchUnit::resolve(
        ctrl,
        id_ex.pc,
        id_ex.imm,
        operands.rs1_val,
        operands.rs2_val,
        alu,
    );
    let redirect = resolution.redirect();

    trace!(
        pc = format_args!("{:#010x}", id_ex.pc),
        alu = format_args!("{alu:#010x}"),
        taken = resolution.taken,
        "EX"
    );
    if let Some(target) = redirect {
        debug!(
            pc = format_args!("{:#010x}", id_ex.pc),
            target = format_args!("{target:#010x}"),
            "control transfer resolved"
        );
    }

    ExecuteOutcome {
        entry: ExMemEntry {
            alu,
            store_data: operands.rs2_val,
            ..passthrough
        },
        redirect,
        operands,
    }
}
