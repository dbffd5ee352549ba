//! Writeback (WB) Stage.
//!
//! This module implements the final stage of the instruction pipeline. It
//! produces the single register-file write of the cycle and reports
//! whatever ends the simulation: a trap carried by the entry, or an ECALL
//! or EBREAK reaching commit.

use tracing::trace;

use crate::common::error::Trap;
use crate::common::reg::RegWrite;
use crate::core::pipeline::latches::MemWbEntry;
use crate::core::pipeline::signals::SystemOp;

/// What committing an entry does besides (or instead of) writing a register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commit {
    /// Normal retirement.
    Retire,
    /// The entry carries a fault; nothing is written.
    Trap(Trap),
    /// ECALL or EBREAK retired.
    System(SystemOp),
}

/// Executes the writeback stage.
///
/// # Arguments
///
/// * `mem_wb` - Snapshot of the MEM/WB entry.
///
/// # Returns
///
/// The register write (disabled for `x0`, branches, stores and faults) and
/// the commit outcome.
pub fn wb_stage(mem_wb: &MemWbEntry) -> (RegWrite, Commit) {
    if let Some(trap) = mem_wb.trap {
        return (RegWrite::default(), Commit::Trap(trap));
    }

    let write = RegWrite {
        enable: mem_wb.writes_reg(),
        rd: mem_wb.rd,
        data: mem_wb.wb_value(),
    };
    if write.enable {
        trace!(
            pc = format_args!("{:#010x}", mem_wb.pc),
            rd = write.rd,
            data = format_args!("{:#010x}", write.data),
            "WB"
        );
    }

    let commit = match mem_wb.ctrl.system {
        SystemOp::None => Commit::Retire,
        sys => Commit::System(sys),
    };
    (write, commit)
}
