//! Data Hazard Detection and Forwarding.
//!
//! This module implements the logic for maintaining pipeline consistency when data
//! dependencies exist between instructions. It provides:
//! 1. **Operand Forwarding:** Resolves Read-After-Write (RAW) hazards by bypassing
//!    EX/MEM and MEM/WB results into Execute.
//! 2. **Hazard Detection:** Identifies load-use hazards (and, with forwarding
//!    disabled, every in-flight RAW hazard) that require a Decode stall.
//! 3. **Arbitration:** Combines stall and flush requests into one decision.
//!
//! Everything here is a pure function of latch snapshots.

use serde::Serialize;

use crate::core::pipeline::latches::{ExMemEntry, IdExEntry, IfIdEntry, MemWbEntry};
use crate::isa::decode::decode;

/// Where an Execute operand comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ForwardSrc {
    /// The value read in Decode.
    #[default]
    RegFile,
    /// The instruction one stage ahead, now in Memory.
    ExMem,
    /// The instruction two stages ahead, now in Writeback.
    MemWb,
}

/// Forwarding decision for both Execute operands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Forwarded {
    /// Final `rs1` value.
    pub rs1_val: u32,
    /// Final `rs2` value.
    pub rs2_val: u32,
    /// Source chosen for `rs1`.
    pub rs1_src: ForwardSrc,
    /// Source chosen for `rs2`.
    pub rs2_src: ForwardSrc,
}

/// Stall/flush decision for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HazardControl {
    /// Hold the PC and IF/ID; insert a bubble into ID/EX.
    pub stall: bool,
    /// Squash IF/ID and the instruction leaving Decode; redirect the PC.
    pub flush: bool,
}

/// Chooses the source of one Execute operand.
///
/// The youngest older producer wins: EX/MEM, then MEM/WB, then the register
/// file. `x0` never forwards.
///
/// # Arguments
///
/// * `rs` - Source register index the consumer reads.
/// * `ex_mem` - Snapshot of the EX/MEM latch.
/// * `mem_wb` - Snapshot of the MEM/WB latch.
pub fn forward_source(
    rs: usize,
    ex_mem: Option<&ExMemEntry>,
    mem_wb: Option<&MemWbEntry>,
) -> ForwardSrc {
    if rs == 0 {
        return ForwardSrc::RegFile;
    }
    if ex_mem.is_some_and(|e| e.rd == rs && e.forward_value().is_some()) {
        return ForwardSrc::ExMem;
    }
    if mem_wb.is_some_and(|w| w.rd == rs && w.writes_reg()) {
        return ForwardSrc::MemWb;
    }
    ForwardSrc::RegFile
}

/// Forwards register values from later pipeline stages to resolve data hazards.
///
/// # Arguments
///
/// * `id_entry` - The instruction entering Execute.
/// * `ex_mem` - Snapshot of the EX/MEM latch (one instruction older).
/// * `mem_wb` - Snapshot of the MEM/WB latch (two instructions older).
///
/// # Returns
///
/// The operand values Execute must use and where each came from.
pub fn forward_rs(
    id_entry: &IdExEntry,
    ex_mem: Option<&ExMemEntry>,
    mem_wb: Option<&MemWbEntry>,
) -> Forwarded {
    let pick = |rs: usize, rf: u32| {
        let src = forward_source(rs, ex_mem, mem_wb);
        let val = match src {
            ForwardSrc::ExMem => ex_mem.and_then(ExMemEntry::forward_value).unwrap_or(rf),
            ForwardSrc::MemWb => mem_wb.map_or(rf, MemWbEntry::wb_value),
            ForwardSrc::RegFile => rf,
        };
        (val, src)
    };

    let (rs1_val, rs1_src) = pick(id_entry.rs1, id_entry.rv1);
    let (rs2_val, rs2_src) = pick(id_entry.rs2, id_entry.rv2);
    Forwarded {
        rs1_val,
        rs2_val,
        rs1_src,
        rs2_src,
    }
}

/// Source registers the IF/ID instruction actually reads.
///
/// Fields the instruction's format does not use read as `x0`, which never
/// creates a dependency. Faulted or undecodable entries read nothing.
pub fn sources(if_id: &IfIdEntry) -> (usize, usize) {
    if if_id.trap.is_some() {
        return (0, 0);
    }
    decode(if_id.inst).map_or((0, 0), |d| (d.src1(), d.src2()))
}

fn depends_on(if_id: &IfIdEntry, rd: usize) -> bool {
    let (rs1, rs2) = sources(if_id);
    rd != 0 && (rd == rs1 || rd == rs2)
}

/// Checks if a pipeline stall is needed due to a load-use data hazard.
///
/// A load-use hazard occurs when the instruction in Decode reads a register
/// that the load currently in Execute will write. The load's data exists only
/// after its Memory stage, so the consumer waits one cycle and then takes the
/// value from MEM/WB.
///
/// # Arguments
///
/// * `id_ex` - Snapshot of the ID/EX latch (the instruction in Execute).
/// * `if_id` - Snapshot of the IF/ID latch (the instruction in Decode).
///
/// # Returns
///
/// `true` if a stall is required to resolve the load-use hazard, `false` otherwise.
///
/// # Examples
///
/// ```
/// use rv32pipe_core::core::pipeline::hazards::need_stall_load_use;
/// use rv32pipe_core::core::pipeline::latches::{IdExEntry, IfIdEntry};
/// use rv32pipe_core::core::pipeline::signals::ControlSignals;
///
/// // ID/EX: lw x1, 0(x2)
/// let load = IdExEntry {
///     rd: 1,
///     ctrl: ControlSignals { mem_read: true, reg_write: true, ..Default::default() },
///     ..Default::default()
/// };
/// // IF/ID: add x3, x1, x4
/// let user = IfIdEntry { pc: 4, inst: 0x0040_81B3, trap: None };
///
/// assert!(need_stall_load_use(Some(&load), Some(&user)));
/// ```
pub fn need_stall_load_use(id_ex: Option<&IdExEntry>, if_id: Option<&IfIdEntry>) -> bool {
    let (Some(ex), Some(id)) = (id_ex, if_id) else {
        return false;
    };
    ex.ctrl.mem_read && ex.ctrl.reg_write && ex.trap.is_none() && depends_on(id, ex.rd)
}

/// Checks if Decode must wait because forwarding is disabled.
///
/// Without bypass paths, a consumer may only read its operands once the
/// producer is in Writeback, where the register file's write-first read
/// supplies the value. Any producer still in Execute or Memory forces a stall.
///
/// # Arguments
///
/// * `if_id` - Snapshot of the IF/ID latch.
/// * `id_ex` - Snapshot of the ID/EX latch.
/// * `ex_mem` - Snapshot of the EX/MEM latch.
pub fn need_stall_interlock(
    if_id: Option<&IfIdEntry>,
    id_ex: Option<&IdExEntry>,
    ex_mem: Option<&ExMemEntry>,
) -> bool {
    let Some(id) = if_id else {
        return false;
    };
    let in_execute = id_ex
        .filter(|e| e.ctrl.reg_write && e.trap.is_none())
        .is_some_and(|e| depends_on(id, e.rd));
    let in_memory = ex_mem
        .filter(|e| e.writes_reg())
        .is_some_and(|e| depends_on(id, e.rd));
    in_execute || in_memory
}

/// Combines a stall request with Execute's redirect.
///
/// A flush wins over a stall: the instruction the stall would hold is on
/// the wrong path and is discarded instead.
pub const fn arbitrate(stall: bool, redirect: Option<u32>) -> HazardControl {
    let flush = redirect.is_some();
    HazardControl {
        stall: stall && !flush,
        flush,
    }
}
