//! Memory Access (MEM) Stage.
//!
//! This module implements the fourth stage of the instruction pipeline.
//! Loads and stores issue exactly one request to the data memory; the load
//! result is sign- or zero-extended here. Every other instruction passes its
//! ALU result through without touching memory.

use tracing::trace;

use crate::core::pipeline::latches::{ExMemEntry, MemWbEntry};
use crate::soc::memory::MemRequest;
use crate::soc::traits::DataMemory;

/// Builds the data-memory request for an entry, if it has one.
///
/// Only loads and stores without a pending fault produce a request.
pub const fn mem_request(ex_mem: &ExMemEntry) -> Option<MemRequest> {
    if ex_mem.trap.is_some() {
        return None;
    }
    let ctrl = &ex_mem.ctrl;
    if ctrl.mem_read {
        Some(MemRequest::load(ex_mem.alu, ctrl.width))
    } else if ctrl.mem_write {
        Some(MemRequest::store(
            ex_mem.alu,
            ctrl.width,
            ex_mem.store_data & ctrl.width.mask(),
        ))
    } else {
        None
    }
}

/// Executes the memory access stage.
///
/// # Arguments
///
/// * `ex_mem` - Snapshot of the EX/MEM entry.
/// * `dmem` - The data memory.
///
/// # Returns
///
/// The MEM/WB entry and the request that was issued, if any. A fault from
/// the data memory is recorded on the entry.
pub fn mem_stage(
    ex_mem: &ExMemEntry,
    dmem: &mut dyn DataMemory,
) -> (MemWbEntry, Option<MemRequest>) {
    let mut entry = MemWbEntry {
        pc: ex_mem.pc,
        inst: ex_mem.inst,
        rd: ex_mem.rd,
        alu: ex_mem.alu,
        load_data: 0,
        ctrl: ex_mem.ctrl,
        trap: ex_mem.trap,
    };

    let req = mem_request(ex_mem);
    if let Some(req) = req {
        match dmem.access(&req) {
            Ok(raw) if !req.write => {
                entry.load_data = if ex_mem.ctrl.signed_load {
                    req.size.sign_extend(raw)
                } else {
                    raw
                };
            }
            Ok(_) => {}
            Err(trap) => entry.trap = Some(trap),
        }
        trace!(
            pc = format_args!("{:#010x}", ex_mem.pc),
            addr = format_args!("{:#010x}", req.addr),
            write = req.write,
            size = req.size.bytes(),
            "MEM"
        );
    }

    (entry, req)
}
