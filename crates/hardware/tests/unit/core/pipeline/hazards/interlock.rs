//! Interlock Tests (forwarding disabled).
//!
//! Without the bypass network, Decode must wait while a producer of one of
//! its sources is in Execute or Memory. Once the producer reaches Writeback
//! the register file's write-first port supplies the value.

use rv32pipe_core::core::pipeline::hazards::need_stall_interlock;
use rv32pipe_core::core::pipeline::latches::IfIdEntry;

use crate::common::builder::instruction::asm;
use crate::common::builder::pipeline_state::{IdExBuilder, IfIdBuilder, ex_alu, ex_load};

fn decode_of(inst: u32) -> IfIdEntry {
    IfIdBuilder::new().inst(inst).build()
}

#[test]
fn producer_in_execute_stalls() {
    let producer = IdExBuilder::decode(0, asm::addi(3, 0, 1)).build();
    assert!(need_stall_interlock(
        Some(&decode_of(asm::add(4, 3, 0))),
        Some(&producer),
        None
    ));
}

#[test]
fn producer_in_memory_stalls() {
    let producer = ex_alu(3, 1);
    assert!(need_stall_interlock(
        Some(&decode_of(asm::add(4, 0, 3))),
        None,
        Some(&producer)
    ));
    assert!(need_stall_interlock(
        Some(&decode_of(asm::add(4, 0, 3))),
        None,
        Some(&ex_load(3, 0))
    ));
}

#[test]
fn unrelated_producers_do_not_stall() {
    let producer = IdExBuilder::decode(0, asm::addi(3, 0, 1)).build();
    assert!(!need_stall_interlock(
        Some(&decode_of(asm::add(4, 5, 6))),
        Some(&producer),
        Some(&ex_alu(7, 0))
    ));
}

#[test]
fn writes_to_x0_do_not_stall() {
    let producer = IdExBuilder::decode(0, asm::addi(0, 0, 1)).build();
    assert!(!need_stall_interlock(
        Some(&decode_of(asm::add(4, 0, 0))),
        Some(&producer),
        Some(&ex_alu(0, 0))
    ));
}

#[test]
fn store_in_execute_does_not_stall() {
    let store = IdExBuilder::decode(0, asm::sw(2, 3, 0)).build();
    assert!(!need_stall_interlock(
        Some(&decode_of(asm::add(4, 0, 0))),
        Some(&store),
        None
    ));
}

#[test]
fn empty_decode_never_stalls() {
    let producer = IdExBuilder::decode(0, asm::addi(3, 0, 1)).build();
    assert!(!need_stall_interlock(None, Some(&producer), None));
}
