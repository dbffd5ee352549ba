//! Stall/Flush Arbitration Tests.
//!
//! A taken branch or jump in Execute redirects the PC and squashes the two
//! younger instructions; when that coincides with a stall request the flush
//! wins, since the stalled instruction is on the wrong path.

use rv32pipe_core::core::pipeline::hazards::{HazardControl, arbitrate};

#[test]
fn quiet_cycle() {
    assert_eq!(arbitrate(false, None), HazardControl::default());
}

#[test]
fn stall_alone() {
    let h = arbitrate(true, None);
    assert!(h.stall && !h.flush);
}

#[test]
fn redirect_flushes() {
    let h = arbitrate(false, Some(0x100));
    assert!(h.flush && !h.stall);
}

#[test]
fn flush_wins_over_stall() {
    let h = arbitrate(true, Some(0x100));
    assert!(h.flush, "redirect must be honoured");
    assert!(!h.stall, "stall of a wrong-path instruction is dropped");
}
