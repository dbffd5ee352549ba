//! The five-stage pipeline: IF, ID, EX, MEM, WB.
//!
//! Stages are plain functions over latch snapshots; the cycle driver in
//! [`crate::core::cpu`] calls them in reverse order and commits the results.
//! 1. **Hazards:** Forwarding selection, stall detection and stall/flush arbitration.
//! 2. **Latches:** The IF/ID, ID/EX, EX/MEM and MEM/WB entries.
//! 3. **Signals:** Control signals Decode produces for the later stages.
//! 4. **Stages:** One module per stage.

/// Forwarding, load-use and interlock detection.
pub mod hazards;

/// Inter-stage latch entries.
pub mod latches;

/// Decoded control signals.
pub mod signals;

/// Fetch, Decode, Execute, Memory and Writeback.
pub mod stages;
