/// Stall/flush arbitration.
pub mod control_hazards;


/// Interlock stalls when forwarding is disabled.
pub mod interlock;
