//! Monitor lifecycle
//!
//! The monitor primes its history, then arms both watchdogs. A restart is
//! terminal: the process is reset and starts over from `Priming`.

pub mod machine;
pub mod reason;

pub use machine::{MonitorPhase, PhaseEvent};
pub use reason::RestartReason;
