//! Event log trait

use crate::monitor::MonitorEvent;

/// Receives structured monitor events
///
/// Firmware forwards them to defmt; tests collect them.
pub trait EventLog {
    fn record(&mut self, event: &MonitorEvent);
}

/// Discards every event
impl EventLog for () {
    fn record(&mut self, _event: &MonitorEvent) {}
}
