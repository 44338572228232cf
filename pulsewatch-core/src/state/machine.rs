//! Monitor phase state machine

use super::reason::RestartReason;

/// Lifecycle phase of the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MonitorPhase {
    /// History has not been filled with real data yet
    Priming,
    /// History has been full at least once; both watchdogs are live
    Armed,
    /// A restart was decided; the process is about to be reset
    Restarting(RestartReason),
}

/// Events that move the monitor between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhaseEvent {
    /// History buffer wrapped for the first time
    HistoryPrimed,
    /// History was reset after the signal recovered
    Recovered,
    /// A watchdog fired
    RestartTriggered(RestartReason),
}

impl MonitorPhase {
    /// Whether the monitor still processes ticks
    pub fn is_running(&self) -> bool {
        !matches!(self, MonitorPhase::Restarting(_))
    }

    /// Process an event and return the next phase
    pub fn transition(self, event: PhaseEvent) -> Self {
        use MonitorPhase::*;
        use PhaseEvent::*;

        match (self, event) {
            (Priming, HistoryPrimed) => Armed,
            // Recovery resets the buffer but never disarms
            (Armed, Recovered) => Armed,
            (Priming | Armed, RestartTriggered(reason)) => Restarting(reason),
            // Restarting is terminal; everything else stays put
            _ => self,
        }
    }
}
