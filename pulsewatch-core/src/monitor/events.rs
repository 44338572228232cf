//! Structured monitor events
//!
//! Everything the log collaborator receives. Each tick produces a handful of
//! these; the firmware maps them to defmt log levels.

use crate::frame::{Frame, StoredFrame};
use crate::state::RestartReason;
use crate::traits::{DisplayError, SensorError};

/// Events emitted while processing ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MonitorEvent {
    /// Raw reading for this tick
    Reading(Frame),
    /// Sensor could not be read this tick
    SensorFault(SensorError),
    /// Frame written to history
    HistoryWrite { index: u8, entry: StoredFrame },
    /// History wrapped for the first time; watchdogs armed
    HistoryPrimed,
    /// Known hub glitch kept off the display
    GlitchIgnored(Frame),
    /// Disconnected flag went up
    ConnectionLost,
    /// Disconnected flag went down
    ConnectionRestored,
    /// Enough plausible frames arrived; history reset
    Recovered { valid_frames: u8 },
    /// A watchdog was suppressed by the frozen display
    FreezeHold(RestartReason),
    /// Display rejected an update
    DisplayFault(DisplayError),
    /// Restart decided
    Restart(RestartReason),
}
