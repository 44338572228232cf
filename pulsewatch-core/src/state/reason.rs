//! Restart reasons
//!
//! A restart carries the trigger that fired and the threshold it crossed.
//! Log lines and display text are both derived from this value.

use core::fmt;

/// Why the supervisor decided to restart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RestartReason {
    /// Readings stayed invalid with a finger present for longer than the
    /// configured limit
    Duration {
        /// Limit that was exceeded (ms)
        invalid_ms: u32,
    },
    /// Every frame in a full history buffer failed the stored check
    Buffer {
        /// Number of consecutive bad frames (the buffer capacity)
        frames: u16,
    },
}

impl RestartReason {
    /// Trigger name used in logs
    pub const fn kind(&self) -> &'static str {
        match self {
            RestartReason::Duration { .. } => "duration-based",
            RestartReason::Buffer { .. } => "buffer-based",
        }
    }

    /// Threshold value that fired
    pub const fn threshold(&self) -> u32 {
        match self {
            RestartReason::Duration { invalid_ms } => *invalid_ms,
            RestartReason::Buffer { frames } => *frames as u32,
        }
    }

    /// First line of the restart notice on the display
    pub const fn headline(&self) -> &'static str {
        match self {
            RestartReason::Duration { .. } => "Sensor timeout",
            RestartReason::Buffer { .. } => "Bad sensor data",
        }
    }

    /// Second line of the restart notice, e.g. `30s invalid`
    pub fn detail(&self) -> heapless::String<21> {
        use core::fmt::Write;

        let mut line = heapless::String::new();
        // 21 chars always fits both formats
        let _ = match self {
            RestartReason::Duration { invalid_ms } => {
                write!(line, "{}s invalid", invalid_ms / 1000)
            }
            RestartReason::Buffer { frames } => write!(line, "{} bad frames", frames),
        };
        line
    }
}

impl fmt::Display for RestartReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartReason::Duration { invalid_ms } => write!(
                f,
                "{}, {} ms of invalid readings while finger present",
                self.kind(),
                invalid_ms
            ),
            RestartReason::Buffer { frames } => {
                write!(f, "{}, {} consecutive invalid frames", self.kind(), frames)
            }
        }
    }
}
