//! Bounded frame history
//!
//! A fixed-size ring of [`StoredFrame`]s written only while a finger is on
//! the sensor. A full ring where every frame fails the stored check means
//! the hub is producing sustained garbage. A few plausible frames reset the
//! ring and cancel that verdict.

use heapless::Vec;

use crate::config::{HistoryConfig, ValidityLimits, MAX_HISTORY_CAPACITY};
use crate::frame::{Frame, StoredFrame};
use crate::validate::is_stored_valid;

/// What a write told us about the signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HistorySignal {
    /// Nothing conclusive yet
    Pending,
    /// Enough plausible frames arrived; the buffer has been reset
    Recovered,
    /// Buffer is primed and every entry is invalid
    Exhausted,
}

/// Result of [`HistoryBuffer::record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HistoryWrite {
    /// Slot the frame was written to
    pub index: usize,
    /// Copy that was stored
    pub entry: StoredFrame,
    /// Write index wrapped to 0 on this write
    pub wrapped: bool,
    pub signal: HistorySignal,
}

/// Fixed-capacity ring of stored frames
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: Vec<StoredFrame, MAX_HISTORY_CAPACITY>,
    write_index: usize,
    primed: bool,
    recovery_count: u8,
    valid_frame_threshold: u8,
    limits: ValidityLimits,
}

impl HistoryBuffer {
    /// Create a buffer filled with sentinels
    ///
    /// Capacity is clamped to `1..=MAX_HISTORY_CAPACITY`;
    /// [`MonitorConfig::validate`](crate::MonitorConfig::validate) rejects
    /// anything outside that range before it gets here.
    pub fn new(config: &HistoryConfig, limits: ValidityLimits) -> Self {
        let capacity = config.capacity.clamp(1, MAX_HISTORY_CAPACITY);
        let mut entries = Vec::new();
        // Cannot fail, capacity is clamped to the Vec bound
        let _ = entries.resize(capacity, StoredFrame::SENTINEL);

        Self {
            entries,
            write_index: 0,
            primed: false,
            recovery_count: 0,
            valid_frame_threshold: config.valid_frame_threshold.max(1),
            limits,
        }
    }

    /// Store a copy of `frame` and evaluate the buffer
    ///
    /// Callers only record frames taken with a finger present.
    pub fn record(&mut self, frame: &Frame) -> HistoryWrite {
        let index = self.write_index;
        let entry = frame.reduce();
        self.entries[index] = entry;

        self.write_index = (index + 1) % self.entries.len();
        let wrapped = self.write_index == 0;
        if wrapped {
            self.primed = true;
        }

        let stored_valid = is_stored_valid(&entry, &self.limits);
        let signal = if stored_valid {
            self.recovery_count = self.recovery_count.saturating_add(1);
            if self.recovery_count >= self.valid_frame_threshold {
                self.reset();
                HistorySignal::Recovered
            } else {
                HistorySignal::Pending
            }
        } else if self.primed && self.all_invalid() {
            HistorySignal::Exhausted
        } else {
            HistorySignal::Pending
        };

        HistoryWrite {
            index,
            entry,
            wrapped,
            signal,
        }
    }

    /// Refill with sentinels and start priming again
    pub fn reset(&mut self) {
        self.entries.fill(StoredFrame::SENTINEL);
        self.write_index = 0;
        self.primed = false;
        self.recovery_count = 0;
    }

    /// Whether every entry fails the stored check
    pub fn all_invalid(&self) -> bool {
        self.entries
            .iter()
            .all(|entry| !is_stored_valid(entry, &self.limits))
    }

    /// Whether the buffer is primed and every entry is invalid
    pub fn is_exhausted(&self) -> bool {
        self.primed && self.all_invalid()
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[StoredFrame] {
        &self.entries
    }

    pub fn write_index(&self) -> usize {
        self.write_index
    }

    pub fn is_primed(&self) -> bool {
        self.primed
    }

    pub fn recovery_count(&self) -> u8 {
        self.recovery_count
    }
}
