//! Last-known-good display values
//!
//! The cache is written only when the connection tracker accepts a frame.
//! Between accepted frames it is frozen, and the renderer keeps showing it.

use crate::frame::{Frame, SensorStatus};

/// Values last accepted for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayCache {
    last_heart_rate: u16,
    last_confidence: u8,
    last_oxygen: u16,
    last_status: SensorStatus,
    last_update_at: u32,
}

impl DisplayCache {
    /// Empty cache, stamped at `now_ms`
    pub fn new(now_ms: u32) -> Self {
        Self {
            last_heart_rate: 0,
            last_confidence: 0,
            last_oxygen: 0,
            last_status: SensorStatus::NoObject,
            last_update_at: now_ms,
        }
    }

    /// Take the values of an accepted frame
    pub fn update(&mut self, frame: &Frame, now_ms: u32) {
        self.last_heart_rate = frame.heart_rate;
        self.last_confidence = frame.confidence;
        self.last_oxygen = frame.oxygen;
        self.last_status = frame.status;
        self.last_update_at = now_ms;
    }

    pub fn heart_rate(&self) -> u16 {
        self.last_heart_rate
    }

    pub fn confidence(&self) -> u8 {
        self.last_confidence
    }

    pub fn oxygen(&self) -> u16 {
        self.last_oxygen
    }

    pub fn status(&self) -> SensorStatus {
        self.last_status
    }

    pub fn last_update_at(&self) -> u32 {
        self.last_update_at
    }

    /// Milliseconds since the cache was last written
    pub fn age_ms(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.last_update_at)
    }

    /// Whether the cache holds a real reading rather than zeros
    pub fn holds_reading(&self) -> bool {
        self.last_heart_rate != 0 || self.last_confidence != 0
    }

    /// Build what the display should show this tick
    ///
    /// `status` is the current frame's status; readings are blanked while no
    /// finger is detected, whatever the cache holds.
    pub fn view(&self, status: SensorStatus, disconnected: bool) -> DisplayView {
        let finger = status.finger_present();
        let heart_rate = if finger { self.last_heart_rate } else { 0 };
        let confidence = if finger { self.last_confidence } else { 0 };
        let oxygen = if finger { self.last_oxygen } else { 0 };

        DisplayView {
            heart_rate,
            confidence,
            oxygen,
            status_message: status.message(),
            show_heart_glyph: finger && heart_rate > 0,
            show_freeze_marker: disconnected,
        }
    }
}

/// Per-tick output for the display renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayView {
    pub heart_rate: u16,
    pub confidence: u8,
    pub oxygen: u16,
    pub status_message: &'static str,
    /// Draw the heart next to the heart rate
    pub show_heart_glyph: bool,
    /// Mark the values as frozen (sensor disconnected)
    pub show_freeze_marker: bool,
}
