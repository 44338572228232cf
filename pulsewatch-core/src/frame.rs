//! Sensor frames
//!
//! A [`Frame`] is one reading delivered by the sensor hub per tick. A
//! [`StoredFrame`] is the compact copy kept in the history buffer.

/// Heart rate value the hub reports for a corrupt sample
pub const CORRUPT_HEART_RATE: u16 = u16::MAX;

/// Confidence value the hub reports for a corrupt sample
pub const CORRUPT_CONFIDENCE: u8 = u8::MAX;

/// Oxygen value treated as corrupt in stored frames
pub const CORRUPT_OXYGEN: u16 = 255;

/// Finger detection status reported by the sensor hub
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorStatus {
    /// Nothing on the sensor
    NoObject,
    /// Something on the sensor, still classifying
    Object,
    /// Object detected that is not clearly a finger
    NonFinger,
    /// Finger detected
    Finger,
    /// Code outside the documented range
    Unknown(u8),
}

impl SensorStatus {
    /// Decode a raw status byte
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => SensorStatus::NoObject,
            1 => SensorStatus::Object,
            2 => SensorStatus::NonFinger,
            3 => SensorStatus::Finger,
            other => SensorStatus::Unknown(other),
        }
    }

    /// Raw status byte
    pub const fn raw(self) -> u8 {
        match self {
            SensorStatus::NoObject => 0,
            SensorStatus::Object => 1,
            SensorStatus::NonFinger => 2,
            SensorStatus::Finger => 3,
            SensorStatus::Unknown(raw) => raw,
        }
    }

    /// Whether the hub considers a finger to be on the sensor (`status > 1`)
    pub const fn finger_present(self) -> bool {
        self.raw() > 1
    }

    /// Short text shown on the display for this status
    pub const fn message(self) -> &'static str {
        match self {
            SensorStatus::NoObject => "No Finger",
            SensorStatus::Object => "Searching",
            SensorStatus::NonFinger => "Reading...",
            SensorStatus::Finger => "Finger On",
            SensorStatus::Unknown(_) => "Unknown",
        }
    }
}

impl From<u8> for SensorStatus {
    fn from(raw: u8) -> Self {
        Self::from_raw(raw)
    }
}

/// One sensor reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Heart rate (BPM)
    pub heart_rate: u16,
    /// Algorithm confidence (%)
    pub confidence: u8,
    /// Oxygen saturation (%)
    pub oxygen: u16,
    /// Finger detection status
    pub status: SensorStatus,
}

impl Frame {
    pub const fn new(heart_rate: u16, confidence: u8, oxygen: u16, status: SensorStatus) -> Self {
        Self {
            heart_rate,
            confidence,
            oxygen,
            status,
        }
    }

    /// A finger-absent frame with every channel at zero
    pub const fn silent() -> Self {
        Self::new(0, 0, 0, SensorStatus::NoObject)
    }

    pub const fn finger_present(&self) -> bool {
        self.status.finger_present()
    }

    /// Whether either channel carries the hub's corrupt-sample marker
    pub const fn is_corrupt(&self) -> bool {
        self.heart_rate == CORRUPT_HEART_RATE || self.confidence == CORRUPT_CONFIDENCE
    }

    /// Compact copy for the history buffer
    pub const fn reduce(&self) -> StoredFrame {
        StoredFrame {
            heart_rate: self.heart_rate,
            confidence: self.confidence,
            oxygen: self.oxygen,
            status: self.status.raw(),
        }
    }
}

/// Compact copy of a [`Frame`] kept in history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StoredFrame {
    pub heart_rate: u16,
    pub confidence: u8,
    pub oxygen: u16,
    pub status: u8,
}

impl StoredFrame {
    /// Placeholder for slots that have not received real data yet
    ///
    /// Every channel carries a corrupt marker, so it never scores as valid.
    pub const SENTINEL: Self = Self {
        heart_rate: CORRUPT_HEART_RATE,
        confidence: CORRUPT_CONFIDENCE,
        oxygen: CORRUPT_OXYGEN,
        status: 0,
    };

    pub const fn is_sentinel(&self) -> bool {
        self.heart_rate == CORRUPT_HEART_RATE
            || self.confidence == CORRUPT_CONFIDENCE
            || self.oxygen == CORRUPT_OXYGEN
    }
}
