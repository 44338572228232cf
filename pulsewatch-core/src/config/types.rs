//! Configuration type definitions
//!
//! These types hold the thresholds and timeouts of the monitor. Firmware
//! reads them from `monitor.toml` at build time; host code usually starts
//! from [`MonitorConfig::default`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest history buffer the monitor can be configured with
pub const MAX_HISTORY_CAPACITY: usize = 64;

/// Upper bound of a plausible oxygen saturation reading (%)
pub const MAX_OXYGEN: u16 = 100;

/// Configuration errors reported by [`MonitorConfig::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `min_heart_rate` is not below `max_heart_rate`
    BadHeartRateRange,
    /// `min_oxygen` is above 100
    BadOxygenFloor,
    /// History capacity is zero or above [`MAX_HISTORY_CAPACITY`]
    BadCapacity,
    /// Recovery threshold is zero
    BadThreshold,
    /// Tick period is zero
    ZeroTickPeriod,
    /// One of the watchdog timeouts is zero
    ZeroTimeout,
}

impl ConfigError {
    /// One-line explanation naming the offending keys
    pub fn message(&self) -> &'static str {
        match self {
            ConfigError::BadHeartRateRange => "limits.min_heart_rate must be below max_heart_rate",
            ConfigError::BadOxygenFloor => "limits.min_oxygen must be at most 100",
            ConfigError::BadCapacity => "history.capacity must be between 1 and 64",
            ConfigError::BadThreshold => "history.valid_frame_threshold must be at least 1",
            ConfigError::ZeroTickPeriod => "timing.tick_period_ms must be nonzero",
            ConfigError::ZeroTimeout => "timing timeouts must be nonzero",
        }
    }
}

/// Plausibility limits used when scoring stored frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ValidityLimits {
    /// Lowest plausible heart rate (BPM)
    pub min_heart_rate: u16,
    /// Highest plausible heart rate (BPM)
    pub max_heart_rate: u16,
    /// Lowest acceptable algorithm confidence (%)
    pub min_confidence: u8,
    /// Lowest plausible oxygen saturation (%)
    pub min_oxygen: u16,
}

impl ValidityLimits {
    pub const DEFAULT: Self = Self {
        min_heart_rate: 30,
        max_heart_rate: 220,
        min_confidence: 1,
        min_oxygen: 1,
    };
}

impl Default for ValidityLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// History buffer sizing and recovery policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HistoryConfig {
    /// Number of stored frames; also the number of consecutive bad frames
    /// needed to trigger a buffer-based restart
    pub capacity: usize,
    /// Stored-valid writes needed to declare the signal recovered
    pub valid_frame_threshold: u8,
}

impl HistoryConfig {
    pub const DEFAULT: Self = Self {
        capacity: 20,
        valid_frame_threshold: 3,
    };
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Timeouts, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Invalid readings with a finger present for longer than this restart
    /// the monitor
    pub max_invalid_time_ms: u32,
    /// Stale display age after which a disconnected display counts as frozen
    pub freeze_timeout_ms: u32,
    /// Rejections within this window of the last accepted frame are transient
    pub grace_period_ms: u32,
    /// Delay between ticks
    pub tick_period_ms: u32,
}

impl TimingConfig {
    pub const DEFAULT: Self = Self {
        max_invalid_time_ms: 30_000,
        freeze_timeout_ms: 3_000,
        grace_period_ms: 5_000,
        tick_period_ms: 1_000,
    };
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Complete monitor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonitorConfig {
    pub limits: ValidityLimits,
    pub history: HistoryConfig,
    pub timing: TimingConfig,
}

impl MonitorConfig {
    /// Defaults as a constant, usable in `static` and `const` contexts
    pub const DEFAULT: Self = Self {
        limits: ValidityLimits::DEFAULT,
        history: HistoryConfig::DEFAULT,
        timing: TimingConfig::DEFAULT,
    };

    /// Check that the configuration is internally consistent
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.min_heart_rate >= self.limits.max_heart_rate {
            return Err(ConfigError::BadHeartRateRange);
        }
        if self.limits.min_oxygen > MAX_OXYGEN {
            return Err(ConfigError::BadOxygenFloor);
        }
        if self.history.capacity == 0 || self.history.capacity > MAX_HISTORY_CAPACITY {
            return Err(ConfigError::BadCapacity);
        }
        if self.history.valid_frame_threshold == 0 {
            return Err(ConfigError::BadThreshold);
        }
        if self.timing.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.timing.max_invalid_time_ms == 0
            || self.timing.freeze_timeout_ms == 0
            || self.timing.grace_period_ms == 0
        {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Time window covered by a full history buffer
    pub fn history_window_ms(&self) -> u32 {
        (self.history.capacity as u32).saturating_mul(self.timing.tick_period_ms)
    }
}
