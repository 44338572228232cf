//! Restart supervisor
//!
//! Two independent watchdogs decide when the monitor has degraded enough to
//! restart:
//!
//! - The buffer watchdog fires when a primed history holds nothing but
//!   invalid frames. With the default capacity and tick period it is the
//!   faster of the two.
//! - The duration watchdog fires when readings stay invalid with a finger
//!   present for longer than `max_invalid_time_ms`. It covers cases the
//!   buffer cannot see, such as a buffer that never primes.
//!
//! Both are suppressed while the display is frozen on real data: the user is
//! looking at stale but genuine numbers, which is an acceptable steady state.

use crate::config::TimingConfig;
use crate::state::RestartReason;

use super::display::DisplayCache;

/// Per-tick facts the watchdogs need
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchdogInput {
    pub finger_present: bool,
    pub live_valid: bool,
    pub disconnected: bool,
    /// History reported every entry invalid on this tick
    pub history_exhausted: bool,
}

impl WatchdogInput {
    /// Input for a tick on which the sensor could not be read
    ///
    /// No reading is not a good reading: the duration watchdog keeps
    /// counting, so a sensor that stops answering ends in a restart.
    pub fn sensor_fault(disconnected: bool) -> Self {
        Self {
            finger_present: true,
            live_valid: false,
            disconnected,
            history_exhausted: false,
        }
    }
}

/// Supervisor decision for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Watch {
    /// Nothing to do
    Clear,
    /// A watchdog would have fired but the frozen display suppressed it
    Held(RestartReason),
    /// Restart now
    Fire(RestartReason),
}

/// Whether the display is frozen on stale but real data
///
/// True when disconnected, the cache is older than the freeze timeout, and
/// it holds a nonzero heart rate or confidence.
pub fn frozen_proper_display(
    disconnected: bool,
    cache: &DisplayCache,
    now_ms: u32,
    freeze_timeout_ms: u32,
) -> bool {
    disconnected && cache.age_ms(now_ms) > freeze_timeout_ms && cache.holds_reading()
}

/// Duration and buffer watchdogs
#[derive(Debug, Clone)]
pub struct RestartSupervisor {
    last_good_at: u32,
    timing: TimingConfig,
    buffer_frames: u16,
}

impl RestartSupervisor {
    /// `buffer_frames` is the capacity of the history being watched, as
    /// reported by [`HistoryBuffer::capacity`](super::HistoryBuffer::capacity)
    pub fn new(timing: TimingConfig, buffer_frames: usize, now_ms: u32) -> Self {
        Self {
            last_good_at: now_ms,
            timing,
            buffer_frames: buffer_frames as u16,
        }
    }

    /// Evaluate both watchdogs for this tick
    pub fn evaluate(&mut self, input: &WatchdogInput, cache: &DisplayCache, now_ms: u32) -> Watch {
        let frozen = frozen_proper_display(
            input.disconnected,
            cache,
            now_ms,
            self.timing.freeze_timeout_ms,
        );

        let buffer = self.check_buffer(input.history_exhausted, frozen);
        let duration = self.check_duration(input, frozen, now_ms);

        match (buffer, duration) {
            (Watch::Fire(reason), _) | (_, Watch::Fire(reason)) => Watch::Fire(reason),
            (Watch::Held(reason), _) | (_, Watch::Held(reason)) => Watch::Held(reason),
            _ => Watch::Clear,
        }
    }

    fn check_buffer(&self, exhausted: bool, frozen: bool) -> Watch {
        if !exhausted {
            return Watch::Clear;
        }

        let reason = RestartReason::Buffer {
            frames: self.buffer_frames,
        };
        if frozen {
            Watch::Held(reason)
        } else {
            Watch::Fire(reason)
        }
    }

    fn check_duration(&mut self, input: &WatchdogInput, frozen: bool, now_ms: u32) -> Watch {
        let invalid_for = self.invalid_for_ms(now_ms);

        if !input.finger_present || input.live_valid {
            self.last_good_at = now_ms;
            return Watch::Clear;
        }

        let reason = RestartReason::Duration {
            invalid_ms: self.timing.max_invalid_time_ms,
        };

        if frozen {
            // A frozen display counts as good; report it only if it saved us
            self.last_good_at = now_ms;
            if invalid_for > self.timing.max_invalid_time_ms {
                return Watch::Held(reason);
            }
            return Watch::Clear;
        }

        if invalid_for > self.timing.max_invalid_time_ms {
            Watch::Fire(reason)
        } else {
            Watch::Clear
        }
    }

    /// Milliseconds since the last good tick
    pub fn invalid_for_ms(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.last_good_at)
    }

    pub fn last_good_at(&self) -> u32 {
        self.last_good_at
    }
}
