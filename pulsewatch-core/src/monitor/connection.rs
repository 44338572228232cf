//! Connection inference
//!
//! Decides whether the current frame may update the display and whether
//! the sensor should be considered disconnected. Once a connection has been
//! seen, rejections only flip the flag after the grace window has passed.

use crate::frame::Frame;

use super::display::DisplayCache;

/// What the tracker did with a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Acceptance {
    /// Frame written to the display cache
    Accepted,
    /// Known hub glitch: finger on, HR/confidence dropped to zero while
    /// oxygen stayed plausible
    GlitchIgnored,
    /// Frame rejected
    Rejected,
}

impl Acceptance {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Acceptance::Accepted)
    }
}

/// Result of a tracker update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionUpdate {
    pub acceptance: Acceptance,
    /// Disconnected flag before this frame
    pub was_disconnected: bool,
    /// Disconnected flag after this frame
    pub disconnected: bool,
}

impl ConnectionUpdate {
    pub fn lost(&self) -> bool {
        !self.was_disconnected && self.disconnected
    }

    pub fn restored(&self) -> bool {
        self.was_disconnected && !self.disconnected
    }
}

/// Connection state
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    disconnected: bool,
    has_ever_connected: bool,
    last_connected_at: u32,
    grace_period_ms: u32,
}

impl ConnectionTracker {
    pub fn new(grace_period_ms: u32, now_ms: u32) -> Self {
        Self {
            disconnected: false,
            has_ever_connected: false,
            last_connected_at: now_ms,
            grace_period_ms,
        }
    }

    /// Acceptance policy, first match wins
    pub fn decide(frame: &Frame, live_valid: bool) -> Acceptance {
        let finger_present = frame.finger_present();
        let oxygen_plausible = frame.oxygen > 0;

        if live_valid || !finger_present {
            Acceptance::Accepted
        } else if oxygen_plausible {
            Acceptance::GlitchIgnored
        } else if frame.heart_rate != 0 && frame.confidence != 0 {
            // Oxygen channel dropped out but HR/confidence still carry data
            Acceptance::Accepted
        } else {
            Acceptance::Rejected
        }
    }

    /// Apply one frame
    ///
    /// Accepted frames are written to `cache`.
    pub fn update(
        &mut self,
        frame: &Frame,
        live_valid: bool,
        now_ms: u32,
        cache: &mut DisplayCache,
    ) -> ConnectionUpdate {
        let was_disconnected = self.disconnected;
        let acceptance = Self::decide(frame, live_valid);

        if acceptance.is_accepted() {
            cache.update(frame, now_ms);
            self.disconnected = false;
            self.has_ever_connected = true;
            self.last_connected_at = now_ms;
        } else if !self.has_ever_connected
            || self.since_connected_ms(now_ms) > self.grace_period_ms
        {
            self.disconnected = true;
        }

        ConnectionUpdate {
            acceptance,
            was_disconnected,
            disconnected: self.disconnected,
        }
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    pub fn has_ever_connected(&self) -> bool {
        self.has_ever_connected
    }

    pub fn last_connected_at(&self) -> u32 {
        self.last_connected_at
    }

    /// Milliseconds since the last accepted frame
    pub fn since_connected_ms(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.last_connected_at)
    }
}
