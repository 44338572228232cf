//! Tick processing
//!
//! [`Monitor`] is the single state record owned by the tick loop. Each tick
//! runs the frame through validation, connection tracking, history and the
//! restart supervisor, in that order, and reports what the display should
//! show, what to log, and whether to restart.

pub mod connection;
pub mod display;
pub mod events;
pub mod history;
pub mod supervisor;

pub use connection::{Acceptance, ConnectionTracker, ConnectionUpdate};
pub use display::{DisplayCache, DisplayView};
pub use events::MonitorEvent;
pub use history::{HistoryBuffer, HistorySignal, HistoryWrite};
pub use supervisor::{frozen_proper_display, RestartSupervisor, Watch, WatchdogInput};

use heapless::Vec;

use crate::config::MonitorConfig;
use crate::frame::Frame;
use crate::state::{MonitorPhase, PhaseEvent, RestartReason};
use crate::traits::SensorError;
use crate::validate::is_live_valid;

/// Most events a single tick can produce
pub const MAX_TICK_EVENTS: usize = 8;

/// Outcome of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verdict {
    /// Keep running
    Continue,
    /// Restart now
    Restart(RestartReason),
    /// A restart was already decided; the tick was ignored
    Halted,
}

/// Everything a tick produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub view: DisplayView,
    pub events: Vec<MonitorEvent, MAX_TICK_EVENTS>,
    pub verdict: Verdict,
}

impl TickReport {
    fn new(view: DisplayView) -> Self {
        Self {
            view,
            events: Vec::new(),
            verdict: Verdict::Continue,
        }
    }

    fn push(&mut self, event: MonitorEvent) {
        // Capacity covers the longest tick; overflow would only drop log lines
        let _ = self.events.push(event);
    }
}

/// Monitor state for one run of the program
#[derive(Debug, Clone)]
pub struct Monitor {
    config: MonitorConfig,
    phase: MonitorPhase,
    cache: DisplayCache,
    connection: ConnectionTracker,
    history: HistoryBuffer,
    supervisor: RestartSupervisor,
}

impl Monitor {
    /// Fresh state, as after power-on
    pub fn new(config: MonitorConfig, now_ms: u32) -> Self {
        let history = HistoryBuffer::new(&config.history, config.limits);
        Self {
            phase: MonitorPhase::Priming,
            cache: DisplayCache::new(now_ms),
            connection: ConnectionTracker::new(config.timing.grace_period_ms, now_ms),
            supervisor: RestartSupervisor::new(config.timing, history.capacity(), now_ms),
            history,
            config,
        }
    }

    /// Process the frame read on this tick
    pub fn tick(&mut self, now_ms: u32, frame: Frame) -> TickReport {
        if !self.phase.is_running() {
            return self.halted(frame);
        }

        let mut report = TickReport::new(self.cache.view(frame.status, false));
        report.push(MonitorEvent::Reading(frame));

        let live_valid = is_live_valid(&frame);
        let update = self
            .connection
            .update(&frame, live_valid, now_ms, &mut self.cache);

        if update.acceptance == Acceptance::GlitchIgnored {
            report.push(MonitorEvent::GlitchIgnored(frame));
        }
        if update.lost() {
            report.push(MonitorEvent::ConnectionLost);
        } else if update.restored() {
            report.push(MonitorEvent::ConnectionRestored);
        }

        let mut history_exhausted = false;
        if frame.finger_present() {
            let write = self.history.record(&frame);
            report.push(MonitorEvent::HistoryWrite {
                index: write.index as u8,
                entry: write.entry,
            });

            // A wrap that also completed recovery leaves the buffer unprimed
            let primed = write.wrapped && self.history.is_primed();
            if primed && self.phase == MonitorPhase::Priming {
                self.phase = self.phase.transition(PhaseEvent::HistoryPrimed);
                report.push(MonitorEvent::HistoryPrimed);
            }

            match write.signal {
                HistorySignal::Recovered => {
                    self.phase = self.phase.transition(PhaseEvent::Recovered);
                    report.push(MonitorEvent::Recovered {
                        valid_frames: self.config.history.valid_frame_threshold,
                    });
                }
                HistorySignal::Exhausted => history_exhausted = true,
                HistorySignal::Pending => {}
            }
        }

        let input = WatchdogInput {
            finger_present: frame.finger_present(),
            live_valid,
            disconnected: update.disconnected,
            history_exhausted,
        };
        self.supervise(&input, now_ms, &mut report);

        report.view = self.cache.view(frame.status, self.connection.is_disconnected());
        report
    }

    /// Process a tick on which the sensor could not be read
    ///
    /// Connection and history are left alone; the duration watchdog keeps
    /// running so a dead sensor still ends in a restart.
    pub fn tick_fault(&mut self, now_ms: u32, error: SensorError) -> TickReport {
        let status = self.cache.status();
        let mut report =
            TickReport::new(self.cache.view(status, self.connection.is_disconnected()));
        if !self.phase.is_running() {
            report.verdict = Verdict::Halted;
            return report;
        }

        report.push(MonitorEvent::SensorFault(error));

        let input = WatchdogInput::sensor_fault(self.connection.is_disconnected());
        self.supervise(&input, now_ms, &mut report);
        report
    }

    fn supervise(&mut self, input: &WatchdogInput, now_ms: u32, report: &mut TickReport) {
        match self.supervisor.evaluate(input, &self.cache, now_ms) {
            Watch::Clear => {}
            Watch::Held(reason) => report.push(MonitorEvent::FreezeHold(reason)),
            Watch::Fire(reason) => {
                self.phase = self.phase.transition(PhaseEvent::RestartTriggered(reason));
                report.push(MonitorEvent::Restart(reason));
                report.verdict = Verdict::Restart(reason);
            }
        }
    }

    fn halted(&self, frame: Frame) -> TickReport {
        let mut report =
            TickReport::new(self.cache.view(frame.status, self.connection.is_disconnected()));
        report.verdict = Verdict::Halted;
        report
    }

    /// Whether the display is currently frozen on real data
    pub fn is_frozen(&self, now_ms: u32) -> bool {
        frozen_proper_display(
            self.connection.is_disconnected(),
            &self.cache,
            now_ms,
            self.config.timing.freeze_timeout_ms,
        )
    }

    pub fn phase(&self) -> MonitorPhase {
        self.phase
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn cache(&self) -> &DisplayCache {
        &self.cache
    }

    pub fn connection(&self) -> &ConnectionTracker {
        &self.connection
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn supervisor(&self) -> &RestartSupervisor {
        &self.supervisor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::SensorStatus;

    const GOOD: Frame = Frame::new(72, 95, 98, SensorStatus::Finger);
    const BAD: Frame = Frame::new(0, 0, 0, SensorStatus::Finger);

    fn has(report: &TickReport, event: &MonitorEvent) -> bool {
        report.events.iter().any(|e| e == event)
    }

    #[test]
    fn test_good_tick() {
        let mut monitor = Monitor::new(MonitorConfig::default(), 0);
        let report = monitor.tick(1_000, GOOD);

        assert_eq!(report.verdict, Verdict::Continue);
        assert_eq!(report.events[0], MonitorEvent::Reading(GOOD));
        assert!(has(
            &report,
            &MonitorEvent::HistoryWrite {
                index: 0,
                entry: GOOD.reduce()
            }
        ));
        assert_eq!(report.view.heart_rate, 72);
        assert!(report.view.show_heart_glyph);
        assert!(!report.view.show_freeze_marker);
        assert_eq!(monitor.phase(), MonitorPhase::Priming);
    }

    #[test]
    fn test_finger_absent_skips_history() {
        let mut monitor = Monitor::new(MonitorConfig::default(), 0);
        let report = monitor.tick(1_000, Frame::silent());

        assert_eq!(report.events.len(), 1);
        assert_eq!(report.view.status_message, "No Finger");
        assert_eq!(monitor.history().write_index(), 0);
    }

    #[test]
    fn test_glitch_and_disconnect_events() {
        let mut monitor = Monitor::new(MonitorConfig::default(), 0);
        let glitch = Frame::new(0, 0, 97, SensorStatus::Finger);
        let report = monitor.tick(1_000, glitch);

        assert!(has(&report, &MonitorEvent::GlitchIgnored(glitch)));
        assert!(has(&report, &MonitorEvent::ConnectionLost));
        assert!(report.view.show_freeze_marker);

        let report = monitor.tick(2_000, GOOD);
        assert!(has(&report, &MonitorEvent::ConnectionRestored));
        assert!(!report.view.show_freeze_marker);
    }

    #[test]
    fn test_primes_then_restarts_once() {
        let mut monitor = Monitor::new(MonitorConfig::default(), 0);

        for tick in 1..20u32 {
            let report = monitor.tick(tick * 100, BAD);
            assert_eq!(report.verdict, Verdict::Continue, "tick {}", tick);
        }
        assert_eq!(monitor.phase(), MonitorPhase::Priming);

        let report = monitor.tick(2_000, BAD);
        let reason = RestartReason::Buffer { frames: 20 };
        assert!(has(&report, &MonitorEvent::HistoryPrimed));
        assert_eq!(report.verdict, Verdict::Restart(reason));
        assert_eq!(monitor.phase(), MonitorPhase::Restarting(reason));

        let report = monitor.tick(2_100, BAD);
        assert_eq!(report.verdict, Verdict::Halted);
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_buffer_reason_reports_clamped_capacity() {
        use crate::config::MAX_HISTORY_CAPACITY;

        let mut config = MonitorConfig::default();
        config.history.capacity = 100;
        let mut monitor = Monitor::new(config, 0);

        for tick in 1..MAX_HISTORY_CAPACITY as u32 {
            let report = monitor.tick(tick * 100, BAD);
            assert_eq!(report.verdict, Verdict::Continue, "tick {}", tick);
        }

        let report = monitor.tick(MAX_HISTORY_CAPACITY as u32 * 100, BAD);
        let reason = RestartReason::Buffer {
            frames: MAX_HISTORY_CAPACITY as u16,
        };
        assert_eq!(report.verdict, Verdict::Restart(reason));
        assert_eq!(reason.threshold(), monitor.history().capacity() as u32);
    }

    #[test]
    fn test_recovery_on_wrap_keeps_priming() {
        let mut config = MonitorConfig::default();
        config.history.capacity = 3;
        config.history.valid_frame_threshold = 3;
        let mut monitor = Monitor::new(config, 0);

        monitor.tick(100, GOOD);
        monitor.tick(200, GOOD);
        // Third write both wraps the buffer and completes recovery
        let report = monitor.tick(300, GOOD);

        assert!(has(&report, &MonitorEvent::Recovered { valid_frames: 3 }));
        assert!(!has(&report, &MonitorEvent::HistoryPrimed));
        assert!(!monitor.history().is_primed());
        assert_eq!(monitor.phase(), MonitorPhase::Priming);
    }

    #[test]
    fn test_recovery_keeps_armed() {
        let mut monitor = Monitor::new(MonitorConfig::default(), 0);
        // Plausible in history (score 2) yet never live-valid
        let weak = Frame::new(72, 0, 98, SensorStatus::Finger);
        // Score 1
        let poor = Frame::new(72, 0, 0, SensorStatus::Finger);

        monitor.tick(100, weak);
        monitor.tick(200, weak);
        for tick in 3..=20u32 {
            let report = monitor.tick(tick * 100, poor);
            assert_eq!(report.verdict, Verdict::Continue, "tick {}", tick);
        }
        assert_eq!(monitor.phase(), MonitorPhase::Armed);
        assert!(monitor.history().is_primed());
        assert_eq!(monitor.history().recovery_count(), 2);

        let report = monitor.tick(2_100, weak);
        assert_eq!(report.verdict, Verdict::Continue);
        assert!(has(&report, &MonitorEvent::Recovered { valid_frames: 3 }));
        assert_eq!(monitor.phase(), MonitorPhase::Armed);
        assert!(!monitor.history().is_primed());
    }

    #[test]
    fn test_sensor_fault_tick() {
        let mut monitor = Monitor::new(MonitorConfig::default(), 0);
        monitor.tick(1_000, GOOD);

        let report = monitor.tick_fault(2_000, SensorError::Bus);
        assert_eq!(report.events[0], MonitorEvent::SensorFault(SensorError::Bus));
        assert_eq!(report.verdict, Verdict::Continue);
        // History untouched
        assert_eq!(monitor.history().write_index(), 1);

        let report = monitor.tick_fault(31_001, SensorError::Bus);
        assert_eq!(
            report.verdict,
            Verdict::Restart(RestartReason::Duration { invalid_ms: 30_000 })
        );
    }
}
