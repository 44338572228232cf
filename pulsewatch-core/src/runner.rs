//! Tick loop glue
//!
//! [`MonitorLoop`] wires a [`Monitor`] to its collaborators. Each call to
//! [`MonitorLoop::step`] performs one read → classify → update → evaluate
//! cycle, logs the events, and renders the view. A restart verdict shows the
//! reason on the display and then resets the program.

use crate::config::MonitorConfig;
use crate::monitor::{Monitor, MonitorEvent, Verdict};
use crate::state::RestartReason;
use crate::traits::{BioSensor, EventLog, ResetControl, StatusDisplay};

/// One monitor plus the sensor, display, log and reset it talks to
pub struct MonitorLoop<S, D, L, R> {
    monitor: Monitor,
    sensor: S,
    display: D,
    log: L,
    reset: R,
}

impl<S, D, L, R> MonitorLoop<S, D, L, R>
where
    S: BioSensor,
    D: StatusDisplay,
    L: EventLog,
    R: ResetControl,
{
    pub fn new(
        config: MonitorConfig,
        now_ms: u32,
        sensor: S,
        display: D,
        log: L,
        reset: R,
    ) -> Self {
        Self {
            monitor: Monitor::new(config, now_ms),
            sensor,
            display,
            log,
            reset,
        }
    }

    /// Run one tick
    ///
    /// Never returns [`Verdict::Restart`]: on that verdict the reset
    /// primitive is invoked and this call does not return.
    pub fn step(&mut self, now_ms: u32) -> Verdict {
        let report = match self.sensor.read_frame() {
            Ok(frame) => self.monitor.tick(now_ms, frame),
            Err(error) => self.monitor.tick_fault(now_ms, error),
        };

        for event in &report.events {
            self.log.record(event);
        }

        if let Verdict::Restart(reason) = report.verdict {
            self.restart(&reason);
        }

        if let Err(error) = self.display.show(&report.view) {
            self.log.record(&MonitorEvent::DisplayFault(error));
        }

        report.verdict
    }

    /// Show the reason and reset
    ///
    /// A display failure is logged but never stops the reset.
    fn restart(&mut self, reason: &RestartReason) -> ! {
        if let Err(error) = self.display.show_restart(reason) {
            self.log.record(&MonitorEvent::DisplayFault(error));
        }
        self.reset.reset()
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn log(&self) -> &L {
        &self.log
    }
}
