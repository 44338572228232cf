//! defmt event log
//!
//! Maps monitor events to defmt levels: per-tick readings and history
//! writes at debug, state changes at info, anomalies at warn, restarts at
//! error.

use defmt::*;
use pulsewatch_core::monitor::MonitorEvent;
use pulsewatch_core::traits::EventLog;

/// Forwards monitor events to defmt-rtt
pub struct DefmtLog;

impl EventLog for DefmtLog {
    fn record(&mut self, event: &MonitorEvent) {
        match *event {
            MonitorEvent::Reading(frame) => debug!(
                "HR={} CFD={} O2={} status={}",
                frame.heart_rate,
                frame.confidence,
                frame.oxygen,
                frame.status.raw()
            ),
            MonitorEvent::HistoryWrite { index, entry } => debug!(
                "history[{}] <- HR={} CFD={} O2={} status={}",
                index, entry.heart_rate, entry.confidence, entry.oxygen, entry.status
            ),
            MonitorEvent::HistoryPrimed => info!("History primed, watchdogs armed"),
            MonitorEvent::ConnectionRestored => info!("Sensor connection restored"),
            MonitorEvent::Recovered { valid_frames } => {
                info!("{} valid frames, history reset", valid_frames)
            }
            MonitorEvent::SensorFault(e) => warn!("Sensor read failed: {}", e),
            MonitorEvent::GlitchIgnored(frame) => warn!(
                "Ignoring glitch: HR={} CFD={} O2={}",
                frame.heart_rate, frame.confidence, frame.oxygen
            ),
            MonitorEvent::ConnectionLost => warn!("Sensor disconnected, display frozen"),
            MonitorEvent::FreezeHold(reason) => {
                warn!("{} restart held: display frozen on real data", reason.kind())
            }
            MonitorEvent::DisplayFault(e) => warn!("Display update failed: {}", e),
            MonitorEvent::Restart(reason) => {
                error!("Restarting: {}", Display2Format(&reason))
            }
        }
    }
}
