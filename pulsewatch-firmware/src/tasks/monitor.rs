//! Monitor task
//!
//! Runs one read -> classify -> update -> evaluate cycle per tick. A restart
//! verdict never comes back from `step`: the board resets inside it.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::{I2C0, I2C1};
use embassy_time::{Delay, Duration, Instant, Ticker};

use pulsewatch_core::{MonitorLoop, Verdict};
use pulsewatch_drivers::{Max32664, Sh1106, StatusScreen};

use crate::log::DefmtLog;
use crate::reset::SysReset;

pub type SensorHub =
    Max32664<I2c<'static, I2C0, Blocking>, Output<'static>, Output<'static>, Delay>;
pub type Oled = StatusScreen<Sh1106<I2c<'static, I2C1, Blocking>>>;
pub type FirmwareLoop = MonitorLoop<SensorHub, Oled, DefmtLog, SysReset>;

#[embassy_executor::task]
pub async fn monitor_task(mut monitor: FirmwareLoop, tick_period_ms: u32) {
    info!("Monitor task started");

    let mut ticker = Ticker::every(Duration::from_millis(tick_period_ms as u64));

    loop {
        ticker.next().await;

        // Wraps after ~49 days; every comparison downstream is wrapping
        let now_ms = Instant::now().as_millis() as u32;

        if monitor.step(now_ms) == Verdict::Halted {
            warn!("Tick after restart decision; waiting for reset");
        }
    }
}
