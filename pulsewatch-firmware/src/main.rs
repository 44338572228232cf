//! Pulsewatch - Pulse Oximeter Monitor Firmware
//!
//! Main firmware binary for RP2040 boards with a MAX32664 bio sensor hub
//! and an SH1106 OLED. Brings up both devices, then hands them to the
//! monitor task, which reads one frame per tick and resets the board when
//! the sensor stream degrades.
//!
//! Wiring:
//! - Sensor hub on I2C0: SDA=GPIO4, SCL=GPIO5, RSTN=GPIO2, MFIO=GPIO3
//! - OLED on I2C1: SDA=GPIO6, SCL=GPIO7

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_time::{Delay, Duration, Instant, Timer};
use {defmt_rtt as _, panic_probe as _};

use pulsewatch_core::MonitorLoop;
use pulsewatch_drivers::{Max32664, Sh1106, StatusScreen};

mod config;
mod log;
mod reset;
mod tasks;

use crate::config::MONITOR_CONFIG;
use crate::log::DefmtLog;
use crate::reset::SysReset;

/// Sensor hub bus speed (the hub supports up to 400 kHz)
const SENSOR_I2C_HZ: u32 = 100_000;

/// OLED bus speed
const DISPLAY_I2C_HZ: u32 = 400_000;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Pulsewatch firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Compiled in from monitor.toml and checked by build.rs
    let config = MONITOR_CONFIG;
    info!(
        "Monitor config: {} frame history, {} ms invalid limit, {} ms tick",
        config.history.capacity, config.timing.max_invalid_time_ms, config.timing.tick_period_ms
    );
    if config.history_window_ms() >= config.timing.max_invalid_time_ms {
        warn!(
            "History spans {} ms; the duration watchdog will fire before the buffer one",
            config.history_window_ms()
        );
    }

    // Sensor hub
    let mut sensor_i2c_config = i2c::Config::default();
    sensor_i2c_config.frequency = SENSOR_I2C_HZ;
    let sensor_bus = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, sensor_i2c_config);

    let mut hub = Max32664::new(
        sensor_bus,
        Output::new(p.PIN_2, Level::High),
        Output::new(p.PIN_3, Level::High),
        Delay,
    );

    if let Err(e) = hub.begin().and_then(|()| hub.configure()) {
        error!("Sensor hub bring-up failed: {}", e);
        halt().await;
    }
    info!("Sensor hub ready");

    // OLED
    let mut display_i2c_config = i2c::Config::default();
    display_i2c_config.frequency = DISPLAY_I2C_HZ;
    let display_bus = I2c::new_blocking(p.I2C1, p.PIN_7, p.PIN_6, display_i2c_config);

    let mut panel = Sh1106::new(display_bus);
    if let Err(e) = panel.init() {
        error!("Display bring-up failed: {}", e);
        halt().await;
    }
    info!("Display ready");

    let now_ms = Instant::now().as_millis() as u32;
    let monitor = MonitorLoop::new(
        config,
        now_ms,
        hub,
        StatusScreen::new(panel),
        DefmtLog,
        SysReset,
    );

    unwrap!(spawner.spawn(tasks::monitor_task(monitor, config.timing.tick_period_ms)));
    info!("Monitor task spawned");
}

/// Park forever after a failed bring-up
///
/// The log line above is the only output; the board stays up for a probe.
async fn halt() -> ! {
    loop {
        Timer::after(Duration::from_secs(60)).await;
    }
}
