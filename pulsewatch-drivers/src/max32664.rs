//! MAX32664 biometric sensor hub (I2C)
//!
//! The MAX32664 runs the heart rate and SpO2 algorithms on data from an
//! attached MAX30101 and exposes the results over I2C.
//!
//! # I2C Protocol
//!
//! Every command is a write of `[family, index, data...]` to address 0x55,
//! followed by a 6 ms pause and a read. The first byte read back is the
//! hub's status (0x00 on success); any payload follows it.
//!
//! # Bring-up
//!
//! The hub samples MFIO while RSTN rises: MFIO high selects application
//! mode. After about a second the hub answers commands, and the device mode
//! query must report application mode before the algorithm is enabled.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;

use pulsewatch_core::frame::{CORRUPT_HEART_RATE, CORRUPT_OXYGEN};
use pulsewatch_core::traits::{BioSensor, SensorError};
use pulsewatch_core::{Frame, SensorStatus};

/// Hub I2C address
pub const HUB_ADDR: u8 = 0x55;

/// Pause between a command write and its response read
pub const CMD_DELAY_MS: u32 = 6;

/// Bytes in one algorithm sample
pub const SAMPLE_LEN: usize = 6;

/// Device mode reported while the application is running
pub const APPLICATION_MODE: u8 = 0x00;

/// RSTN low time during reset
const RESET_PULSE_MS: u32 = 10;

/// Time for the hub to boot into application mode
const APP_BOOT_MS: u32 = 1_000;

/// Largest response the driver reads, status byte included
const MAX_RESPONSE: usize = 1 + SAMPLE_LEN;

/// Command families
pub mod family {
    /// Read device mode
    pub const DEVICE_MODE: u8 = 0x02;
    /// Output mode and FIFO configuration
    pub const OUTPUT_MODE: u8 = 0x10;
    /// Read output FIFO
    pub const READ_FIFO: u8 = 0x12;
    /// Enable attached sensors
    pub const SENSOR_ENABLE: u8 = 0x44;
    /// Enable algorithms
    pub const ALGORITHM_ENABLE: u8 = 0x52;
}

/// Command indices within their family
pub mod index {
    pub const DEVICE_MODE: u8 = 0x00;
    pub const SET_OUTPUT_FORMAT: u8 = 0x00;
    pub const SET_FIFO_THRESHOLD: u8 = 0x01;
    pub const FIFO_SAMPLES: u8 = 0x01;
    pub const AGC: u8 = 0x00;
    pub const WHRM: u8 = 0x02;
    pub const MAX30101: u8 = 0x03;
}

/// Output format selecting algorithm data only
const OUTPUT_ALGORITHM: u8 = 0x02;

/// Commands sent by [`Max32664::configure`], in order
pub const CONFIGURE_SEQUENCE: [[u8; 3]; 5] = [
    [family::OUTPUT_MODE, index::SET_OUTPUT_FORMAT, OUTPUT_ALGORITHM],
    [family::OUTPUT_MODE, index::SET_FIFO_THRESHOLD, 0x01],
    [family::ALGORITHM_ENABLE, index::AGC, 0x01],
    [family::SENSOR_ENABLE, index::MAX30101, 0x01],
    [family::ALGORITHM_ENABLE, index::WHRM, 0x01],
];

/// Decode one algorithm sample
///
/// Layout: heart rate x10 (BE u16), confidence, SpO2 x10 (BE u16), finger
/// status. All-ones values are the hub's corrupt markers and are kept as
/// markers instead of being scaled.
pub fn decode_sample(raw: &[u8; SAMPLE_LEN]) -> Frame {
    let heart_rate = match u16::from_be_bytes([raw[0], raw[1]]) {
        CORRUPT_HEART_RATE => CORRUPT_HEART_RATE,
        tenths => tenths / 10,
    };
    let oxygen = match u16::from_be_bytes([raw[3], raw[4]]) {
        u16::MAX => CORRUPT_OXYGEN,
        tenths => tenths / 10,
    };

    Frame::new(heart_rate, raw[2], oxygen, SensorStatus::from_raw(raw[5]))
}

/// Check the status byte that leads every response
pub fn check_status(status: u8) -> Result<(), SensorError> {
    match status {
        0x00 => Ok(()),
        code => Err(SensorError::Hub(code)),
    }
}

/// MAX32664 driver
pub struct Max32664<I2C, RST, MFIO, D> {
    i2c: I2C,
    reset: RST,
    mfio: MFIO,
    delay: D,
    /// Bring-up and configuration completed
    ready: bool,
}

impl<I2C, RST, MFIO, D> Max32664<I2C, RST, MFIO, D>
where
    I2C: I2c,
    RST: OutputPin,
    MFIO: OutputPin,
    D: DelayNs,
{
    pub fn new(i2c: I2C, reset: RST, mfio: MFIO, delay: D) -> Self {
        Self {
            i2c,
            reset,
            mfio,
            delay,
            ready: false,
        }
    }

    /// Reset into application mode and check the device mode
    pub fn begin(&mut self) -> Result<(), SensorError> {
        self.ready = false;

        self.mfio.set_high().map_err(|_| SensorError::Bus)?;
        self.reset.set_low().map_err(|_| SensorError::Bus)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.reset.set_high().map_err(|_| SensorError::Bus)?;
        self.delay.delay_ms(APP_BOOT_MS);

        match self.device_mode()? {
            APPLICATION_MODE => Ok(()),
            mode => Err(SensorError::UnexpectedMode(mode)),
        }
    }

    /// Enable the sensor and the heart rate algorithm
    ///
    /// Call after [`begin`](Self::begin). Frames can be read once this
    /// returns `Ok`.
    pub fn configure(&mut self) -> Result<(), SensorError> {
        for [group, command, value] in CONFIGURE_SEQUENCE {
            self.write_command(group, command, value)?;
        }
        self.ready = true;
        Ok(())
    }

    /// Query the device mode byte
    pub fn device_mode(&mut self) -> Result<u8, SensorError> {
        let mut mode = [0u8; 1];
        self.read_command(family::DEVICE_MODE, index::DEVICE_MODE, &mut mode)?;
        Ok(mode[0])
    }

    /// Whether bring-up and configuration completed
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Give back the bus and pins
    pub fn release(self) -> (I2C, RST, MFIO, D) {
        (self.i2c, self.reset, self.mfio, self.delay)
    }

    /// Write a one-byte command and check the status
    fn write_command(&mut self, group: u8, command: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(HUB_ADDR, &[group, command, value])
            .map_err(|_| SensorError::Bus)?;
        self.delay.delay_ms(CMD_DELAY_MS);

        let mut status = [0u8; 1];
        self.i2c
            .read(HUB_ADDR, &mut status)
            .map_err(|_| SensorError::Bus)?;
        check_status(status[0])
    }

    /// Send a read command and copy the payload into `data`
    fn read_command(&mut self, group: u8, command: u8, data: &mut [u8]) -> Result<(), SensorError> {
        let len = data.len().min(SAMPLE_LEN);

        self.i2c
            .write(HUB_ADDR, &[group, command])
            .map_err(|_| SensorError::Bus)?;
        self.delay.delay_ms(CMD_DELAY_MS);

        let mut response = [0u8; MAX_RESPONSE];
        self.i2c
            .read(HUB_ADDR, &mut response[..=len])
            .map_err(|_| SensorError::Bus)?;
        check_status(response[0])?;

        data[..len].copy_from_slice(&response[1..=len]);
        Ok(())
    }
}

impl<I2C, RST, MFIO, D> BioSensor for Max32664<I2C, RST, MFIO, D>
where
    I2C: I2c,
    RST: OutputPin,
    MFIO: OutputPin,
    D: DelayNs,
{
    fn read_frame(&mut self) -> Result<Frame, SensorError> {
        if !self.ready {
            return Err(SensorError::NotReady);
        }

        let mut sample = [0u8; SAMPLE_LEN];
        self.read_command(family::READ_FIFO, index::FIFO_SAMPLES, &mut sample)?;
        Ok(decode_sample(&sample))
    }
}
