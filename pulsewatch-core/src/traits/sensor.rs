//! Biometric sensor trait

use crate::frame::Frame;

/// Errors that can occur while reading the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed
    Bus,
    /// Hub answered with a non-zero status byte
    Hub(u8),
    /// Hub has no sample ready
    NotReady,
    /// Hub is not in application mode
    UnexpectedMode(u8),
}

/// Source of one [`Frame`] per tick
///
/// Implementations block until the reading is available. Device bring-up
/// happens before the monitor starts and is not part of this trait.
pub trait BioSensor {
    /// Read the current frame
    fn read_frame(&mut self) -> Result<Frame, SensorError>;
}
