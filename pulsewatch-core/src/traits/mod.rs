//! Collaborator traits
//!
//! These traits define the interface between the monitor logic and the
//! hardware or platform around it.

pub mod display;
pub mod log;
pub mod reset;
pub mod sensor;

pub use display::{DisplayError, StatusDisplay};
pub use log::EventLog;
pub use reset::ResetControl;
pub use sensor::{BioSensor, SensorError};
