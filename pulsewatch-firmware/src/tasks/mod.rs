//! Embassy async tasks
//!
//! The monitor is a single cooperative loop; there is one task.

pub mod monitor;

pub use monitor::{monitor_task, FirmwareLoop};
