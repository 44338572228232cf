//! Configuration types
//!
//! Every tunable of the monitor lives in one record. Firmware builds bake
//! it in as a compile-time constant.

pub mod types;

pub use types::*;
