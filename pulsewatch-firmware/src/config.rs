//! Monitor configuration
//!
//! `MONITOR_CONFIG` is generated by build.rs from monitor.toml. Missing keys
//! take their defaults, and the build fails on invalid values, so the
//! firmware never validates at runtime.

use pulsewatch_core::config::{HistoryConfig, MonitorConfig, TimingConfig, ValidityLimits};

include!(concat!(env!("OUT_DIR"), "/monitor_config.rs"));
