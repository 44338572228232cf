//! Board-agnostic decision logic for the pulse oximeter monitor
//!
//! This crate contains everything that decides what a reading means,
//! independent of the sensor, display, and MCU it runs on:
//!
//! - Frame types and the live/stored validity predicates
//! - Connection inference with a grace window
//! - Bounded history used to detect sustained bad data
//! - Duration and buffer watchdogs that decide when to restart
//! - Collaborator traits (sensor, display, event log, reset)
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod frame;
pub mod monitor;
pub mod runner;
pub mod state;
pub mod traits;
pub mod validate;

pub use config::MonitorConfig;
pub use frame::{Frame, SensorStatus, StoredFrame};
pub use monitor::{Monitor, MonitorEvent, TickReport, Verdict};
pub use runner::MonitorLoop;
pub use state::{MonitorPhase, RestartReason};
