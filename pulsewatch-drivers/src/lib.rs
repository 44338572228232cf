//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the collaborator traits
//! defined in pulsewatch-core:
//!
//! - MAX32664 biometric sensor hub (blocking I2C)
//! - SH1106 128x64 OLED framebuffer (blocking I2C, embedded-graphics)
//! - Status screen that renders monitor views onto any monochrome panel

#![no_std]
#![deny(unsafe_code)]

pub mod max32664;
pub mod screen;
pub mod sh1106;

pub use max32664::Max32664;
pub use screen::{PanelBackend, StatusScreen};
pub use sh1106::Sh1106;
