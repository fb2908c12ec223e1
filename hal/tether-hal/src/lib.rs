//! Tether Hardware Abstraction Layer
//!
//! This crate defines the hardware traits a transport driver talks to.
//! Chip-specific HALs implement them for their UART and GPIO peripherals,
//! so the same modem or Wi-Fi driver runs on any board.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Protocol client (MQTT, custom, ...)    │
//! └─────────────────────────────────────────┘
//!                     │  CommDevice
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tether-drivers (modem, bridge, ...)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tether-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Every trait here is non-blocking. A driver's servicing routine calls
//! them once per scheduler tick and must never wait on the hardware.
//!
//! # Traits
//!
//! - [`serial::SerialRead`], [`serial::SerialWrite`] - Non-blocking serial I/O
//! - [`control::ControlOutput`], [`control::ControlInput`] - Modem control lines

#![no_std]
#![deny(unsafe_code)]

pub mod control;
#[cfg(feature = "embedded-io")]
pub mod io;
pub mod serial;

// Re-export key traits at crate root for convenience
pub use control::{ActiveLow, ControlInput, ControlOutput};
pub use serial::{
    DataBits, Parity, SerialConfig, SerialError, SerialPort, SerialRead, SerialWrite, StopBits,
};
