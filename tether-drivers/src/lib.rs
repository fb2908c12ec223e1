//! Transport driver implementations
//!
//! Each driver composes a [`tether_core::IpCommDevice`] for the shared
//! connection and buffer logic, implements [`tether_core::CommDevice`] by
//! delegating to it, and does its own device I/O in
//! [`tether_core::Task::run`]:
//!
//! - [`loopback::LoopbackDevice`] - echoes writes back as reads, for bring-up
//!   and testing protocol clients without hardware
//! - [`serial_link::SerialLinkDevice`] - transparent modem or serial bridge
//!   signalling its session on DTR/DCD

#![no_std]
#![deny(unsafe_code)]

pub mod loopback;
pub mod serial_link;

pub use loopback::LoopbackDevice;
pub use serial_link::{LinkStats, SerialLinkConfig, SerialLinkDevice};
