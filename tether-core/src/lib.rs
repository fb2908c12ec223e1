//! Board-agnostic core logic for Tether communication devices
//!
//! This crate contains everything a transport driver shares regardless of
//! the hardware underneath:
//!
//! - The [`traits::CommDevice`] capability interface protocol clients use
//! - The connection state machine and pending-intent flags
//! - [`device::IpCommDevice`], the base device drivers compose
//! - Fixed-capacity byte ring buffers
//! - Countdown timers and the connect watchdog for the layer above
//! - Link configuration types
//!
//! Nothing here blocks. Callers record intent and poll; drivers do the
//! real work from their servicing routine, invoked by an external
//! scheduler.

#![no_std]
#![deny(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod countdown;
pub mod device;
pub mod endpoint;
pub mod state;
pub mod traits;
pub mod watchdog;

pub use buffer::RingBuffer;
pub use config::{ConfigError, LinkConfig};
pub use countdown::{Countdown, TickSource, MAX_SPAN_MS};
pub use device::{Action, IpCommDevice};
pub use endpoint::{Endpoint, EndpointError};
pub use state::{ConnectionState, Event, PendingFlags};
pub use traits::{CommDevice, Task};
pub use watchdog::{ConnectWatchdog, WatchdogStatus};
