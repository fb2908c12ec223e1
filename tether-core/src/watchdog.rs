//! Connect watchdog
//!
//! The device layer has no timeouts of its own; a connect stays in
//! progress until the driver resolves it. [`ConnectWatchdog`] is the
//! layer-above policy: it starts a deadline when a connect is accepted and
//! issues `disconnect()` if the link is not up in time.

use crate::config::LinkConfig;
use crate::countdown::{Countdown, TickSource};
use crate::traits::CommDevice;

/// Outcome of one watchdog poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchdogStatus {
    /// No connect attempt is being watched
    Disarmed,
    /// Connect still in progress, deadline not reached
    Waiting,
    /// Link came up in time; watchdog disarmed
    Connected,
    /// Device went back to idle on its own; watchdog disarmed
    Abandoned,
    /// Deadline passed; `disconnect()` issued and watchdog disarmed
    TimedOut,
}

/// Deadline on connection establishment
#[derive(Debug, Clone)]
pub struct ConnectWatchdog<C> {
    countdown: Countdown<C>,
    timeout_ms: u32,
    armed: bool,
}

impl<C: TickSource> ConnectWatchdog<C> {
    /// Create a disarmed watchdog
    pub fn new(clock: C, timeout_ms: u32) -> Self {
        Self {
            countdown: Countdown::new(clock),
            timeout_ms,
            armed: false,
        }
    }

    /// Create a disarmed watchdog using the stored connect timeout
    pub fn from_config(clock: C, config: &LinkConfig) -> Self {
        Self::new(clock, config.connect_timeout_ms)
    }

    /// Request a connection and start watching it
    ///
    /// Returns the device's answer to `connect()`. The watchdog arms only
    /// when the request is accepted.
    pub fn connect<D: CommDevice + ?Sized>(&mut self, device: &mut D) -> bool {
        let accepted = device.connect();
        if accepted {
            self.arm();
        }
        accepted
    }

    /// Start the deadline for an attempt already requested
    pub fn arm(&mut self) {
        self.countdown.countdown_ms(self.timeout_ms);
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Milliseconds left before the attempt is abandoned
    pub fn left_ms(&self) -> Option<i32> {
        self.armed.then(|| self.countdown.left_ms())
    }

    /// Check the watched device, enforcing the deadline
    ///
    /// Call once per tick while a connect is in flight.
    pub fn poll<D: CommDevice + ?Sized>(&mut self, device: &mut D) -> WatchdogStatus {
        if !self.armed {
            return WatchdogStatus::Disarmed;
        }

        if device.is_connected() {
            self.armed = false;
            return WatchdogStatus::Connected;
        }

        if device.is_idle() {
            self.armed = false;
            return WatchdogStatus::Abandoned;
        }

        if self.countdown.expired() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Connect not established within {} ms", self.timeout_ms);
            device.disconnect();
            self.armed = false;
            return WatchdogStatus::TimedOut;
        }

        WatchdogStatus::Waiting
    }
}
