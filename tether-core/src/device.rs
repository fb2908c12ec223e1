//! Base communication device
//!
//! [`IpCommDevice`] holds everything a transport driver shares: the
//! endpoint, pending caller intent, connection state, and one ring buffer
//! per direction. It implements [`CommDevice`] completely, so a concrete
//! driver composes it and only adds hardware handling in its servicing
//! routine through the driver-side methods below.
//!
//! All fields are plain data with no internal locking. The capability
//! interface and the servicing routine must run on the same thread of
//! control as the scheduler tick; a deployment that calls in from another
//! context has to wrap the device in its own critical section.

use crate::buffer::RingBuffer;
use crate::config::LinkConfig;
use crate::endpoint::{Endpoint, EndpointError};
use crate::state::{ConnectionState, Event, PendingFlags};
use crate::traits::CommDevice;

/// Work the servicing routine has to start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Begin device-specific connection steps
    Connect,
    /// Begin device-specific teardown, aborting any negotiation
    Disconnect,
}

/// Shared connection and buffer logic for IP transport drivers
///
/// `RX` and `TX` are the receive and transmit buffer capacities in bytes.
#[derive(Debug, Clone)]
pub struct IpCommDevice<const RX: usize, const TX: usize> {
    endpoint: Option<Endpoint>,
    pending: PendingFlags,
    state: ConnectionState,
    rx: RingBuffer<RX>,
    tx: RingBuffer<TX>,
}

impl<const RX: usize, const TX: usize> Default for IpCommDevice<RX, TX> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const RX: usize, const TX: usize> IpCommDevice<RX, TX> {
    /// Create an idle device with no endpoint
    pub const fn new() -> Self {
        Self {
            endpoint: None,
            pending: PendingFlags {
                connect: false,
                disconnect: false,
            },
            state: ConnectionState::NotConnected,
            rx: RingBuffer::new(),
            tx: RingBuffer::new(),
        }
    }

    /// Set the far side to connect to
    ///
    /// Must be called before the first [`connect`](CommDevice::connect).
    /// The host is copied, so the caller's string need not outlive the
    /// device. On error the previous endpoint is cleared and `connect`
    /// will be rejected until a valid one is set. A new endpoint takes
    /// effect on the next connection attempt.
    pub fn set_host_port(&mut self, host: &str, port: u16) -> Result<(), EndpointError> {
        match Endpoint::new(host, port) {
            Ok(endpoint) => {
                self.endpoint = Some(endpoint);
                Ok(())
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Endpoint rejected: {:?}", e);
                self.endpoint = None;
                Err(e)
            }
        }
    }

    /// Apply the endpoint from a stored link configuration
    pub fn configure(&mut self, config: &LinkConfig) -> Result<(), EndpointError> {
        self.set_host_port(&config.host, config.port)
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn pending(&self) -> PendingFlags {
        self.pending
    }

    /// Run one transition, logging failures at warn level
    fn apply(&mut self, event: Event) {
        let next = self.state.transition(event);
        if next == self.state {
            return;
        }
        if event.is_failure() {
            #[cfg(feature = "defmt")]
            defmt::warn!("{:?} --{:?}--> {:?}", self.state, event, next);
        } else {
            #[cfg(feature = "defmt")]
            defmt::debug!("{:?} --{:?}--> {:?}", self.state, event, next);
        }
        self.state = next;
    }

    // Driver side

    /// Consume pending requests and report what the driver must start
    ///
    /// Called from the servicing routine. Clears the recorded flags and
    /// moves `ConnectPending` to `Connecting` or `DisconnectPending` to
    /// `Disconnecting`. Flags left over from requests the state machine
    /// already resolved (a disconnect while idle, a connect cancelled
    /// before it started) are cleared without an action.
    pub fn next_action(&mut self) -> Option<Action> {
        if self.pending.take_disconnect() && self.state == ConnectionState::DisconnectPending {
            self.apply(Event::TeardownStarted);
            return Some(Action::Disconnect);
        }

        if self.pending.take_connect() && self.state == ConnectionState::ConnectPending {
            self.apply(Event::NegotiationStarted);
            return Some(Action::Connect);
        }

        None
    }

    /// Mark negotiation finished; the link is up
    ///
    /// Ignored unless `Connecting`, so a result arriving after a
    /// disconnect request never promotes the link.
    pub fn negotiation_complete(&mut self) {
        self.apply(Event::NegotiationComplete);
    }

    /// Mark negotiation abandoned; the device returns to idle
    pub fn negotiation_failed(&mut self) {
        self.apply(Event::NegotiationFailed);
    }

    /// Mark teardown finished; the device returns to idle
    ///
    /// Buffers are left as they are. Unread received data stays available
    /// to [`read`](CommDevice::read).
    pub fn teardown_complete(&mut self) {
        self.apply(Event::TeardownComplete);
    }

    /// Report that the far side or carrier went away
    pub fn link_dropped(&mut self) {
        self.apply(Event::LinkDropped);
    }

    /// Buffer the servicing routine fills with received bytes
    pub fn receive_buffer_mut(&mut self) -> &mut RingBuffer<RX> {
        &mut self.rx
    }

    /// Buffer the servicing routine drains towards the hardware
    pub fn transmit_buffer_mut(&mut self) -> &mut RingBuffer<TX> {
        &mut self.tx
    }

    pub fn receive_buffer(&self) -> &RingBuffer<RX> {
        &self.rx
    }

    pub fn transmit_buffer(&self) -> &RingBuffer<TX> {
        &self.tx
    }
}

impl<const RX: usize, const TX: usize> CommDevice for IpCommDevice<RX, TX> {
    fn connect(&mut self) -> bool {
        if self.endpoint.is_none() {
            #[cfg(feature = "defmt")]
            defmt::debug!("Connect rejected: no endpoint");
            return false;
        }
        if !self.state.is_idle() {
            return false;
        }

        self.pending.connect = true;
        self.apply(Event::ConnectRequested);
        true
    }

    fn disconnect(&mut self) {
        self.pending.disconnect = true;
        self.apply(Event::DisconnectRequested);
    }

    fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    fn bytes_available(&self) -> u16 {
        self.rx.available_data()
    }

    fn space_available(&self) -> u16 {
        if !self.state.is_connected() {
            return 0;
        }
        self.tx.available_space()
    }

    fn read(&mut self, buf: &mut [u8]) -> u16 {
        self.rx.pull(buf)
    }

    fn write(&mut self, data: &[u8]) -> u16 {
        if !self.state.is_connected() {
            return 0;
        }
        self.tx.push(data)
    }
}
