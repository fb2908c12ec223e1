//! Loopback transport
//!
//! Behaves like a real driver without touching hardware: a connect
//! completes after a configurable number of servicing ticks, every byte
//! written comes back as received data, and teardown takes one tick.

use tether_core::{Action, CommDevice, ConnectionState, EndpointError, IpCommDevice, Task};

/// Bytes moved from transmit to receive per copy step
const ECHO_CHUNK: usize = 32;

/// Loopback device
pub struct LoopbackDevice<const RX: usize, const TX: usize> {
    base: IpCommDevice<RX, TX>,
    negotiation_ticks: u16,
    ticks_left: u16,
}

impl<const RX: usize, const TX: usize> Default for LoopbackDevice<RX, TX> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<const RX: usize, const TX: usize> LoopbackDevice<RX, TX> {
    /// Create a loopback that spends `negotiation_ticks` ticks in `Connecting`
    pub fn new(negotiation_ticks: u16) -> Self {
        Self {
            base: IpCommDevice::new(),
            negotiation_ticks,
            ticks_left: 0,
        }
    }

    pub fn set_host_port(&mut self, host: &str, port: u16) -> Result<(), EndpointError> {
        self.base.set_host_port(host, port)
    }

    /// Get access to the shared device state
    pub fn base(&self) -> &IpCommDevice<RX, TX> {
        &self.base
    }

    fn echo(&mut self) {
        let mut chunk = [0u8; ECHO_CHUNK];
        loop {
            let room = (self.base.receive_buffer().available_space() as usize).min(ECHO_CHUNK);
            let n = self.base.transmit_buffer().peek(&mut chunk[..room]);
            if n == 0 {
                break;
            }
            let pushed = self.base.receive_buffer_mut().push(&chunk[..n as usize]);
            self.base.transmit_buffer_mut().discard(pushed);
        }
    }
}

impl<const RX: usize, const TX: usize> Task for LoopbackDevice<RX, TX> {
    fn run(&mut self) {
        match self.base.next_action() {
            Some(Action::Connect) => {
                self.base.transmit_buffer_mut().clear();
                self.ticks_left = self.negotiation_ticks;
            }
            Some(Action::Disconnect) | None => {}
        }

        match self.base.state() {
            ConnectionState::Connecting => {
                if self.ticks_left == 0 {
                    self.base.negotiation_complete();
                } else {
                    self.ticks_left -= 1;
                }
            }
            ConnectionState::Connected => self.echo(),
            ConnectionState::Disconnecting => self.base.teardown_complete(),
            _ => {}
        }
    }
}

impl<const RX: usize, const TX: usize> CommDevice for LoopbackDevice<RX, TX> {
    fn connect(&mut self) -> bool {
        self.base.connect()
    }

    fn disconnect(&mut self) {
        self.base.disconnect()
    }

    fn is_connected(&self) -> bool {
        self.base.is_connected()
    }

    fn is_idle(&self) -> bool {
        self.base.is_idle()
    }

    fn bytes_available(&self) -> u16 {
        self.base.bytes_available()
    }

    fn space_available(&self) -> u16 {
        self.base.space_available()
    }

    fn read(&mut self, buf: &mut [u8]) -> u16 {
        self.base.read(buf)
    }

    fn write(&mut self, data: &[u8]) -> u16 {
        self.base.write(data)
    }
}
