//! Transparent serial link driver
//!
//! Drives modems and serial-to-IP bridges running in transparent mode,
//! where the module already knows its far side and signals the session on
//! the RS-232 control lines:
//!
//! - Host asserts DTR to request a session
//! - Module asserts DCD once the far side is reachable
//! - Every byte on the UART is payload while DCD is asserted
//! - Host releases DTR to end the session; module drops DCD when closed
//!
//! The endpoint still has to be set before `connect()`, keeping the
//! contract identical across transports, but the module is expected to
//! have been provisioned with it.
//!
//! # Retry policy
//!
//! Negotiation gets `negotiation_ticks` servicing ticks for DCD to come up.
//! If it does not, DTR is released and the device returns to idle; the
//! caller decides whether to connect again. Teardown waits at most
//! `teardown_ticks` for DCD to clear before declaring the link closed.
//!
//! # Throughput
//!
//! Each `run` moves at most [`SerialLinkConfig::pump_budget`] bytes per
//! direction, sized from the line rate and the scheduler tick period.

use tether_core::{
    Action, CommDevice, ConnectionState, EndpointError, IpCommDevice, LinkConfig, Task,
};
use tether_hal::{ControlInput, ControlOutput, SerialConfig, SerialPort};

/// Bytes moved between the UART and a ring buffer per copy step
const CHUNK: usize = 64;

/// Serial link timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialLinkConfig {
    /// Ticks to wait for DCD after asserting DTR
    pub negotiation_ticks: u16,
    /// Ticks to wait for DCD to clear after releasing DTR
    pub teardown_ticks: u16,
    /// Line settings of the UART carrying the payload
    pub line: SerialConfig,
    /// Scheduler period between `run` calls (ms)
    pub tick_ms: u16,
}

impl Default for SerialLinkConfig {
    fn default() -> Self {
        Self {
            negotiation_ticks: 100,
            teardown_ticks: 20,
            line: SerialConfig::MODEM,
            tick_ms: 10,
        }
    }
}

impl SerialLinkConfig {
    /// Bytes moved per direction in one `run`
    ///
    /// Twice what the line carries in one tick, never zero.
    pub fn pump_budget(&self) -> usize {
        let per_tick = self.line.bytes_per_ms() as usize * self.tick_ms as usize;
        per_tick.saturating_mul(2).max(1)
    }
}

impl From<&LinkConfig> for SerialLinkConfig {
    fn from(config: &LinkConfig) -> Self {
        Self {
            negotiation_ticks: config.negotiation_ticks,
            ..Self::default()
        }
    }
}

/// Link counters, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Payload bytes handed to the UART
    pub bytes_sent: u32,
    /// Payload bytes taken from the UART
    pub bytes_received: u32,
    /// Sessions that reached `Connected`
    pub sessions: u16,
    /// Negotiations that ran out of ticks
    pub failed_connects: u16,
    /// Sessions lost to DCD dropping
    pub dropped_links: u16,
    /// Errors reported by the UART
    pub serial_errors: u16,
}

/// Transparent serial link device
///
/// - `S`: UART carrying the payload
/// - `D`: DTR output
/// - `C`: DCD input
pub struct SerialLinkDevice<S, D, C, const RX: usize, const TX: usize> {
    base: IpCommDevice<RX, TX>,
    serial: S,
    dtr: D,
    dcd: C,
    config: SerialLinkConfig,
    ticks_left: u16,
    stats: LinkStats,
}

impl<S, D, C, const RX: usize, const TX: usize> SerialLinkDevice<S, D, C, RX, TX>
where
    S: SerialPort,
    D: ControlOutput,
    C: ControlInput,
{
    /// Create a new serial link device
    ///
    /// DTR is released immediately so the module starts idle.
    pub fn new(serial: S, mut dtr: D, dcd: C, config: SerialLinkConfig) -> Self {
        dtr.deassert();
        Self {
            base: IpCommDevice::new(),
            serial,
            dtr,
            dcd,
            config,
            ticks_left: 0,
            stats: LinkStats::default(),
        }
    }

    pub fn set_host_port(&mut self, host: &str, port: u16) -> Result<(), EndpointError> {
        self.base.set_host_port(host, port)
    }

    /// Apply endpoint and negotiation budget from a stored configuration
    ///
    /// The negotiation budget is only taken once the endpoint is accepted.
    pub fn configure(&mut self, config: &LinkConfig) -> Result<(), EndpointError> {
        self.base.configure(config)?;
        self.config.negotiation_ticks = config.negotiation_ticks;
        Ok(())
    }

    pub fn config(&self) -> &SerialLinkConfig {
        &self.config
    }

    /// Get access to the shared device state
    pub fn base(&self) -> &IpCommDevice<RX, TX> {
        &self.base
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    /// Get access to the underlying UART
    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    fn start_connect(&mut self) {
        // Bytes queued for a previous session must not leak into this one
        self.base.transmit_buffer_mut().clear();
        self.dtr.assert();
        self.ticks_left = self.config.negotiation_ticks;
        #[cfg(feature = "defmt")]
        defmt::debug!("DTR asserted, waiting for carrier");
    }

    fn start_disconnect(&mut self) {
        self.dtr.deassert();
        self.ticks_left = self.config.teardown_ticks;
        #[cfg(feature = "defmt")]
        defmt::debug!("DTR released, waiting for carrier to clear");
    }

    fn poll_connecting(&mut self) {
        if self.dcd.is_asserted() {
            self.stats.sessions = self.stats.sessions.wrapping_add(1);
            self.base.negotiation_complete();
        } else if self.ticks_left == 0 {
            self.dtr.deassert();
            self.stats.failed_connects = self.stats.failed_connects.wrapping_add(1);
            self.base.negotiation_failed();
        } else {
            self.ticks_left -= 1;
        }
    }

    fn poll_connected(&mut self) {
        // Take whatever arrived before the carrier loss
        self.pump_receive();

        if !self.dcd.is_asserted() {
            self.dtr.deassert();
            self.stats.dropped_links = self.stats.dropped_links.wrapping_add(1);
            self.base.link_dropped();
            return;
        }

        self.pump_transmit();
    }

    fn poll_disconnecting(&mut self) {
        self.pump_receive();

        if !self.dcd.is_asserted() {
            self.base.teardown_complete();
        } else if self.ticks_left == 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("Carrier still present after teardown, closing anyway");
            self.base.teardown_complete();
        } else {
            self.ticks_left -= 1;
        }
    }

    /// Move received UART bytes into the receive buffer
    ///
    /// Stops when the UART has nothing more or the buffer is full; bytes
    /// stay in the peripheral until there is room.
    fn pump_receive(&mut self) {
        let mut chunk = [0u8; CHUNK];
        let mut budget = self.config.pump_budget();
        loop {
            let room = (self.base.receive_buffer().available_space() as usize)
                .min(CHUNK)
                .min(budget);
            if room == 0 {
                break;
            }

            match self.serial.read(&mut chunk[..room]) {
                Ok(0) => break,
                Ok(n) => {
                    let n = n.min(room);
                    budget -= n;
                    self.base.receive_buffer_mut().push(&chunk[..n]);
                    self.stats.bytes_received = self.stats.bytes_received.wrapping_add(n as u32);
                }
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("UART read error: {:?}", _e);
                    self.stats.serial_errors = self.stats.serial_errors.wrapping_add(1);
                    break;
                }
            }
        }
    }

    /// Hand queued transmit bytes to the UART
    ///
    /// Only bytes the UART accepted are removed from the buffer.
    fn pump_transmit(&mut self) {
        let mut chunk = [0u8; CHUNK];
        let mut budget = self.config.pump_budget();
        while budget > 0 {
            let limit = budget.min(CHUNK);
            let queued = self.base.transmit_buffer().peek(&mut chunk[..limit]) as usize;
            if queued == 0 {
                break;
            }

            match self.serial.write(&chunk[..queued]) {
                Ok(0) => break,
                Ok(sent) => {
                    let sent = sent.min(queued);
                    budget -= sent;
                    self.base.transmit_buffer_mut().discard(sent as u16);
                    self.stats.bytes_sent = self.stats.bytes_sent.wrapping_add(sent as u32);
                    if sent < queued {
                        break;
                    }
                }
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("UART write error: {:?}", _e);
                    self.stats.serial_errors = self.stats.serial_errors.wrapping_add(1);
                    break;
                }
            }
        }
    }
}

impl<S, D, C, const RX: usize, const TX: usize> Task for SerialLinkDevice<S, D, C, RX, TX>
where
    S: SerialPort,
    D: ControlOutput,
    C: ControlInput,
{
    fn run(&mut self) {
        match self.base.next_action() {
            Some(Action::Connect) => self.start_connect(),
            Some(Action::Disconnect) => self.start_disconnect(),
            None => {}
        }

        match self.base.state() {
            ConnectionState::Connecting => self.poll_connecting(),
            ConnectionState::Connected => self.poll_connected(),
            ConnectionState::Disconnecting => self.poll_disconnecting(),
            _ => {}
        }
    }
}

impl<S, D, C, const RX: usize, const TX: usize> CommDevice for SerialLinkDevice<S, D, C, RX, TX> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use heapless::{Deque, Vec};
    use tether_hal::{SerialError, SerialRead, SerialWrite};

    // Mock UART: `incoming` is what the module sends us, `outgoing` what we sent
    #[derive(Default)]
    struct MockSerial {
        incoming: Deque<u8, 128>,
        outgoing: Vec<u8, 128>,
        tx_room: usize,
        fail_reads: bool,
    }

    impl MockSerial {
        fn new(tx_room: usize) -> Self {
            Self {
                tx_room,
                ..Default::default()
            }
        }

        fn feed(&mut self, data: &[u8]) {
            for &byte in data {
                self.incoming.push_back(byte).unwrap();
            }
        }
    }

    impl SerialRead for MockSerial {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
            if self.fail_reads {
                return Err(SerialError::Overrun);
            }
            let mut n = 0;
            while n < buf.len() {
                match self.incoming.pop_front() {
                    Some(byte) => {
                        buf[n] = byte;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        }
    }

    impl SerialWrite for MockSerial {
        fn write(&mut self, data: &[u8]) -> Result<usize, SerialError> {
            let n = data.len().min(self.tx_room);
            self.outgoing.extend_from_slice(&data[..n]).unwrap();
            self.tx_room -= n;
            Ok(n)
        }
    }

    struct MockDtr<'a>(&'a Cell<bool>);

    impl ControlOutput for MockDtr<'_> {
        fn assert(&mut self) {
            self.0.set(true);
        }

        fn deassert(&mut self) {
            self.0.set(false);
        }

        fn is_asserted(&self) -> bool {
            self.0.get()
        }
    }

    struct MockDcd<'a>(&'a Cell<bool>);

    impl ControlInput for MockDcd<'_> {
        fn is_asserted(&self) -> bool {
            self.0.get()
        }
    }

    type Link<'a> = SerialLinkDevice<MockSerial, MockDtr<'a>, MockDcd<'a>, 32, 16>;

    fn link<'a>(dtr: &'a Cell<bool>, dcd: &'a Cell<bool>, tx_room: usize) -> Link<'a> {
        let config = SerialLinkConfig {
            negotiation_ticks: 3,
            teardown_ticks: 2,
            ..SerialLinkConfig::default()
        };
        let mut link = SerialLinkDevice::new(
            MockSerial::new(tx_room),
            MockDtr(dtr),
            MockDcd(dcd),
            config,
        );
        link.set_host_port("203.0.113.5", 1883).unwrap();
        link
    }

    fn connected<'a>(dtr: &'a Cell<bool>, dcd: &'a Cell<bool>, tx_room: usize) -> Link<'a> {
        let mut link = link(dtr, dcd, tx_room);
        assert!(link.connect());
        link.run();
        dcd.set(true);
        link.run();
        assert!(link.is_connected());
        link
    }

    #[test]
    fn test_new_releases_dtr() {
        let dtr = Cell::new(true);
        let dcd = Cell::new(false);
        let _link = link(&dtr, &dcd, 0);
        assert!(!dtr.get());
    }

    #[test]
    fn test_connect_asserts_dtr_and_waits_for_dcd() {
        let dtr = Cell::new(false);
        let dcd = Cell::new(false);
        let mut link = link(&dtr, &dcd, 0);

        assert!(link.connect());
        assert!(!dtr.get());

        link.run();
        assert!(dtr.get());
        assert_eq!(link.base().state(), ConnectionState::Connecting);

        dcd.set(true);
        link.run();
        assert!(link.is_connected());
        assert_eq!(link.space_available(), 16);
        assert_eq!(link.stats().sessions, 1);
    }

    #[test]
    fn test_negotiation_times_out() {
        let dtr = Cell::new(false);
        let dcd = Cell::new(false);
        let mut link = link(&dtr, &dcd, 0);

        link.connect();
        for _ in 0..3 {
            link.run();
            assert_eq!(link.base().state(), ConnectionState::Connecting);
        }
        link.run();
        assert!(link.is_idle());
        assert!(!dtr.get());
        assert_eq!(link.stats().failed_connects, 1);
    }

    #[test]
    fn test_data_flows_both_ways() {
        let dtr = Cell::new(false);
        let dcd = Cell::new(false);
        let mut link = connected(&dtr, &dcd, 64);

        assert_eq!(link.write(b"CONNECT"), 7);
        link.serial_mut().feed(b"CONNACK");
        link.run();

        assert_eq!(link.serial_mut().outgoing.as_slice(), b"CONNECT");
        assert_eq!(link.bytes_available(), 7);
        let mut buf = [0u8; 7];
        link.read(&mut buf);
        assert_eq!(&buf, b"CONNACK");

        let stats = link.stats();
        assert_eq!(stats.bytes_sent, 7);
        assert_eq!(stats.bytes_received, 7);
    }

    #[test]
    fn test_uart_backpressure_keeps_unsent_bytes() {
        let dtr = Cell::new(false);
        let dcd = Cell::new(false);
        let mut link = connected(&dtr, &dcd, 4);

        assert_eq!(link.write(b"0123456789"), 10);
        link.run();
        assert_eq!(link.serial_mut().outgoing.as_slice(), b"0123");
        assert_eq!(link.space_available(), 10);

        link.serial_mut().tx_room = 64;
        link.run();
        assert_eq!(link.serial_mut().outgoing.as_slice(), b"0123456789");
        assert_eq!(link.space_available(), 16);
    }

    #[test]
    fn test_receive_stops_at_full_buffer() {
        let dtr = Cell::new(false);
        let dcd = Cell::new(false);
        let mut link = connected(&dtr, &dcd, 0);

        link.serial_mut().feed(&[0x42; 40]);
        link.run();
        assert_eq!(link.bytes_available(), 32);
        assert_eq!(link.serial_mut().incoming.len(), 8);

        let mut buf = [0u8; 32];
        link.read(&mut buf);
        link.run();
        assert_eq!(link.bytes_available(), 8);
    }

    #[test]
    fn test_carrier_loss_drops_link() {
        let dtr = Cell::new(false);
        let dcd = Cell::new(false);
        let mut link = connected(&dtr, &dcd, 64);

        link.serial_mut().feed(b"bye");
        dcd.set(false);
        link.run();

        assert!(link.is_idle());
        assert!(!dtr.get());
        assert_eq!(link.stats().dropped_links, 1);
        // Data that arrived before the drop is still readable
        assert_eq!(link.bytes_available(), 3);
    }

    #[test]
    fn test_disconnect_releases_dtr() {
        let dtr = Cell::new(false);
        let dcd = Cell::new(false);
        let mut link = connected(&dtr, &dcd, 64);

        link.disconnect();
        assert_eq!(link.base().state(), ConnectionState::DisconnectPending);
        link.run();
        assert!(!dtr.get());
        assert_eq!(link.base().state(), ConnectionState::Disconnecting);

        dcd.set(false);
        link.run();
        assert!(link.is_idle());
    }

    #[test]
    fn test_teardown_gives_up_on_stuck_carrier() {
        let dtr = Cell::new(false);
        let dcd = Cell::new(false);
        let mut link = connected(&dtr, &dcd, 64);

        link.disconnect();
        link.run(); // 1 tick left
        link.run(); // 0 ticks left
        assert_eq!(link.base().state(), ConnectionState::Disconnecting);
        link.run();
        assert!(link.is_idle());
    }

    #[test]
    fn test_disconnect_aborts_negotiation() {
        let dtr = Cell::new(false);
        let dcd = Cell::new(false);
        let mut link = link(&dtr, &dcd, 64);

        link.connect();
        link.run();
        assert_eq!(link.base().state(), ConnectionState::Connecting);

        link.disconnect();
        // Carrier arriving late must not complete the connect
        dcd.set(true);
        link.run();
        assert!(!dtr.get());
        assert_eq!(link.base().state(), ConnectionState::Disconnecting);

        dcd.set(false);
        link.run();
        assert!(link.is_idle());
        assert_eq!(link.stats().sessions, 0);
    }

    #[test]
    fn test_serial_errors_counted() {
        let dtr = Cell::new(false);
        let dcd = Cell::new(false);
        let mut link = connected(&dtr, &dcd, 64);

        link.serial_mut().fail_reads = true;
        link.run();
        link.run();
        assert_eq!(link.stats().serial_errors, 2);
        assert!(link.is_connected());
    }

    #[test]
    fn test_stale_transmit_cleared_on_new_session() {
        let dtr = Cell::new(false);
        let dcd = Cell::new(false);
        let mut link = connected(&dtr, &dcd, 0);

        link.write(b"stale");
        dcd.set(false);
        link.run();
        assert!(link.is_idle());

        link.serial_mut().tx_room = 64;
        link.connect();
        link.run();
        dcd.set(true);
        link.run();
        assert!(link.serial_mut().outgoing.is_empty());
        assert_eq!(link.space_available(), 16);
    }

    #[test]
    fn test_configure_from_link_config() {
        let dtr = Cell::new(false);
        let dcd = Cell::new(false);
        let mut link = link(&dtr, &dcd, 0);

        let mut config = LinkConfig::default();
        config.host.push_str("bridge.local").unwrap();
        config.negotiation_ticks = 1;
        link.configure(&config).unwrap();
        assert_eq!(link.base().endpoint().unwrap().host(), "bridge.local");

        link.connect();
        link.run();
        link.run();
        link.run();
        assert!(link.is_idle());
    }

    #[test]
    fn test_rejected_configure_keeps_negotiation_budget() {
        let dtr = Cell::new(false);
        let dcd = Cell::new(false);
        let mut link = link(&dtr, &dcd, 0);

        let config = LinkConfig {
            negotiation_ticks: 0,
            ..LinkConfig::default()
        };
        assert_eq!(link.configure(&config), Err(EndpointError::EmptyHost));
        assert_eq!(link.config().negotiation_ticks, 3);
    }

    #[test]
    fn test_slow_line_limits_bytes_per_tick() {
        let dtr = Cell::new(false);
        let dcd = Cell::new(false);
        let config = SerialLinkConfig {
            negotiation_ticks: 3,
            teardown_ticks: 2,
            // 9600 8N1 rounds up to 1 byte per ms
            line: SerialConfig {
                baudrate: 9600,
                ..SerialConfig::MODEM
            },
            tick_ms: 4,
        };
        assert_eq!(config.pump_budget(), 8);

        let mut link: Link<'_> =
            SerialLinkDevice::new(MockSerial::new(64), MockDtr(&dtr), MockDcd(&dcd), config);
        link.set_host_port("203.0.113.5", 1883).unwrap();
        link.connect();
        link.run();
        dcd.set(true);
        link.run();
        assert!(link.is_connected());

        link.serial_mut().feed(&[0x55; 20]);
        assert_eq!(link.write(&[0xAA; 12]), 12);
        link.run();
        assert_eq!(link.bytes_available(), 8);
        assert_eq!(link.serial_mut().outgoing.len(), 8);

        link.run();
        assert_eq!(link.bytes_available(), 16);
        assert_eq!(link.serial_mut().outgoing.len(), 12);
    }

    #[test]
    fn test_config_from_link_config() {
        let mut config = LinkConfig::default();
        config.negotiation_ticks = 7;
        let serial = SerialLinkConfig::from(&config);
        assert_eq!(serial.negotiation_ticks, 7);
        assert_eq!(serial.teardown_ticks, 20);
    }
}
