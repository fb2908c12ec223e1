//! Non-blocking serial port abstractions
//!
//! Modems and Wi-Fi modules hang off a UART. Drivers move bytes between
//! the port and their ring buffers from the servicing routine, so both
//! directions only ever transfer what the peripheral can take right now.

/// Errors reported by a serial peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError {
    /// Receive FIFO overflowed before it was drained
    Overrun,
    /// Stop bit not detected
    Framing,
    /// Parity check failed
    Parity,
    /// Noise detected on the line
    Noise,
    /// Other peripheral-specific error
    Other,
}

/// Serial receiver
pub trait SerialRead {
    /// Copy already-received bytes into `buf`
    ///
    /// Returns the number of bytes copied, which is `0` when nothing is
    /// pending. Never waits for more data to arrive.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError>;
}

/// Serial transmitter
pub trait SerialWrite {
    /// Queue as much of `data` as the peripheral accepts without waiting
    ///
    /// Returns the number of bytes accepted. Bytes beyond that count are
    /// not sent and must be offered again on a later call.
    fn write(&mut self, data: &[u8]) -> Result<usize, SerialError>;
}

/// Combined serial port
///
/// For UARTs that provide both TX and RX on a single peripheral.
pub trait SerialPort: SerialRead + SerialWrite {}

// Blanket implementation
impl<T: SerialRead + SerialWrite> SerialPort for T {}

/// Line settings the attached module runs at
///
/// Drivers never reprogram the peripheral from this; they read it to know
/// how fast bytes can arrive and leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    /// Line rate in bits per second
    pub baudrate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    /// RTS/CTS handshaking enabled on both ends
    pub flow_control: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::MODEM
    }
}

impl SerialConfig {
    /// 115200 8N1 with RTS/CTS, the factory setting of most cellular modems
    pub const MODEM: Self = Self {
        baudrate: 115_200,
        data_bits: DataBits::Eight,
        parity: Parity::None,
        stop_bits: StopBits::One,
        flow_control: true,
    };

    /// Bits on the wire per payload byte, start bit included
    pub fn frame_bits(&self) -> u32 {
        let parity = match self.parity {
            Parity::None => 0,
            Parity::Even | Parity::Odd => 1,
        };
        1 + self.data_bits.count() + parity + self.stop_bits.count()
    }

    /// Payload bytes the line carries per millisecond, rounded up
    pub fn bytes_per_ms(&self) -> u32 {
        self.baudrate.div_ceil(self.frame_bits() * 1000)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

impl DataBits {
    fn count(self) -> u32 {
        match self {
            DataBits::Seven => 7,
            DataBits::Eight => 8,
            DataBits::Nine => 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

impl StopBits {
    fn count(self) -> u32 {
        match self {
            StopBits::One => 1,
            StopBits::Two => 2,
        }
    }
}
