//! Far-side endpoint of a connection

use heapless::String;

/// Maximum host identifier length (hostname or dotted address)
pub const MAX_HOST_LEN: usize = 64;

/// Reasons an endpoint is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EndpointError {
    /// Host identifier is empty
    EmptyHost,
    /// Host identifier does not fit in [`MAX_HOST_LEN`] bytes
    HostTooLong,
    /// Port zero is not connectable
    ZeroPort,
}

/// Host and port identifying the far side of a connection
///
/// The host is copied into fixed storage, so an endpoint never borrows
/// from the caller and stays valid for as long as the device holding it.
/// Only [`Endpoint::new`] builds one; persisted endpoints live in
/// [`LinkConfig`](crate::config::LinkConfig) and are validated on decode.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Endpoint {
    host: String<MAX_HOST_LEN>,
    port: u16,
}

impl Endpoint {
    /// Validate and copy an endpoint
    pub fn new(host: &str, port: u16) -> Result<Self, EndpointError> {
        if host.is_empty() {
            return Err(EndpointError::EmptyHost);
        }
        if port == 0 {
            return Err(EndpointError::ZeroPort);
        }

        let mut owned = String::new();
        owned
            .push_str(host)
            .map_err(|_| EndpointError::HostTooLong)?;

        Ok(Self { host: owned, port })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}
