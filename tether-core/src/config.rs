//! Link configuration
//!
//! Describes which far side a device connects to and how long the layers
//! above should wait for it. Configuration is stored in flash as
//! postcard-serialized binary data when the `serde` feature is enabled.

use heapless::String;

use crate::endpoint::{Endpoint, EndpointError, MAX_HOST_LEN};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest encoded [`LinkConfig`]: host bytes plus length and varint fields
pub const MAX_ENCODED_LEN: usize = MAX_HOST_LEN + 16;

/// Errors from loading or storing a link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Stored endpoint is not connectable
    Endpoint(EndpointError),
    /// Serialization failed (buffer too small)
    Encode,
    /// Deserialization failed (corrupt or truncated data)
    Decode,
}

impl From<EndpointError> for ConfigError {
    fn from(e: EndpointError) -> Self {
        ConfigError::Endpoint(e)
    }
}

/// Connection settings for one device
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Hostname or dotted address of the far side
    pub host: String<MAX_HOST_LEN>,
    /// TCP/UDP port of the far side
    pub port: u16,
    /// How long a connect may stay unresolved before it is abandoned (ms)
    pub connect_timeout_ms: u32,
    /// Servicing ticks a driver spends negotiating before giving up
    pub negotiation_ticks: u16,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 1883,
            connect_timeout_ms: 30_000,
            negotiation_ticks: 100,
        }
    }
}

impl LinkConfig {
    /// Validated endpoint for this configuration
    pub fn endpoint(&self) -> Result<Endpoint, EndpointError> {
        Endpoint::new(&self.host, self.port)
    }

    /// Serialize into `buf`, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Encode)
    }

    /// Deserialize and validate a stored configuration
    #[cfg(feature = "serde")]
    pub fn decode(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;
        config.endpoint()?;
        Ok(config)
    }
}
