//! Recorded caller intent

/// Connect/disconnect requests not yet acted on
///
/// Set from the capability interface and cleared only by the servicing
/// routine, so intent survives even while the driver is mid-transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingFlags {
    /// `connect()` accepted since the last servicing pass
    pub connect: bool,
    /// `disconnect()` called since the last servicing pass
    pub disconnect: bool,
}

impl PendingFlags {
    /// Check if any request is outstanding
    pub fn any(&self) -> bool {
        self.connect || self.disconnect
    }

    /// Clear the connect request, returning whether it was set
    pub fn take_connect(&mut self) -> bool {
        core::mem::replace(&mut self.connect, false)
    }

    /// Clear the disconnect request, returning whether it was set
    pub fn take_disconnect(&mut self) -> bool {
        core::mem::replace(&mut self.disconnect, false)
    }
}
