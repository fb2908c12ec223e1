//! Events that trigger connection state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Caller events
    /// `connect()` accepted with a valid endpoint
    ConnectRequested,
    /// `disconnect()` called
    DisconnectRequested,

    // Driver events
    /// Servicing routine picked up the connect request
    NegotiationStarted,
    /// Device-specific connection steps finished
    NegotiationComplete,
    /// Device-specific connection steps gave up
    NegotiationFailed,
    /// Servicing routine picked up the disconnect request
    TeardownStarted,
    /// Device-specific teardown finished
    TeardownComplete,
    /// Far side closed or the carrier went away
    LinkDropped,
}

impl Event {
    /// Check if this event ends a connection attempt or session abnormally
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::NegotiationFailed | Event::LinkDropped)
    }
}
