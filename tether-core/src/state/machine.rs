//! State machine definition
//!
//! Connectivity, buffer gating and driver work are all a function of the
//! current state and an event.

use super::events::Event;

/// Connection states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// No connection exists; a new one may be requested
    #[default]
    NotConnected,
    /// Connect accepted, waiting for the servicing routine
    ConnectPending,
    /// Driver negotiating with the device and far side
    Connecting,
    /// Link up, reads and writes reach the far side
    Connected,
    /// Disconnect accepted, waiting for the servicing routine
    DisconnectPending,
    /// Driver tearing the link down
    Disconnecting,
}

impl ConnectionState {
    /// Check if data can flow to the far side
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    /// Check if no connection exists and a new one may be requested
    pub fn is_idle(&self) -> bool {
        matches!(self, ConnectionState::NotConnected)
    }

    /// Process an event and return the next state
    ///
    /// This is the core state transition logic. Events that do not apply
    /// to the current state leave it unchanged.
    pub fn transition(self, event: Event) -> Self {
        use ConnectionState::*;
        use Event::*;

        match (self, event) {
            // NotConnected transitions
            (NotConnected, ConnectRequested) => ConnectPending,

            // ConnectPending transitions
            (ConnectPending, NegotiationStarted) => Connecting,
            // Nothing has touched the hardware yet, so cancel outright
            (ConnectPending, DisconnectRequested) => NotConnected,

            // Connecting transitions
            (Connecting, NegotiationComplete) => Connected,
            (Connecting, NegotiationFailed) => NotConnected,
            (Connecting, DisconnectRequested) => DisconnectPending,
            (Connecting, LinkDropped) => NotConnected,

            // Connected transitions
            (Connected, DisconnectRequested) => DisconnectPending,
            (Connected, LinkDropped) => NotConnected,

            // DisconnectPending transitions
            (DisconnectPending, TeardownStarted) => Disconnecting,
            (DisconnectPending, LinkDropped) => NotConnected,

            // Disconnecting transitions
            (Disconnecting, TeardownComplete) => NotConnected,
            (Disconnecting, LinkDropped) => NotConnected,

            // Default: stay in current state
            _ => self,
        }
    }
}
