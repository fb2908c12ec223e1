//! Modem control line abstractions
//!
//! Transparent modems and serial bridges signal session state on the
//! classic RS-232 lines: the host raises DTR to request a link and the
//! module raises DCD once the far side is reachable. Lines are described
//! in terms of assertion rather than voltage so drivers do not care how
//! a given board wires them.

/// Output control line (DTR, RTS, power key, ...)
pub trait ControlOutput {
    /// Assert the line
    fn assert(&mut self);

    /// Release the line
    fn deassert(&mut self);

    /// Check if the line is currently asserted
    fn is_asserted(&self) -> bool;
}

/// Input control line (DCD, CTS, RI, ...)
pub trait ControlInput {
    /// Check if the peer is asserting the line
    fn is_asserted(&self) -> bool;
}

/// Inverts a control line wired active-low
///
/// Most level shifters on modem boards invert RS-232 signals, so a
/// physically low DCD pin means carrier present.
#[derive(Debug, Clone, Copy)]
pub struct ActiveLow<L>(pub L);

impl<L> ActiveLow<L> {
    /// Get the wrapped line back
    pub fn into_inner(self) -> L {
        self.0
    }
}

impl<L: ControlOutput> ControlOutput for ActiveLow<L> {
    fn assert(&mut self) {
        self.0.deassert();
    }

    fn deassert(&mut self) {
        self.0.assert();
    }

    fn is_asserted(&self) -> bool {
        !self.0.is_asserted()
    }
}

impl<L: ControlInput> ControlInput for ActiveLow<L> {
    fn is_asserted(&self) -> bool {
        !self.0.is_asserted()
    }
}
