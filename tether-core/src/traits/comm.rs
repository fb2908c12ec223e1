//! Communication device capability interface

/// Uniform contract for cellular modems, Wi-Fi modules and similar
/// transports
///
/// Every method is non-blocking: it records intent or moves bytes between
/// the caller and the device's buffers, then returns. Talking to the
/// hardware happens only in the driver's [`Task::run`](super::Task::run),
/// which the scheduler calls at regular intervals. Callers observe
/// progress by polling [`is_connected`](Self::is_connected) and
/// [`bytes_available`](Self::bytes_available) across ticks.
///
/// Failures are never raised; they show up as `false` or a short count.
pub trait CommDevice {
    /// Request a connection to the configured endpoint
    ///
    /// Returns `false` without changing state if no valid endpoint is set
    /// or a connection already exists or is in progress. Otherwise the
    /// request is recorded and `true` returned; establishment happens
    /// later in the servicing routine.
    fn connect(&mut self) -> bool;

    /// Request the connection be closed
    ///
    /// Accepted in every state. Issued during a connect, it aborts the
    /// attempt.
    fn disconnect(&mut self);

    /// Check if the device can exchange data with its far side
    fn is_connected(&self) -> bool;

    /// Check if no connection exists and a new one may be requested
    ///
    /// Never true together with [`is_connected`](Self::is_connected);
    /// both are false while a connect or disconnect is under way.
    fn is_idle(&self) -> bool;

    /// Number of received bytes ready for [`read`](Self::read)
    ///
    /// Reported in every state so data can be drained after a disconnect.
    fn bytes_available(&self) -> u16;

    /// Number of bytes [`write`](Self::write) would accept right now
    ///
    /// Always `0` unless connected.
    fn space_available(&self) -> u16;

    /// Copy already-received bytes into `buf`
    ///
    /// Returns the number of bytes copied, at most `buf.len()`. Never waits
    /// for more data.
    fn read(&mut self, buf: &mut [u8]) -> u16;

    /// Queue bytes for transmission
    ///
    /// Returns the number of bytes accepted, at most `data.len()`, and `0`
    /// unless connected. Bytes past the returned count are not queued and
    /// must be offered again.
    fn write(&mut self, data: &[u8]) -> u16;
}
