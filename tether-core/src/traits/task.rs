//! Servicing routine contract

/// Work a cooperative scheduler runs on every tick
///
/// Drivers implement this to do their actual device I/O: inspect pending
/// requests and connection state, advance negotiation or teardown by one
/// step, and move bytes between the hardware and their buffers.
///
/// `run` must return promptly. Anything that would wait on the hardware is
/// split across ticks instead.
pub trait Task {
    /// Perform one bounded slice of work
    fn run(&mut self);
}

impl<T: Task + ?Sized> Task for &mut T {
    fn run(&mut self) {
        (**self).run();
    }
}
