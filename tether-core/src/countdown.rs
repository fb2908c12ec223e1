//! Millisecond countdown timers
//!
//! Protocol clients above the device layer own their timeouts (keep-alive
//! intervals, connect deadlines). They poll a [`Countdown`] on each tick
//! instead of sleeping.

/// Longest span a countdown can represent (about 24.8 days)
///
/// Longer requests are clamped to it.
pub const MAX_SPAN_MS: u32 = i32::MAX as u32;

/// Free-running millisecond tick counter
///
/// The counter may wrap; countdowns compare ticks with wrapping
/// arithmetic and stay correct for spans up to [`MAX_SPAN_MS`].
pub trait TickSource {
    /// Current tick count in milliseconds
    fn now_ms(&self) -> u32;
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Deadline measured against a [`TickSource`]
#[derive(Debug, Clone)]
pub struct Countdown<C> {
    clock: C,
    end_ms: u32,
}

impl<C: TickSource> Countdown<C> {
    /// Create a countdown that has already expired
    pub fn new(clock: C) -> Self {
        let end_ms = clock.now_ms();
        Self { clock, end_ms }
    }

    /// Create a countdown expiring `ms` from now
    pub fn with_ms(clock: C, ms: u32) -> Self {
        let mut countdown = Self::new(clock);
        countdown.countdown_ms(ms);
        countdown
    }

    /// Restart, expiring `ms` from now, at most [`MAX_SPAN_MS`]
    pub fn countdown_ms(&mut self, ms: u32) {
        self.end_ms = self.clock.now_ms().wrapping_add(ms.min(MAX_SPAN_MS));
    }

    /// Restart, expiring `seconds` from now
    pub fn countdown(&mut self, seconds: u32) {
        self.countdown_ms(seconds.saturating_mul(1000));
    }

    /// Milliseconds until expiry, negative once the deadline has passed
    pub fn left_ms(&self) -> i32 {
        self.end_ms.wrapping_sub(self.clock.now_ms()) as i32
    }

    /// Check if the deadline has been reached
    pub fn expired(&self) -> bool {
        self.left_ms() <= 0
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
