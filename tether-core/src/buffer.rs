//! Fixed-capacity byte ring buffer
//!
//! Each device owns one buffer per direction. The caller side and the
//! servicing routine exchange bytes only through these, so neither side
//! ever waits on the other.

use heapless::Deque;

/// FIFO byte store with non-blocking push/pull
///
/// Capacity is fixed at compile time, must be non-zero and may not exceed
/// `u16::MAX`, the ceiling for every count reported through the device
/// interface.
/// `available_data() + available_space() == capacity()` always holds.
#[derive(Debug, Clone)]
pub struct RingBuffer<const N: usize> {
    inner: Deque<u8, N>,
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<N> {
    const CAPACITY_IN_RANGE: () = assert!(
        N > 0 && N <= u16::MAX as usize,
        "ring buffer capacity must be within 1..=u16::MAX"
    );

    /// Create an empty buffer
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_IN_RANGE;
        Self {
            inner: Deque::new(),
        }
    }

    /// Total number of bytes the buffer holds when full
    pub const fn capacity(&self) -> u16 {
        N as u16
    }

    /// Number of bytes queued and not yet pulled
    pub fn available_data(&self) -> u16 {
        self.inner.len() as u16
    }

    /// Number of bytes that can be pushed before the buffer is full
    pub fn available_space(&self) -> u16 {
        (N - self.inner.len()) as u16
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    /// Append bytes in order
    ///
    /// Copies `min(data.len(), available_space())` bytes and returns that
    /// count. Unread bytes are never overwritten; whatever does not fit is
    /// left for the caller to offer again.
    pub fn push(&mut self, data: &[u8]) -> u16 {
        let count = data.len().min(self.available_space() as usize);
        for &byte in &data[..count] {
            // Cannot fail, count is bounded by the free space
            let _ = self.inner.push_back(byte);
        }
        count as u16
    }

    /// Remove bytes in FIFO order
    ///
    /// Copies `min(dest.len(), available_data())` bytes into `dest` and
    /// returns that count.
    pub fn pull(&mut self, dest: &mut [u8]) -> u16 {
        let mut count = 0u16;
        for slot in dest.iter_mut() {
            match self.inner.pop_front() {
                Some(byte) => {
                    *slot = byte;
                    count += 1;
                }
                None => break,
            }
        }
        count
    }

    /// Copy bytes from the front without removing them
    ///
    /// Drivers use this with [`discard`](Self::discard) to hand queued
    /// data to a peripheral that may accept only part of it.
    pub fn peek(&self, dest: &mut [u8]) -> u16 {
        let mut count = 0u16;
        for (slot, &byte) in dest.iter_mut().zip(self.inner.iter()) {
            *slot = byte;
            count += 1;
        }
        count
    }

    /// Drop up to `count` bytes from the front, returning how many went
    pub fn discard(&mut self, count: u16) -> u16 {
        let mut dropped = 0u16;
        while dropped < count && self.inner.pop_front().is_some() {
            dropped += 1;
        }
        dropped
    }

    /// Drop all queued bytes
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}
