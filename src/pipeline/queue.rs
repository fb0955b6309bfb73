//! Bounded blocking queue between pipeline stages.
//!
//! Wraps an `embassy-sync` MPMC channel so plain threads can use it:
//! `put` parks the caller while the queue is full, `get` parks it while
//! the queue is empty.  Nothing is ever dropped or reordered.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use futures_lite::future::block_on;

/// Capacity of both pipeline queues.
pub const QUEUE_DEPTH: usize = 10;

/// Fixed-capacity FIFO with blocking put/get.
pub struct BoundedQueue<T, const N: usize> {
    channel: Channel<CriticalSectionRawMutex, T, N>,
}

impl<T, const N: usize> Default for BoundedQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> BoundedQueue<T, N> {
    /// An empty queue; `const` so pipeline queues can be statics.
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue, blocking while the queue is full (backpressure).
    pub fn put(&self, item: T) {
        block_on(self.channel.send(item));
    }

    /// Dequeue the oldest item, blocking while the queue is empty.
    pub fn get(&self) -> T {
        block_on(self.channel.receive())
    }

    /// Enqueue without blocking; hands the item back when full.
    pub fn try_put(&self, item: T) -> Result<(), T> {
        self.channel
            .try_send(item)
            .map_err(|embassy_sync::channel::TrySendError::Full(item)| item)
    }

    /// Dequeue without blocking.
    pub fn try_get(&self) -> Option<T> {
        self.channel.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.channel.is_full()
    }
}
