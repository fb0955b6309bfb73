//! Sensor pipeline: acquisition → transformation → persistence.
//!
//! ```text
//! ┌─────────────┐  Sample  ┌───────────┐  Reading  ┌─────────────┐
//! │ Acquisition │─────────▶│ Transform │──────────▶│ Persistence │──▶ RTDB
//! │  (periodic) │  queue   │ (blocking)│   queue   │  (blocking) │
//! └─────────────┘  (10)    └───────────┘   (10)    └─────────────┘
//! ```
//!
//! Each stage runs in its own thread.  Payloads move by value through the
//! queues, so each one is consumed exactly once.  Errors never cross a
//! queue: the acquisition stage only enqueues successful samples.

pub mod acquisition;
pub mod persistence;
pub mod queue;
pub mod transform;

use queue::{BoundedQueue, QUEUE_DEPTH};

/// Raw ADC code, driver-native range.
pub type Sample = i16;

/// A converted sample paired with its raw source value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reading {
    pub raw_value: i16,
    pub derived_value: i32,
}

pub type SampleQueue = BoundedQueue<Sample, QUEUE_DEPTH>;
pub type ReadingQueue = BoundedQueue<Reading, QUEUE_DEPTH>;

/// Acquisition → transformation.
pub static SAMPLE_QUEUE: SampleQueue = BoundedQueue::new();

/// Transformation → persistence.
pub static READING_QUEUE: ReadingQueue = BoundedQueue::new();
