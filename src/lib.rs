//! I/O node firmware library.
//!
//! Exposes the task loops, the shared store and the port traits for
//! integration testing. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module; on the host the
//! drivers fall back to an in-memory simulation.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod rtdb;
pub mod scheduler;

pub mod adapters;
pub mod drivers;
pub mod pins;
pub mod sensors;
