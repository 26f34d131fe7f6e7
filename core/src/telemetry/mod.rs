//! telemetry/mod.rs
//! Counters, stage timers and immutable snapshots for one write or read pass.
//!
//! Responsibilities:
//! - Count blocks per kind, points and bytes (header, framing, payload)
//! - Time the linearize, encode, decode, replay and validate stages
//! - Freeze both into a serializable snapshot
//!
//! Non-responsibilities:
//! - Log output (callers use `tracing`)

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
