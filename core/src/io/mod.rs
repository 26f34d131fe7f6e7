//! Whole-file write and read.
//!
//! Responsibilities:
//! - Header + linearized block stream out of a `Document`
//! - Header check, block decode and tree replay back into a `Document`
//! - Normalized byte sources and sinks (file, memory, any reader/writer)
//!
//! Non-responsibilities:
//! - Payload layouts (see `codec`)
//! - Block ordering (see `linearize`)
//!
//! Design notes:
//! - A pass either returns a complete result or an error; nothing partial
//!   is ever written or handed back.
//! - Telemetry is always collected; the plain entry points drop it.

pub mod writer;
pub mod reader;
pub mod source;

pub use writer::{write, write_to, write_with_telemetry};
pub use reader::{decode, read, read_from, read_with_telemetry};
pub use source::{open_input, open_output, InputSource, OutputSink};
