//! # agentviz-core
//!
//! Wires reader signals through the parser, the source adapters and the
//! session registry onto the outbound event channel.
//!
//! ## Key Types
//!
//! - [`Pipeline`] - Handles one [`ReaderSignal`] at a time
//! - [`ReaderSignal`] - File discovery or appended line from the log reader

mod error;
mod pipeline;
mod signal;

pub use error::SignalError;
pub use pipeline::{Pipeline, UNKNOWN_PROJECT};
pub use signal::{Discovery, LineSignal, ReaderSignal};
