//! # agentviz-events
//!
//! The privacy-safe event model shared by every agentviz crate.
//!
//! ## Key Types
//!
//! - [`NormalizedEvent`] - One normalized activity event (envelope + payload)
//! - [`EventPayload`] - The six event variants
//! - [`EventContext`] - Builder that stamps ids, session and timestamps
//! - [`EventChannel`] - Best-effort broadcast of events to subscribers
//! - [`Source`] - Which agent tool produced a log

mod channel;
mod event;
mod factory;
mod source;

pub use channel::{EventChannel, DEFAULT_CHANNEL_CAPACITY};
pub use event::{
    ActivityAction, ActivityPayload, AgentAction, AgentPayload, ErrorPayload, EventPayload,
    NormalizedEvent, SessionAction, SessionPayload, Severity, TokenUsage, ToolCategory,
    ToolPayload, ToolStatus,
};
pub use factory::{non_empty, timestamp_or_now, EventContext};
pub use source::{Source, UnknownSourceError};
