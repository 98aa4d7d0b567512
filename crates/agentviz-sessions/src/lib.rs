//! # agentviz-sessions
//!
//! Session lifecycle, sub-agent correlation and idle expiry.
//!
//! ## Key Types
//!
//! - [`SessionRegistry`] - Owns every live session and emits `started`/`ended`
//! - [`SpawnCorrelator`] - FIFO pairing of spawn commands with sub-agent files
//! - [`TtlReaper`] - Periodic sweep removing idle sessions
//! - [`RegistryConfig`] - Session TTL and sweep interval

mod config;
mod correlation;
mod reaper;
mod registry;
mod types;

pub use config::{RegistryConfig, DEFAULT_SESSION_TTL, DEFAULT_SWEEP_INTERVAL};
pub use correlation::{Binding, FileCorrelation, SpawnCorrelator};
pub use reaper::{sweep, TtlReaper};
pub use registry::{lock_registry, SessionRegistry, SharedRegistry};
pub use types::{RegistryState, SessionSnapshot, SessionState};
