use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// The two runtime-tunable durations of the registry.
///
/// Parsed from the `[sessions]` table of `agentviz.toml`:
///
/// ```toml
/// [sessions]
/// ttl = "30m"
/// sweep_interval = "60s"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Idle time after which a session is reaped.
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
    /// How often the reaper sweeps.
    #[serde(with = "humantime_serde")]
    pub sweep_interval: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_SESSION_TTL,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl RegistryConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_sweep_interval(mut self, sweep_interval: Duration) -> Self {
        self.sweep_interval = sweep_interval;
        self
    }
}
