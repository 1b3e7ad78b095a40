use std::time::Duration;

use strata_result::{Error, Result};

/// Sets [`SourceDriverConfig::idle_backoff`] in milliseconds.
pub const IDLE_BACKOFF_ENV: &str = "STRATA_DRIVER_IDLE_BACKOFF_MS";
/// Sets [`SourceDriverConfig::max_idle_rounds`]; `0` or `none` disables the limit.
pub const MAX_IDLE_ROUNDS_ENV: &str = "STRATA_DRIVER_MAX_IDLE_ROUNDS";

/// Run-time configuration of a [`SourceDriver`](crate::SourceDriver).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDriverConfig {
    /// Sleep after a round in which every active source was pending.
    pub idle_backoff: Duration,
    /// Consecutive all-pending rounds tolerated before the driver gives up.
    /// `None` waits forever.
    pub max_idle_rounds: Option<usize>,
}

impl Default for SourceDriverConfig {
    fn default() -> Self {
        Self {
            idle_backoff: Duration::from_millis(1),
            max_idle_rounds: None,
        }
    }
}

impl SourceDriverConfig {
    /// Defaults overridden by any of the driver environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(IDLE_BACKOFF_ENV) {
            let millis: u64 = raw.trim().parse().map_err(|_| invalid(IDLE_BACKOFF_ENV, &raw))?;
            config.idle_backoff = Duration::from_millis(millis);
        }
        if let Some(raw) = lookup(MAX_IDLE_ROUNDS_ENV) {
            let raw_trimmed = raw.trim();
            config.max_idle_rounds = if raw_trimmed.eq_ignore_ascii_case("none") {
                None
            } else {
                match raw_trimmed.parse::<usize>() {
                    Ok(0) => None,
                    Ok(rounds) => Some(rounds),
                    Err(_) => return Err(invalid(MAX_IDLE_ROUNDS_ENV, &raw)),
                }
            };
        }
        Ok(config)
    }

    pub fn with_idle_backoff(mut self, idle_backoff: Duration) -> Self {
        self.idle_backoff = idle_backoff;
        self
    }

    pub fn with_max_idle_rounds(mut self, max_idle_rounds: Option<usize>) -> Self {
        self.max_idle_rounds = max_idle_rounds;
        self
    }
}

fn invalid(key: &str, raw: &str) -> Error {
    Error::InvalidArgumentError(format!("{key} must be a non-negative integer, got {raw:?}"))
}
