use backon::ConstantBuilder;
use rand::Rng as _;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::FetchError;

pub const UPSTREAM_BODY_PREVIEW_CHARS: usize = 300;

/// Attempt budget and the delays between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub politeness_min: Duration,
    pub politeness_max: Duration,
    pub rate_limit_delay: Duration,
    pub error_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(cfg: &FetchConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts.max(1),
            politeness_min: Duration::from_millis(cfg.politeness_min_ms),
            politeness_max: Duration::from_millis(cfg.politeness_max_ms),
            rate_limit_delay: Duration::from_secs(cfg.rate_limit_delay_secs),
            error_delay: Duration::from_secs(cfg.error_delay_secs),
        }
    }

    /// Constant backoff allowing `max_attempts - 1` retries after the first try.
    ///
    /// The builder's delay is the generic error delay; [`Self::delay_for`]
    /// swaps in the rate-limit delay per failure.
    pub fn backoff(&self) -> ConstantBuilder {
        ConstantBuilder::default()
            .with_delay(self.error_delay)
            .with_max_times(self.max_attempts.max(1) - 1)
    }

    /// Cooldown owed after a failed attempt.
    pub fn delay_for(&self, err: &FetchError) -> Duration {
        match err {
            FetchError::RateLimited(_) => self.rate_limit_delay,
            _ => self.error_delay,
        }
    }

    /// Uniform draw from `[politeness_min, politeness_max]`.
    pub fn politeness_delay(&self) -> Duration {
        if self.politeness_min >= self.politeness_max {
            return self.politeness_min;
        }
        rand::rng().random_range(self.politeness_min..=self.politeness_max)
    }
}
