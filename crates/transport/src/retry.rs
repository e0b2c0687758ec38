//! Retry policy for transport failures.
//!
//! Only network/transport failures are retried. HTTP error statuses and
//! `error` fields in a 200 response are surfaced immediately.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Default number of retries after the first attempt.
pub const DEFAULT_RETRIES: u32 = 5;

/// Delay before the next attempt, given the zero-based retry count.
#[derive(Clone)]
pub struct Backoff(Arc<dyn Fn(u32) -> Duration + Send + Sync>);

impl Backoff {
    /// Wrap an arbitrary backoff function.
    pub fn new(f: impl Fn(u32) -> Duration + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// `e^retry_count * 50ms`, saturating at `Duration::MAX`.
    pub fn exponential() -> Self {
        Self::new(|retry_count| {
            Duration::try_from_secs_f64((retry_count as f64).exp() * 0.05).unwrap_or(Duration::MAX)
        })
    }

    /// The same delay before every retry.
    pub fn constant(delay: Duration) -> Self {
        Self::new(move |_| delay)
    }

    /// Delay before retry number `retry_count`.
    pub fn delay(&self, retry_count: u32) -> Duration {
        (self.0)(retry_count)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::exponential()
    }
}

impl fmt::Debug for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Backoff(..)")
    }
}

/// Retry configuration.
///
/// In config files this is either `retry = false` or a table such as
/// `[retry] retries = 3`. The backoff function is not serializable and
/// always decodes to the exponential default.
#[derive(Debug, Clone)]
pub enum RetryConfig {
    /// One attempt, no retries
    Disabled,
    /// Up to `retries` additional attempts after the first
    Enabled {
        /// Retries after the first attempt
        retries: u32,
        /// Delay before each retry
        backoff: Backoff,
    },
}

impl RetryConfig {
    /// Enabled with the given retry count and the default backoff.
    pub fn retries(retries: u32) -> Self {
        RetryConfig::Enabled {
            retries,
            backoff: Backoff::default(),
        }
    }

    /// Replace the backoff function; no effect when disabled.
    pub fn with_backoff(self, backoff: Backoff) -> Self {
        match self {
            RetryConfig::Disabled => RetryConfig::Disabled,
            RetryConfig::Enabled { retries, .. } => RetryConfig::Enabled { retries, backoff },
        }
    }

    /// Total number of attempts, first one included.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryConfig::Disabled => 1,
            RetryConfig::Enabled { retries, .. } => retries.saturating_add(1),
        }
    }

    /// Delay after the failed attempt `retry_count` (zero-based).
    pub fn delay(&self, retry_count: u32) -> Duration {
        match self {
            RetryConfig::Disabled => Duration::ZERO,
            RetryConfig::Enabled { backoff, .. } => backoff.delay(retry_count),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::retries(DEFAULT_RETRIES)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RetryWire {
    Flag(bool),
    Settings {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        retries: Option<u32>,
    },
}

impl Serialize for RetryConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RetryConfig::Disabled => RetryWire::Flag(false),
            RetryConfig::Enabled { retries, .. } => RetryWire::Settings {
                retries: Some(*retries),
            },
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RetryConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RetryWire::deserialize(deserializer)? {
            RetryWire::Flag(false) => RetryConfig::Disabled,
            RetryWire::Flag(true) => RetryConfig::default(),
            RetryWire::Settings { retries } => {
                RetryConfig::retries(retries.unwrap_or(DEFAULT_RETRIES))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_is_five_retries_with_exponential_backoff() {
        let retry = RetryConfig::default();
        assert_eq!(retry.attempts(), 6);
        assert_eq!(retry.delay(0), Duration::from_millis(50));
        let second = retry.delay(1).as_secs_f64();
        assert!((second - std::f64::consts::E * 0.05).abs() < 1e-9);
        assert!(retry.delay(4) > retry.delay(3));
    }

    #[test]
    fn exponential_backoff_saturates_for_large_retry_counts() {
        let retry = RetryConfig::retries(100);
        assert_eq!(retry.delay(60), Duration::MAX);
        assert_eq!(retry.delay(u32::MAX), Duration::MAX);
        assert!(retry.delay(40) < Duration::MAX);
    }

    #[test]
    fn disabled_is_a_single_attempt() {
        assert_eq!(RetryConfig::Disabled.attempts(), 1);
        assert_eq!(RetryConfig::Disabled.delay(3), Duration::ZERO);
    }

    #[test]
    fn custom_backoff_is_used() {
        let retry = RetryConfig::retries(3).with_backoff(Backoff::new(|n| Duration::from_millis(n as u64)));
        assert_eq!(retry.attempts(), 4);
        assert_eq!(retry.delay(7), Duration::from_millis(7));
    }

    #[test]
    fn decodes_false_and_table_forms() {
        let r: RetryConfig = serde_json::from_value(json!(false)).unwrap();
        assert!(matches!(r, RetryConfig::Disabled));
        let r: RetryConfig = serde_json::from_value(json!({"retries": 2})).unwrap();
        assert_eq!(r.attempts(), 3);
        let r: RetryConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(r.attempts(), DEFAULT_RETRIES + 1);
        assert_eq!(serde_json::to_value(RetryConfig::Disabled).unwrap(), json!(false));
    }
}
