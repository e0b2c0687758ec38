//! Cooperative cancellation for in-flight requests.
//!
//! An [`AbortSignal`] is shared by cloning. Aborting it preempts the current
//! attempt, any pending backoff, and all remaining retries of every request
//! observing it.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Reason reported when a signal is aborted without one.
pub const DEFAULT_ABORT_REASON: &str = "Aborted";

/// Reason reported when a signal's deadline passes.
pub const TIMEOUT_REASON: &str = "Timeout";

/// A cloneable cancellation handle carrying an abort reason.
#[derive(Clone)]
pub struct AbortSignal {
    state: Arc<watch::Sender<Option<String>>>,
    deadline: Option<Instant>,
}

impl AbortSignal {
    /// A signal that only fires when [`abort`](Self::abort) is called.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            state: Arc::new(tx),
            deadline: None,
        }
    }

    /// A signal that also fires once `after` has elapsed, measured from now.
    pub fn timeout(after: Duration) -> Self {
        let mut signal = Self::new();
        signal.deadline = Some(Instant::now() + after);
        signal
    }

    /// Abort with the default reason.
    pub fn abort(&self) {
        self.abort_with(DEFAULT_ABORT_REASON);
    }

    /// Abort with a reason. The first reason wins.
    pub fn abort_with(&self, reason: impl Into<String>) {
        let reason = reason.into();
        self.state.send_if_modified(|current| {
            if current.is_none() {
                *current = Some(reason);
                true
            } else {
                false
            }
        });
    }

    /// Whether the signal has fired.
    pub fn is_aborted(&self) -> bool {
        self.reason().is_some()
    }

    /// The abort reason, if the signal has fired.
    pub fn reason(&self) -> Option<String> {
        if let Some(reason) = self.state.borrow().clone() {
            return Some(reason);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(TIMEOUT_REASON.to_string()),
            _ => None,
        }
    }

    /// Resolve with the abort reason once the signal fires.
    pub async fn aborted(&self) -> String {
        let mut rx = self.state.subscribe();
        let manual = async move {
            loop {
                if let Some(reason) = rx.borrow_and_update().clone() {
                    return reason;
                }
                if rx.changed().await.is_err() {
                    // Sender gone: a manual abort can no longer happen.
                    std::future::pending::<()>().await;
                }
            }
        };
        match self.deadline {
            Some(deadline) => tokio::select! {
                reason = manual => reason,
                _ = tokio::time::sleep_until(deadline) => TIMEOUT_REASON.to_string(),
            },
            None => manual.await,
        }
    }
}

impl Default for AbortSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortSignal")
            .field("reason", &self.reason())
            .field("deadline", &self.deadline)
            .finish()
    }
}

/// Where a request gets its signal from.
#[derive(Clone)]
pub enum SignalSource {
    /// One signal shared by every request
    Shared(AbortSignal),
    /// A fresh signal per request, e.g. a per-request timeout
    Factory(Arc<dyn Fn() -> AbortSignal + Send + Sync>),
}

impl SignalSource {
    /// A per-request factory.
    pub fn factory(f: impl Fn() -> AbortSignal + Send + Sync + 'static) -> Self {
        SignalSource::Factory(Arc::new(f))
    }

    /// A fresh per-request timeout.
    pub fn per_request_timeout(after: Duration) -> Self {
        Self::factory(move || AbortSignal::timeout(after))
    }

    /// The signal for the next request.
    pub fn signal(&self) -> AbortSignal {
        match self {
            SignalSource::Shared(signal) => signal.clone(),
            SignalSource::Factory(f) => f(),
        }
    }
}

impl From<AbortSignal> for SignalSource {
    fn from(signal: AbortSignal) -> Self {
        SignalSource::Shared(signal)
    }
}

impl fmt::Debug for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalSource::Shared(signal) => f.debug_tuple("Shared").field(signal).finish(),
            SignalSource::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_reason_wins() {
        let signal = AbortSignal::new();
        assert!(!signal.is_aborted());
        signal.abort_with("user cancelled");
        signal.abort_with("second");
        assert_eq!(signal.reason().as_deref(), Some("user cancelled"));
    }

    #[test]
    fn clones_share_state() {
        let signal = AbortSignal::new();
        let clone = signal.clone();
        clone.abort();
        assert_eq!(signal.reason().as_deref(), Some(DEFAULT_ABORT_REASON));
    }

    #[tokio::test]
    async fn aborted_resolves_when_fired_from_another_task() {
        let signal = AbortSignal::new();
        let trigger = signal.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.abort_with("stop");
        });
        assert_eq!(signal.aborted().await, "stop");
    }

    #[tokio::test]
    async fn timeout_signal_fires_after_deadline() {
        let signal = AbortSignal::timeout(Duration::from_millis(10));
        assert!(!signal.is_aborted());
        assert_eq!(signal.aborted().await, TIMEOUT_REASON);
        assert_eq!(signal.reason().as_deref(), Some(TIMEOUT_REASON));
    }

    #[test]
    fn factory_yields_fresh_signals() {
        let source = SignalSource::factory(AbortSignal::new);
        let first = source.signal();
        first.abort();
        assert!(!source.signal().is_aborted());

        let shared = SignalSource::from(AbortSignal::new());
        shared.signal().abort();
        assert!(shared.signal().is_aborted());
    }
}
