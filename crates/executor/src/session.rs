//! Stateful session for resumable queries.
//!
//! A [`ResumableQuery`] wraps an [`Executor`] and tracks one server-side query
//! session through three states:
//!
//! ```text
//! NotStarted --start()--> Active --stop()--> Stopped
//!                           |  ^
//!                           +--+ fetch_next()
//! ```
//!
//! Preconditions are checked before any request is sent.
//!
//! # Usage
//!
//! ```text
//! use quiver::{QueryRequest, ResumableQuery, ResumableQueryRequest};
//!
//! let request = ResumableQueryRequest::new(QueryRequest::vector(v, 10), 3600);
//! let mut query = ResumableQuery::new(executor.clone(), request, None)?;
//!
//! let first = query.start().await?.to_vec();
//! let more = query.fetch_next(10).await?;
//! query.stop().await?;
//! ```

use quiver_core::{Error, QueryResult, Result};

use crate::types::ResumableQueryRequest;
use crate::{Command, Executor, Output};

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    NotStarted,
    Active { uuid: String },
    Stopped,
}

/// A paged query session held open on the server.
///
/// The session id is never exposed. If an active session is dropped inside a
/// tokio runtime, a best-effort stop is sent in the background; otherwise the
/// server expires it after `max_idle` seconds.
#[derive(Debug)]
pub struct ResumableQuery {
    executor: Executor,
    start: Command,
    state: SessionState,
    result: Vec<QueryResult>,
}

impl ResumableQuery {
    /// Create a session. No request is sent until [`start`](Self::start).
    ///
    /// The query is validated and its endpoint fixed here.
    pub fn new(
        executor: Executor,
        request: ResumableQueryRequest,
        namespace: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            executor,
            start: Command::resumable_query_start(request, namespace)?,
            state: SessionState::NotStarted,
            result: Vec::new(),
        })
    }

    /// Open the session and return the first batch of matches.
    ///
    /// The batch is also kept and available from [`result`](Self::result).
    pub async fn start(&mut self) -> Result<&[QueryResult]> {
        match self.state {
            SessionState::NotStarted => {}
            SessionState::Active { .. } => return Err(Error::SessionAlreadyStarted),
            SessionState::Stopped => return Err(Error::SessionStopped),
        }

        match self.executor.execute(self.start.clone()).await? {
            Output::ResumableQueryStarted { uuid, scores } => {
                self.state = SessionState::Active { uuid };
                self.result = scores;
                Ok(&self.result)
            }
            Output::Aborted { reason } => Err(Error::Aborted { reason }),
            _ => Err(Error::Internal {
                reason: "Unexpected output for ResumableQueryStart".into(),
            }),
        }
    }

    /// Fetch `additional_k` more matches. Does not change state.
    pub async fn fetch_next(&self, additional_k: u32) -> Result<Vec<QueryResult>> {
        let uuid = self.active_uuid()?;
        match self
            .executor
            .execute(Command::resumable_query_next(uuid, additional_k))
            .await?
        {
            Output::Matches(matches) => Ok(matches),
            Output::Aborted { reason } => Err(Error::Aborted { reason }),
            _ => Err(Error::Internal {
                reason: "Unexpected output for ResumableQueryNext".into(),
            }),
        }
    }

    /// Close the session and return the service's acknowledgment.
    ///
    /// If the request fails the session stays active and `stop` may be retried.
    pub async fn stop(&mut self) -> Result<String> {
        let uuid = self.active_uuid()?.to_string();
        match self
            .executor
            .execute(Command::resumable_query_end(uuid))
            .await?
        {
            Output::Message(ack) => {
                self.state = SessionState::Stopped;
                Ok(ack)
            }
            Output::Aborted { reason } => Err(Error::Aborted { reason }),
            _ => Err(Error::Internal {
                reason: "Unexpected output for ResumableQueryEnd".into(),
            }),
        }
    }

    /// First batch returned by [`start`](Self::start); empty before that.
    pub fn result(&self) -> &[QueryResult] {
        &self.result
    }

    /// Whether the session is open.
    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    /// Whether the session has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.state == SessionState::Stopped
    }

    fn active_uuid(&self) -> Result<&str> {
        match &self.state {
            SessionState::Active { uuid } => Ok(uuid),
            SessionState::NotStarted => Err(Error::SessionNotStarted),
            SessionState::Stopped => Err(Error::SessionStopped),
        }
    }
}

impl Drop for ResumableQuery {
    fn drop(&mut self) {
        let SessionState::Active { uuid } = std::mem::replace(&mut self.state, SessionState::Stopped)
        else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let executor = self.executor.clone();
        handle.spawn(async move {
            if let Err(e) = executor.execute(Command::resumable_query_end(uuid)).await {
                tracing::debug!(
                    target: "quiver::session",
                    error = %e,
                    "Failed to stop dropped resumable query"
                );
            }
        });
    }
}
