//! Error types for the Quiver client.
//!
//! All failures surfaced by the client are represented by the [`Error`] enum.
//! These errors are:
//! - **Structured**: Each variant has typed fields for error details
//! - **Serializable**: Can be converted to/from JSON
//! - **Cloneable**: A single error can be reported to several waiters

use serde::{Deserialize, Serialize};

/// Client errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Validation | `InvalidInput` | Payload rejected before any request is sent |
/// | Session | `SessionNotStarted`, `SessionAlreadyStarted`, `SessionStopped` | Resumable query misuse |
/// | Transport | `Transport` | Network failure after all retry attempts |
/// | Service | `Service` | Non-OK status or `error` field returned by the service |
/// | Protocol | `ProtocolViolation` | Response carried neither `result` nor `error` |
/// | Cancellation | `Aborted` | The request's abort signal fired |
/// | System | `Serialization`, `Config`, `Internal` | Local infrastructure errors |
///
/// # Example
///
/// ```ignore
/// use quiver::{Error, Index};
///
/// match index.delete(["a", "b"], None).await {
///     Ok(deleted) => println!("deleted {}", deleted),
///     Err(Error::Service { message, .. }) => eprintln!("service said: {}", message),
///     Err(e) => eprintln!("error: {}", e),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Validation ====================
    /// Payload shape rejected client-side
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input
        reason: String,
    },

    // ==================== Session ====================
    /// `fetch_next`/`stop` called before `start`
    #[error("resumable query has not been started, call start() first")]
    SessionNotStarted,

    /// `start` called on a session that already holds a server-side query
    #[error("resumable query has already been started")]
    SessionAlreadyStarted,

    /// Any call on a session after `stop`
    #[error("the resumable query has already been stopped, please start another resumable query")]
    SessionStopped,

    // ==================== Transport ====================
    /// Network failure after exhausting all attempts
    #[error("transport error after {attempts} attempt(s): {reason}")]
    Transport {
        /// Last network error
        reason: String,
        /// Attempts made, first one included
        attempts: u32,
    },

    // ==================== Service ====================
    /// Error reported by the remote service
    #[error("service error: {message}")]
    Service {
        /// Message from the service
        message: String,
        /// HTTP status, absent for an `error` field in a 200 response
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
    },

    // ==================== Protocol ====================
    /// Response envelope carried neither `result` nor `error`
    #[error("protocol violation: {reason}")]
    ProtocolViolation {
        /// What the response was missing
        reason: String,
    },

    // ==================== Cancellation ====================
    /// Request was aborted through its signal
    #[error("request aborted: {reason}")]
    Aborted {
        /// Reason carried by the signal
        reason: String,
    },

    // ==================== System ====================
    /// JSON encoding or decoding failed
    #[error("serialization error: {reason}")]
    Serialization {
        /// Decoder message
        reason: String,
    },

    /// Missing or malformed client configuration
    #[error("configuration error: {reason}")]
    Config {
        /// What is missing or malformed
        reason: String,
    },

    /// Internal error (bug or invariant violation)
    #[error("internal error: {reason}")]
    Internal {
        /// Description of the violated invariant
        reason: String,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidInput`].
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::Internal`].
    pub fn internal(reason: impl Into<String>) -> Self {
        Error::Internal {
            reason: reason.into(),
        }
    }

    /// True for errors raised before any request left the process.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput { .. }
                | Error::SessionNotStarted
                | Error::SessionAlreadyStarted
                | Error::SessionStopped
                | Error::Config { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization {
            reason: e.to_string(),
        }
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, Error>;
