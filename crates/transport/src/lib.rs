//! # Quiver Transport
//!
//! JSON-over-HTTP plumbing for the Quiver client:
//! - [`Requester`]: the async seam every command is sent through
//! - [`HttpClient`]: the production requester, with retry/backoff and abort support
//! - [`RetryConfig`] / [`Backoff`]: retry policy for transport failures
//! - [`AbortSignal`] / [`SignalSource`]: cooperative cancellation
//! - [`telemetry`]: best-effort SDK telemetry headers

#![warn(missing_docs)]

mod client;
mod request;
mod retry;
mod signal;
pub mod telemetry;
mod transport;

pub use client::{HttpClient, HttpClientConfig};
pub use request::{Request, Requester, Response};
pub use retry::{Backoff, RetryConfig, DEFAULT_RETRIES};
pub use signal::{AbortSignal, SignalSource, DEFAULT_ABORT_REASON, TIMEOUT_REASON};
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError};
