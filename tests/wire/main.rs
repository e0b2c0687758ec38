//! Wire-level tests
//!
//! Drive the real reqwest-backed client against an axum mock of the service:
//! - data: upsert/fetch round-trips and reset scopes over HTTP
//! - transport: auth, status mapping, retries, telemetry headers
//! - abort: manual and timeout cancellation of in-flight requests
//! - resumable: a resumable query session end to end
//! - logging: warnings for malformed credentials

mod common;

mod abort;
mod data;
mod logging;
mod resumable;
mod transport;
