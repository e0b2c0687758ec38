//! # Quiver Executor
//!
//! The public API for Quiver - a typed client for a hosted vector index.
//!
//! This is the only crate users need to import. It provides:
//! - [`Index`] / [`Namespace`] - Typed methods for every service operation
//! - [`ResumableQuery`] - Paged query sessions
//! - [`Command`]/[`Output`] - Low-level command interface
//! - [`IndexConfig`] - Connection settings from code, env, or `quiver.toml`
//!
//! ## Quick Start
//!
//! ```text
//! use quiver::{Index, QueryRequest, Vector};
//!
//! let index = Index::from_env()?;
//!
//! index.upsert([Vector::dense("a", vec![0.1, 0.2])], None).await?;
//! let matches = index.query(QueryRequest::vector(vec![0.1, 0.2], 5), None).await?;
//! ```
//!
//! ## Record Kinds
//!
//! | Kind | Fields | Endpoint |
//! |------|--------|----------|
//! | **Dense** | `vector` | `upsert` / `query` |
//! | **Sparse** | `sparse_vector` | `upsert` / `query` |
//! | **Hybrid** | both | `upsert` / `query` |
//! | **Text** | `data` | `upsert-data` / `query-data` |
//!
//! ## Cancellation
//!
//! An aborted request resolves instead of failing at the [`Executor`] level
//! ([`Output::Aborted`]); the typed [`Index`] methods surface it as
//! [`Error::Aborted`].

#![warn(missing_docs)]

mod api;
mod command;
mod config;
mod executor;
mod output;
mod session;
mod types;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API - Everything users need is re-exported here
// =============================================================================

pub use api::{Index, Namespace};
pub use command::{
    Command, Endpoint, QueryBatch, QueryPayload, ResumableQueryPayload, UpdatePayload,
    UpsertPayload, Verb,
};
pub use config::{IndexConfig, CONFIG_FILE_NAME, DISABLE_TELEMETRY_ENV, TOKEN_ENV, URL_ENV};
pub use executor::Executor;
pub use output::Output;
pub use session::ResumableQuery;
pub use types::*;

// Re-export the data model so users don't need quiver-core directly
pub use quiver_core::{
    Error, FusionAlgorithm, InfoResult, NamespaceInfo, QueryMode, QueryResult, RangeResult,
    Result, SimilarityFunction, SparseVector, Value, Vector, WeightingStrategy,
};

// Re-export transport types so users don't need quiver-transport directly
pub use quiver_transport::{
    AbortSignal, Backoff, HttpClient, HttpClientConfig, RawResponse, Request, Requester,
    ReqwestTransport, Response, RetryConfig, SignalSource, Transport, TransportError,
    DEFAULT_ABORT_REASON, DEFAULT_RETRIES, TIMEOUT_REASON,
};
pub use quiver_transport::telemetry;
