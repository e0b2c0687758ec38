//! Quiver - typed async client for a hosted vector database
//!
//! Quiver talks to a vector index over its JSON REST API: upsert dense,
//! sparse, hybrid or text records, query by similarity, page through results,
//! and manage namespaces.
//!
//! # Quick Start
//!
//! ```ignore
//! use quiver::{Index, QueryRequest, Vector};
//!
//! // Reads UPSTASH_VECTOR_REST_URL and UPSTASH_VECTOR_REST_TOKEN
//! let index = Index::from_env()?;
//!
//! index.upsert([Vector::dense("a", vec![0.1, 0.2])], None).await?;
//! let matches = index.query(QueryRequest::vector(vec![0.1, 0.2], 5), None).await?;
//! ```
//!
//! # Architecture
//!
//! Every operation is a validated [`Command`] sent by the [`Executor`]
//! through a [`Requester`]. The [`Index`] and [`Namespace`] types provide
//! the typed high-level interface.
//!
//! Transport and data-model crates are internal; everything needed is
//! re-exported here.

// Re-export the public API from quiver-executor
pub use quiver_executor::*;
