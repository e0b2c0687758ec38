//! High-level typed wrapper for the Executor.
//!
//! The [`Index`] struct provides a convenient Rust API over the
//! [`Executor`] and [`Command`]/[`Output`] enums with typed method calls.
//! [`Namespace`] is the same surface with a namespace fixed.
//!
//! # Example
//!
//! ```text
//! use quiver::{Index, QueryRequest, Vector};
//! use serde_json::json;
//!
//! let index = Index::from_env()?;
//!
//! index
//!     .upsert([Vector::dense("a", vec![0.1, 0.2]).with_metadata(json!({"k": "v"}))], None)
//!     .await?;
//!
//! let movies = index.namespace("movies");
//! let matches = movies
//!     .query(QueryRequest::vector(vec![0.1, 0.2], 3).include_metadata(true))
//!     .await?;
//! ```

mod admin;
mod data;
mod namespace;
mod query;

pub use namespace::Namespace;

use std::sync::Arc;

use quiver_transport::{HttpClient, Requester};

use crate::{Command, Error, Executor, IndexConfig, Output, Result};

/// Client for one index.
///
/// Cheap to clone; clones share the same transport. Methods that take a
/// `namespace: Option<&str>` target the default namespace on `None`.
#[derive(Debug, Clone)]
pub struct Index {
    executor: Executor,
}

impl Index {
    /// Connect with explicit settings.
    pub fn new(config: IndexConfig) -> Result<Self> {
        let client = HttpClient::new(config.http_config())?;
        Ok(Self::with_requester(Arc::new(client)))
    }

    /// Connect using `UPSTASH_VECTOR_REST_URL` and `UPSTASH_VECTOR_REST_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::new(IndexConfig::from_env()?)
    }

    /// Send every command through a caller-supplied requester.
    pub fn with_requester(requester: Arc<dyn Requester>) -> Self {
        Self {
            executor: Executor::new(requester),
        }
    }

    /// The underlying executor, for raw [`Command`] access.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// A handle scoped to `name`.
    pub fn namespace(&self, name: impl Into<String>) -> Namespace {
        Namespace::new(self.executor.clone(), name.into())
    }
}

/// Run a command, turning an abort into an error for typed callers.
async fn run(executor: &Executor, cmd: Command) -> Result<Output> {
    match executor.execute(cmd).await? {
        Output::Aborted { reason } => Err(Error::Aborted { reason }),
        output => Ok(output),
    }
}

fn unexpected(command: &str) -> Error {
    Error::Internal {
        reason: format!("Unexpected output for {}", command),
    }
}
