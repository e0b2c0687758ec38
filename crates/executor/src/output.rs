//! Output enum for command execution results.
//!
//! Every command produces exactly one output variant, plus `Aborted` when the
//! request was cancelled before the service answered.

use serde::{Deserialize, Serialize};

use quiver_core::{InfoResult, QueryResult, RangeResult, Vector};

/// Successful command execution results.
///
/// Each [`Command`](crate::Command) variant maps to exactly one `Output`
/// variant, documented on the command.
///
/// # Example
///
/// ```text
/// use quiver::{Command, Output};
///
/// match executor.execute(Command::info(None)).await? {
///     Output::Info(info) => println!("{} vectors", info.vector_count),
///     Output::Aborted { reason } => println!("cancelled: {}", reason),
///     _ => unreachable!("Info always returns Info"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// Plain acknowledgment (upsert, reset, delete-namespace, resumable-query-end)
    Message(String),

    /// Number of records updated
    Updated(u64),

    /// Number of records deleted
    Deleted(u64),

    /// One fetched record per requested id, `None` if missing
    Vectors(Vec<Option<Vector>>),

    /// One page of a range scan
    Range(RangeResult),

    /// Query matches, best first
    Matches(Vec<QueryResult>),

    /// One match list per query in a batch
    MatchBatches(Vec<Vec<QueryResult>>),

    /// A resumable query session was opened
    ResumableQueryStarted {
        /// Session id, kept private by [`ResumableQuery`](crate::ResumableQuery)
        uuid: String,
        /// First batch of matches
        scores: Vec<QueryResult>,
    },

    /// Index statistics
    Info(InfoResult),

    /// Namespace names
    Namespaces(Vec<String>),

    /// The request was cancelled; the reason is what the signal carried
    Aborted {
        /// Abort reason
        reason: String,
    },
}

impl Output {
    /// The abort reason, if this output is `Aborted`.
    pub fn abort_reason(&self) -> Option<&str> {
        match self {
            Output::Aborted { reason } => Some(reason),
            _ => None,
        }
    }
}
