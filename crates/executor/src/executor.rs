//! The Executor - sends commands and decodes their results.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use quiver_core::{Error, Result};
use quiver_transport::{Request, Requester, DEFAULT_ABORT_REASON};

use crate::{Command, Output};

/// The command executor.
///
/// The `Executor` is stateless: it resolves each [`Command`] to an endpoint and
/// body, sends it through the shared [`Requester`], and decodes the service's
/// `result` into the matching [`Output`]. Cloning is cheap and every clone
/// shares the same requester.
///
/// # Example
///
/// ```text
/// use quiver::{Command, Executor, Output};
///
/// let executor = Executor::new(requester);
/// let output = executor.execute(Command::info(None)).await?;
///
/// // Batch execution, sent concurrently
/// let results = executor.execute_many(vec![
///     Command::info(None),
///     Command::list_namespaces(),
/// ]).await;
/// ```
#[derive(Clone)]
pub struct Executor {
    requester: Arc<dyn Requester>,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor").finish_non_exhaustive()
    }
}

impl Executor {
    /// Create a new executor over a requester.
    pub fn new(requester: Arc<dyn Requester>) -> Self {
        Self { requester }
    }

    /// Execute a single command.
    ///
    /// An aborted request resolves to [`Output::Aborted`]; every other
    /// failure is an error.
    pub async fn execute(&self, cmd: Command) -> Result<Output> {
        let endpoint = cmd.endpoint().to_string();
        let body = cmd.payload()?;

        tracing::debug!(
            target: "quiver::executor",
            command = cmd.name(),
            endpoint = %endpoint,
            "Executing command"
        );

        let response = self.requester.request(Request::new(endpoint, body)).await?;

        if response.aborted {
            let reason = response
                .abort_reason()
                .unwrap_or(DEFAULT_ABORT_REASON)
                .to_string();
            tracing::debug!(target: "quiver::executor", command = cmd.name(), %reason, "Command aborted");
            return Ok(Output::Aborted { reason });
        }
        if let Some(message) = response.error {
            return Err(Error::Service {
                message,
                status: None,
            });
        }
        let Some(result) = response.result else {
            return Err(Error::ProtocolViolation {
                reason: format!("{} response carried neither result nor error", cmd.name()),
            });
        };

        decode(&cmd, result)
    }

    /// Execute multiple commands concurrently.
    ///
    /// Each command runs its own retry sequence. Results are returned in the
    /// same order as the input commands; one failure does not affect the rest.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn execute_many(&self, cmds: Vec<Command>) -> Vec<Result<Output>> {
        let handles: Vec<_> = cmds
            .into_iter()
            .map(|cmd| {
                let executor = self.clone();
                tokio::spawn(async move { executor.execute(cmd).await })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await.unwrap_or_else(|e| {
                Err(Error::Internal {
                    reason: format!("Command task failed: {}", e),
                })
            }));
        }
        results
    }

    /// The requester commands are sent through.
    pub fn requester(&self) -> &Arc<dyn Requester> {
        &self.requester
    }
}

#[derive(Deserialize)]
struct UpdatedCount {
    updated: u64,
}

#[derive(Deserialize)]
struct DeletedCount {
    deleted: u64,
}

#[derive(Deserialize)]
struct Started {
    uuid: String,
    #[serde(default)]
    scores: Vec<quiver_core::QueryResult>,
}

fn from_result<T: DeserializeOwned>(cmd: &Command, result: Value) -> Result<T> {
    serde_json::from_value(result).map_err(|e| Error::Serialization {
        reason: format!("Unexpected result for {}: {}", cmd.name(), e),
    })
}

/// Decode a service `result` into the command's output variant.
fn decode(cmd: &Command, result: Value) -> Result<Output> {
    Ok(match cmd {
        Command::Upsert { .. }
        | Command::Reset { .. }
        | Command::DeleteNamespace { .. }
        | Command::ResumableQueryEnd { .. } => Output::Message(from_result(cmd, result)?),
        Command::Update { .. } => Output::Updated(from_result::<UpdatedCount>(cmd, result)?.updated),
        Command::Delete { .. } => Output::Deleted(from_result::<DeletedCount>(cmd, result)?.deleted),
        Command::Fetch { .. } => Output::Vectors(from_result(cmd, result)?),
        Command::Range { .. } => Output::Range(from_result(cmd, result)?),
        Command::Query { .. } | Command::ResumableQueryNext { .. } => {
            Output::Matches(from_result(cmd, result)?)
        }
        Command::QueryMany { payload, .. } => {
            let batches: Vec<Vec<quiver_core::QueryResult>> = from_result(cmd, result)?;
            if batches.len() != payload.len() {
                return Err(Error::ProtocolViolation {
                    reason: format!(
                        "QueryMany sent {} queries but got {} result lists",
                        payload.len(),
                        batches.len()
                    ),
                });
            }
            Output::MatchBatches(batches)
        }
        Command::ResumableQueryStart { .. } => {
            let started: Started = from_result(cmd, result)?;
            Output::ResumableQueryStarted {
                uuid: started.uuid,
                scores: started.scores,
            }
        }
        Command::Info { .. } => Output::Info(from_result(cmd, result)?),
        Command::ListNamespaces => Output::Namespaces(from_result(cmd, result)?),
    })
}
