//! Index-level operations: reset, info, namespaces.

use super::{run, unexpected, Index};
use crate::types::ResetScope;
use crate::{Command, InfoResult, Output, Result};

impl Index {
    // =========================================================================
    // Index Operations
    // =========================================================================

    /// Clear the default namespace, one namespace, or everything.
    pub async fn reset(&self, scope: ResetScope) -> Result<String> {
        match run(&self.executor, Command::reset(scope)?).await? {
            Output::Message(ack) => Ok(ack),
            _ => Err(unexpected("Reset")),
        }
    }

    /// Index statistics, including per-namespace counts.
    ///
    /// With a namespace the request goes to `info/{namespace}`.
    pub async fn info(&self, namespace: Option<&str>) -> Result<InfoResult> {
        match run(&self.executor, Command::info(namespace)).await? {
            Output::Info(info) => Ok(info),
            _ => Err(unexpected("Info")),
        }
    }

    /// Names of every namespace, the default one included as `""`.
    pub async fn list_namespaces(&self) -> Result<Vec<String>> {
        match run(&self.executor, Command::list_namespaces()).await? {
            Output::Namespaces(names) => Ok(names),
            _ => Err(unexpected("ListNamespaces")),
        }
    }

    /// Drop a namespace and every record in it.
    pub async fn delete_namespace(&self, namespace: &str) -> Result<String> {
        match run(&self.executor, Command::delete_namespace(namespace)?).await? {
            Output::Message(ack) => Ok(ack),
            _ => Err(unexpected("DeleteNamespace")),
        }
    }
}
