//! Similarity queries.

use super::{run, unexpected, Index};
use crate::types::*;
use crate::{Command, Output, QueryResult, ResumableQuery, Result};

impl Index {
    // =========================================================================
    // Query Operations
    // =========================================================================

    /// Query by vector or text. Matches come back best first.
    pub async fn query(
        &self,
        request: QueryRequest,
        namespace: Option<&str>,
    ) -> Result<Vec<QueryResult>> {
        match run(&self.executor, Command::query(request, namespace)?).await? {
            Output::Matches(matches) => Ok(matches),
            _ => Err(unexpected("Query")),
        }
    }

    /// Several queries in one round-trip; one match list per query, in order.
    pub async fn query_many(
        &self,
        requests: Vec<QueryRequest>,
        namespace: Option<&str>,
    ) -> Result<Vec<Vec<QueryResult>>> {
        match run(&self.executor, Command::query_many(requests, namespace)?).await? {
            Output::MatchBatches(batches) => Ok(batches),
            _ => Err(unexpected("QueryMany")),
        }
    }

    /// Open a resumable query and fetch its first batch.
    ///
    /// The first batch is available from [`ResumableQuery::result`].
    pub async fn resumable_query(
        &self,
        request: ResumableQueryRequest,
        namespace: Option<&str>,
    ) -> Result<ResumableQuery> {
        let mut query = ResumableQuery::new(self.executor.clone(), request, namespace)?;
        query.start().await?;
        Ok(query)
    }
}
