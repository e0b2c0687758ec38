//! Namespace-scoped handle.

use super::Index;
use crate::types::*;
use crate::{Executor, InfoResult, QueryResult, RangeResult, ResumableQuery, Result, Vector};

/// The data-plane surface of [`Index`] with one namespace fixed.
///
/// Holds only its name and a shared executor.
#[derive(Debug, Clone)]
pub struct Namespace {
    index: Index,
    name: String,
}

impl Namespace {
    pub(super) fn new(executor: Executor, name: String) -> Self {
        Self {
            index: Index { executor },
            name,
        }
    }

    /// The namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn ns(&self) -> Option<&str> {
        Some(self.name.as_str())
    }

    /// See [`Index::upsert`].
    pub async fn upsert(&self, records: impl IntoIterator<Item = Vector>) -> Result<String> {
        self.index.upsert(records, self.ns()).await
    }

    /// See [`Index::update`].
    pub async fn update(&self, record: Vector) -> Result<u64> {
        self.index.update(record, self.ns()).await
    }

    /// See [`Index::fetch`].
    pub async fn fetch(&self, request: FetchRequest) -> Result<Vec<Option<Vector>>> {
        self.index.fetch(request, self.ns()).await
    }

    /// See [`Index::delete`].
    pub async fn delete(&self, selector: impl IntoSelector) -> Result<u64> {
        self.index.delete(selector, self.ns()).await
    }

    /// See [`Index::range`].
    pub async fn range(&self, request: RangeRequest) -> Result<RangeResult> {
        self.index.range(request, self.ns()).await
    }

    /// See [`Index::query`].
    pub async fn query(&self, request: QueryRequest) -> Result<Vec<QueryResult>> {
        self.index.query(request, self.ns()).await
    }

    /// See [`Index::query_many`].
    pub async fn query_many(&self, requests: Vec<QueryRequest>) -> Result<Vec<Vec<QueryResult>>> {
        self.index.query_many(requests, self.ns()).await
    }

    /// See [`Index::resumable_query`].
    pub async fn resumable_query(&self, request: ResumableQueryRequest) -> Result<ResumableQuery> {
        self.index.resumable_query(request, self.ns()).await
    }

    /// See [`Index::info`].
    pub async fn info(&self) -> Result<InfoResult> {
        self.index.info(self.ns()).await
    }

    /// Clear every record in this namespace. Other namespaces are untouched.
    pub async fn reset(&self) -> Result<String> {
        self.index
            .reset(ResetScope::from_options(self.ns(), false)?)
            .await
    }
}
