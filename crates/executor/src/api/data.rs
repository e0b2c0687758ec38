//! Record operations: upsert, update, fetch, delete, range.

use super::{run, unexpected, Index};
use crate::types::*;
use crate::{Command, Output, Result, Vector};
use quiver_core::RangeResult;

impl Index {
    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Insert or replace records.
    ///
    /// Text records (`data` set) are embedded server-side; a batch cannot mix
    /// text and vector records.
    pub async fn upsert(
        &self,
        records: impl IntoIterator<Item = Vector>,
        namespace: Option<&str>,
    ) -> Result<String> {
        match run(&self.executor, Command::upsert(records, namespace)?).await? {
            Output::Message(ack) => Ok(ack),
            _ => Err(unexpected("Upsert")),
        }
    }

    /// Partially update one record. Returns the number of records updated.
    pub async fn update(&self, record: Vector, namespace: Option<&str>) -> Result<u64> {
        match run(&self.executor, Command::update(record, namespace)?).await? {
            Output::Updated(n) => Ok(n),
            _ => Err(unexpected("Update")),
        }
    }

    /// Fetch records. One entry per match, `None` for ids not found.
    pub async fn fetch(
        &self,
        request: FetchRequest,
        namespace: Option<&str>,
    ) -> Result<Vec<Option<Vector>>> {
        match run(&self.executor, Command::fetch(request, namespace)?).await? {
            Output::Vectors(vectors) => Ok(vectors),
            _ => Err(unexpected("Fetch")),
        }
    }

    /// Delete by id, id list, or [`SelectorOptions`]. Returns the number deleted.
    pub async fn delete(&self, selector: impl IntoSelector, namespace: Option<&str>) -> Result<u64> {
        match run(&self.executor, Command::delete(selector, namespace)?).await? {
            Output::Deleted(n) => Ok(n),
            _ => Err(unexpected("Delete")),
        }
    }

    /// Read one page of records.
    pub async fn range(&self, request: RangeRequest, namespace: Option<&str>) -> Result<RangeResult> {
        match run(&self.executor, Command::range(request, namespace)?).await? {
            Output::Range(page) => Ok(page),
            _ => Err(unexpected("Range")),
        }
    }
}
