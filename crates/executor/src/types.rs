//! Request types used in commands.
//!
//! These are the loose, caller-facing shapes. Validation happens when a
//! [`Command`](crate::Command) is built from them.

use serde::{Deserialize, Serialize};

use quiver_core::{Error, FusionAlgorithm, QueryMode, Result, SparseVector, WeightingStrategy};

fn is_false(b: &bool) -> bool {
    !*b
}

// =============================================================================
// Selectors
// =============================================================================

/// Which records a fetch or delete targets. Exactly one criterion.
///
/// Serialized as `{"ids": [...]}`, `{"prefix": "..."}` or `{"filter": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selector {
    /// Explicit ids
    Ids(Vec<String>),
    /// Every id starting with this prefix
    Prefix(String),
    /// Metadata filter expression
    Filter(String),
}

/// Loose selector options, as received from configuration or user input.
///
/// Converted into a [`Selector`] with [`IntoSelector`], which rejects zero or
/// more than one criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorOptions {
    /// Explicit ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    /// Id prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Metadata filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Conversion into a validated [`Selector`].
pub trait IntoSelector {
    /// Convert, failing if the criteria are ambiguous or missing.
    fn into_selector(self) -> Result<Selector>;
}

impl IntoSelector for Selector {
    fn into_selector(self) -> Result<Selector> {
        Ok(self)
    }
}

impl IntoSelector for SelectorOptions {
    fn into_selector(self) -> Result<Selector> {
        let given = [
            self.ids.is_some(),
            self.prefix.is_some(),
            self.filter.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();

        if given > 1 {
            return Err(Error::invalid_input(
                "Only one of ids, prefix or filter should be provided.",
            ));
        }
        match (self.ids, self.prefix, self.filter) {
            (Some(ids), _, _) => Ok(Selector::Ids(ids)),
            (_, Some(prefix), _) => Ok(Selector::Prefix(prefix)),
            (_, _, Some(filter)) => Ok(Selector::Filter(filter)),
            _ => Err(Error::invalid_input(
                "One of ids, prefix or filter must be provided.",
            )),
        }
    }
}

impl IntoSelector for &str {
    fn into_selector(self) -> Result<Selector> {
        Ok(Selector::Ids(vec![self.to_string()]))
    }
}

impl IntoSelector for String {
    fn into_selector(self) -> Result<Selector> {
        Ok(Selector::Ids(vec![self]))
    }
}

impl IntoSelector for Vec<String> {
    fn into_selector(self) -> Result<Selector> {
        Ok(Selector::Ids(self))
    }
}

impl IntoSelector for Vec<&str> {
    fn into_selector(self) -> Result<Selector> {
        Ok(Selector::Ids(self.into_iter().map(String::from).collect()))
    }
}

impl IntoSelector for &[&str] {
    fn into_selector(self) -> Result<Selector> {
        Ok(Selector::Ids(self.iter().map(|id| id.to_string()).collect()))
    }
}

impl<const N: usize> IntoSelector for [&str; N] {
    fn into_selector(self) -> Result<Selector> {
        Ok(Selector::Ids(self.iter().map(|id| id.to_string()).collect()))
    }
}

// =============================================================================
// Fetch / Range
// =============================================================================

/// Fetch request: one selector plus which fields to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    /// Records to fetch
    #[serde(flatten)]
    pub selector: Selector,
    /// Return metadata
    #[serde(default, skip_serializing_if = "is_false")]
    pub include_metadata: bool,
    /// Return dense and sparse vectors
    #[serde(default, skip_serializing_if = "is_false")]
    pub include_vectors: bool,
    /// Return raw data
    #[serde(default, skip_serializing_if = "is_false")]
    pub include_data: bool,
}

impl FetchRequest {
    /// A fetch returning ids only.
    pub fn new(selector: impl IntoSelector) -> Result<Self> {
        Ok(Self {
            selector: selector.into_selector()?,
            include_metadata: false,
            include_vectors: false,
            include_data: false,
        })
    }

    /// Set whether metadata is returned.
    pub fn include_metadata(mut self, yes: bool) -> Self {
        self.include_metadata = yes;
        self
    }

    /// Set whether vectors are returned.
    pub fn include_vectors(mut self, yes: bool) -> Self {
        self.include_vectors = yes;
        self
    }

    /// Set whether raw data is returned.
    pub fn include_data(mut self, yes: bool) -> Self {
        self.include_data = yes;
        self
    }
}

/// Paginated scan. Start with an empty cursor and feed each
/// `next_cursor` back until it comes back empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeRequest {
    /// Opaque cursor; empty for the first page
    pub cursor: String,
    /// Page size
    pub limit: u32,
    /// Only ids with this prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Return metadata
    #[serde(default, skip_serializing_if = "is_false")]
    pub include_metadata: bool,
    /// Return vectors
    #[serde(default, skip_serializing_if = "is_false")]
    pub include_vectors: bool,
    /// Return raw data
    #[serde(default, skip_serializing_if = "is_false")]
    pub include_data: bool,
}

impl RangeRequest {
    /// First page of `limit` records.
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Continue from a cursor returned by a previous page.
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = cursor.into();
        self
    }

    /// Restrict to ids starting with `prefix`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set whether metadata is returned.
    pub fn include_metadata(mut self, yes: bool) -> Self {
        self.include_metadata = yes;
        self
    }

    /// Set whether vectors are returned.
    pub fn include_vectors(mut self, yes: bool) -> Self {
        self.include_vectors = yes;
        self
    }

    /// Set whether raw data is returned.
    pub fn include_data(mut self, yes: bool) -> Self {
        self.include_data = yes;
        self
    }
}

// =============================================================================
// Query
// =============================================================================

/// A similarity query by dense vector, sparse vector, both, or raw text.
///
/// ```text
/// let q = QueryRequest::vector(vec![0.1, 0.2], 5)
///     .filter("genre = 'drama'")
///     .include_metadata(true);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// Dense query vector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
    /// Sparse query vector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparse_vector: Option<SparseVector>,
    /// Raw text, embedded server-side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Number of results
    pub top_k: u32,
    /// Metadata filter expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Return vectors
    #[serde(default, skip_serializing_if = "is_false")]
    pub include_vectors: bool,
    /// Return metadata
    #[serde(default, skip_serializing_if = "is_false")]
    pub include_metadata: bool,
    /// Return raw data
    #[serde(default, skip_serializing_if = "is_false")]
    pub include_data: bool,
    /// Sparse term weighting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighting_strategy: Option<WeightingStrategy>,
    /// Dense/sparse score fusion for hybrid indexes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fusion_algorithm: Option<FusionAlgorithm>,
    /// Which half of a hybrid index to query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_mode: Option<QueryMode>,
}

impl QueryRequest {
    /// Query by dense vector.
    pub fn vector(vector: Vec<f32>, top_k: u32) -> Self {
        Self {
            vector: Some(vector),
            top_k,
            ..Self::default()
        }
    }

    /// Query by sparse vector.
    pub fn sparse(sparse: impl Into<SparseVector>, top_k: u32) -> Self {
        Self {
            sparse_vector: Some(sparse.into()),
            top_k,
            ..Self::default()
        }
    }

    /// Query a hybrid index with both halves.
    pub fn hybrid(vector: Vec<f32>, sparse: impl Into<SparseVector>, top_k: u32) -> Self {
        Self {
            vector: Some(vector),
            sparse_vector: Some(sparse.into()),
            top_k,
            ..Self::default()
        }
    }

    /// Query by raw text.
    pub fn text(data: impl Into<String>, top_k: u32) -> Self {
        Self {
            data: Some(data.into()),
            top_k,
            ..Self::default()
        }
    }

    /// Set a metadata filter.
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set whether vectors are returned.
    pub fn include_vectors(mut self, yes: bool) -> Self {
        self.include_vectors = yes;
        self
    }

    /// Set whether metadata is returned.
    pub fn include_metadata(mut self, yes: bool) -> Self {
        self.include_metadata = yes;
        self
    }

    /// Set whether raw data is returned.
    pub fn include_data(mut self, yes: bool) -> Self {
        self.include_data = yes;
        self
    }

    /// Set the sparse weighting strategy.
    pub fn weighting_strategy(mut self, strategy: WeightingStrategy) -> Self {
        self.weighting_strategy = Some(strategy);
        self
    }

    /// Set the fusion algorithm.
    pub fn fusion_algorithm(mut self, algorithm: FusionAlgorithm) -> Self {
        self.fusion_algorithm = Some(algorithm);
        self
    }

    /// Set the query mode.
    pub fn query_mode(mut self, mode: QueryMode) -> Self {
        self.query_mode = Some(mode);
        self
    }

    /// True if this query goes to the text endpoint.
    pub fn is_data(&self) -> bool {
        self.data.is_some()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let has_vector = self.vector.is_some() || self.sparse_vector.is_some();
        if has_vector && self.data.is_some() {
            return Err(Error::invalid_input(
                "A query takes either a vector or data, not both.",
            ));
        }
        if !has_vector && self.data.is_none() {
            return Err(Error::invalid_input(
                "A query needs a vector, a sparse vector or data.",
            ));
        }
        if let Some(sparse) = &self.sparse_vector {
            sparse.validate()?;
        }
        Ok(())
    }
}

/// A query whose session stays open server-side for paging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumableQueryRequest {
    /// The underlying query; `top_k` sizes the first batch
    #[serde(flatten)]
    pub query: QueryRequest,
    /// Seconds the server keeps the session alive between calls
    pub max_idle: u32,
}

impl ResumableQueryRequest {
    /// Wrap a query with an idle timeout in seconds.
    pub fn new(query: QueryRequest, max_idle: u32) -> Self {
        Self { query, max_idle }
    }
}

// =============================================================================
// Reset
// =============================================================================

/// What a reset clears.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetScope {
    /// The default namespace
    #[default]
    Default,
    /// One named namespace
    Namespace(String),
    /// Every namespace
    All,
}

impl ResetScope {
    /// Build a scope from loose options. `all` and a namespace are exclusive.
    pub fn from_options(namespace: Option<&str>, all: bool) -> Result<Self> {
        match (namespace.filter(|ns| !ns.is_empty()), all) {
            (Some(_), true) => Err(Error::invalid_input(
                "Reset takes either a namespace or all, not both.",
            )),
            (Some(ns), false) => Ok(ResetScope::Namespace(ns.to_string())),
            (None, true) => Ok(ResetScope::All),
            (None, false) => Ok(ResetScope::Default),
        }
    }
}
