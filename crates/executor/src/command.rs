//! Command enum defining every operation the service exposes.
//!
//! Commands are the "instruction set" of the client. Each one is:
//! - **Validated**: built only through constructors that reject malformed
//!   input before any request is sent
//! - **Immutable**: the endpoint is fixed by the payload chosen at construction
//! - **Pure data**: no closures or executable code

use std::fmt;

use serde::Serialize;
use serde_json::{json, Value};

use quiver_core::{Error, Result, Vector};

use crate::types::*;

// =============================================================================
// Endpoints
// =============================================================================

/// A service verb, the first path segment of every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `upsert`
    Upsert,
    /// `upsert-data`
    UpsertData,
    /// `query`
    Query,
    /// `query-data`
    QueryData,
    /// `fetch`
    Fetch,
    /// `delete`
    Delete,
    /// `update`
    Update,
    /// `range`
    Range,
    /// `reset`
    Reset,
    /// `info`
    Info,
    /// `resumable-query`
    ResumableQuery,
    /// `resumable-query-data`
    ResumableQueryData,
    /// `resumable-query-next`
    ResumableQueryNext,
    /// `resumable-query-end`
    ResumableQueryEnd,
    /// `list-namespaces`
    ListNamespaces,
    /// `delete-namespace`
    DeleteNamespace,
}

impl Verb {
    /// Path segment for this verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Upsert => "upsert",
            Verb::UpsertData => "upsert-data",
            Verb::Query => "query",
            Verb::QueryData => "query-data",
            Verb::Fetch => "fetch",
            Verb::Delete => "delete",
            Verb::Update => "update",
            Verb::Range => "range",
            Verb::Reset => "reset",
            Verb::Info => "info",
            Verb::ResumableQuery => "resumable-query",
            Verb::ResumableQueryData => "resumable-query-data",
            Verb::ResumableQueryNext => "resumable-query-next",
            Verb::ResumableQueryEnd => "resumable-query-end",
            Verb::ListNamespaces => "list-namespaces",
            Verb::DeleteNamespace => "delete-namespace",
        }
    }
}

/// A fully resolved request path.
///
/// Displays as `verb`, `verb/namespace`, or `reset?all`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Verb against the default namespace
    Default(Verb),
    /// Verb against a named namespace
    Namespaced(Verb, String),
    /// Reset across every namespace
    ResetAll,
}

impl Endpoint {
    fn new(verb: Verb, namespace: &Option<String>) -> Self {
        match namespace {
            Some(ns) => Endpoint::Namespaced(verb, ns.clone()),
            None => Endpoint::Default(verb),
        }
    }

    /// The verb this endpoint invokes.
    pub fn verb(&self) -> Verb {
        match self {
            Endpoint::Default(verb) | Endpoint::Namespaced(verb, _) => *verb,
            Endpoint::ResetAll => Verb::Reset,
        }
    }

    /// The namespace suffix, if any.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Endpoint::Namespaced(_, ns) => Some(ns),
            _ => None,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Default(verb) => f.write_str(verb.as_str()),
            Endpoint::Namespaced(verb, ns) => write!(f, "{}/{}", verb.as_str(), ns),
            Endpoint::ResetAll => f.write_str("reset?all"),
        }
    }
}

// =============================================================================
// Validated payloads
// =============================================================================

/// Records for one upsert, all routed to the same endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertPayload {
    records: Vec<Vector>,
    data: bool,
}

impl UpsertPayload {
    /// Validate a batch. Every record is either a text record or a vector
    /// record; the two kinds cannot share a batch.
    pub fn new(records: impl IntoIterator<Item = Vector>) -> Result<Self> {
        let records: Vec<Vector> = records.into_iter().collect();
        if records.is_empty() {
            return Err(Error::invalid_input("Upsert needs at least one record."));
        }
        for record in &records {
            validate_record(record)?;
        }

        let data = records[0].data.is_some();
        if records.iter().any(|r| r.data.is_some() != data) {
            return Err(Error::invalid_input(
                "A batch cannot mix data records with vector records.",
            ));
        }

        let records = if data {
            records.into_iter().map(with_derived_metadata).collect()
        } else {
            records
        };
        Ok(Self { records, data })
    }

    /// True if the batch goes to `upsert-data`.
    pub fn is_data(&self) -> bool {
        self.data
    }

    /// The records as they will be sent.
    pub fn records(&self) -> &[Vector] {
        &self.records
    }
}

/// A single partial update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePayload {
    record: Vector,
}

impl UpdatePayload {
    /// Validate an update. It must change at least one field.
    pub fn new(record: Vector) -> Result<Self> {
        if record.id.is_empty() {
            return Err(Error::invalid_input("A record needs a non-empty id."));
        }
        if record.data.is_some() && record.has_vector() {
            return Err(Error::invalid_input(
                "A record takes either a vector or data, not both.",
            ));
        }
        if let Some(sparse) = &record.sparse_vector {
            sparse.validate()?;
        }
        if !record.has_vector() && record.data.is_none() && record.metadata.is_none() {
            return Err(Error::invalid_input(
                "Update needs a vector, data or metadata.",
            ));
        }
        Ok(Self {
            record: with_derived_metadata(record),
        })
    }

    /// The record as it will be sent.
    pub fn record(&self) -> &Vector {
        &self.record
    }
}

/// A validated query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPayload {
    request: QueryRequest,
}

impl QueryPayload {
    /// Validate a query.
    pub fn new(request: QueryRequest) -> Result<Self> {
        request.validate()?;
        Ok(Self { request })
    }

    /// True if the query goes to the text endpoint.
    pub fn is_data(&self) -> bool {
        self.request.is_data()
    }

    /// The query as it will be sent.
    pub fn request(&self) -> &QueryRequest {
        &self.request
    }
}

/// Several queries sent in one request, all of the same kind.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBatch {
    requests: Vec<QueryRequest>,
    data: bool,
}

impl QueryBatch {
    /// Validate a batch of queries.
    pub fn new(requests: Vec<QueryRequest>) -> Result<Self> {
        let Some(first) = requests.first() else {
            return Err(Error::invalid_input("Query batch needs at least one query."));
        };
        let data = first.is_data();
        for request in &requests {
            request.validate()?;
            if request.is_data() != data {
                return Err(Error::invalid_input(
                    "A batch cannot mix data queries with vector queries.",
                ));
            }
        }
        Ok(Self { requests, data })
    }

    /// True if the batch goes to the text endpoint.
    pub fn is_data(&self) -> bool {
        self.data
    }

    /// Number of queries.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Always false for a validated batch.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// A validated resumable query start.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumableQueryPayload {
    request: ResumableQueryRequest,
}

impl ResumableQueryPayload {
    /// Validate the query inside.
    pub fn new(request: ResumableQueryRequest) -> Result<Self> {
        request.query.validate()?;
        Ok(Self { request })
    }

    /// True if the session is opened on the text endpoint.
    pub fn is_data(&self) -> bool {
        self.request.query.is_data()
    }
}

fn validate_record(record: &Vector) -> Result<()> {
    if record.id.is_empty() {
        return Err(Error::invalid_input("A record needs a non-empty id."));
    }
    match (record.has_vector(), record.data.is_some()) {
        (true, true) => Err(Error::invalid_input(
            "A record takes either a vector or data, not both.",
        )),
        (false, false) => Err(Error::invalid_input(
            "A record needs a vector, a sparse vector or data.",
        )),
        _ => match &record.sparse_vector {
            Some(sparse) => sparse.validate(),
            None => Ok(()),
        },
    }
}

/// Text records without metadata carry their text as `{"data": ...}`.
fn with_derived_metadata(mut record: Vector) -> Vector {
    if record.metadata.is_none() {
        if let Some(data) = &record.data {
            record.metadata = Some(json!({ "data": data }));
        }
    }
    record
}

fn normalize_namespace(namespace: Option<&str>) -> Option<String> {
    namespace.filter(|ns| !ns.is_empty()).map(String::from)
}

// =============================================================================
// Command
// =============================================================================

/// A command is a self-contained, validated operation.
///
/// # Command Categories
///
/// | Category | Commands | Description |
/// |----------|----------|-------------|
/// | Data | Upsert, Update, Fetch, Delete, Range | Record reads and writes |
/// | Query | Query, QueryMany | Similarity search |
/// | Resumable | ResumableQueryStart, ResumableQueryNext, ResumableQueryEnd | Paged queries |
/// | Admin | Reset, Info, ListNamespaces, DeleteNamespace | Index-level operations |
///
/// # Namespace field
///
/// Data-scoped commands carry an optional `namespace`. `None` (or an empty
/// name) targets the default namespace.
///
/// # Example
///
/// ```text
/// use quiver::{Command, Vector};
///
/// let cmd = Command::upsert([Vector::dense("a", vec![0.1, 0.2])], Some("movies"))?;
/// assert_eq!(cmd.endpoint().to_string(), "upsert/movies");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ==================== Data ====================
    /// Insert or replace records.
    /// Returns: `Output::Message`
    Upsert {
        /// Target namespace
        namespace: Option<String>,
        /// Records
        payload: UpsertPayload,
    },

    /// Partially update one record.
    /// Returns: `Output::Updated`
    Update {
        /// Target namespace
        namespace: Option<String>,
        /// Update
        payload: UpdatePayload,
    },

    /// Fetch records by selector.
    /// Returns: `Output::Vectors`
    Fetch {
        /// Target namespace
        namespace: Option<String>,
        /// Request
        request: FetchRequest,
    },

    /// Delete records by selector.
    /// Returns: `Output::Deleted`
    Delete {
        /// Target namespace
        namespace: Option<String>,
        /// Records to delete
        selector: Selector,
    },

    /// Scan one page of records.
    /// Returns: `Output::Range`
    Range {
        /// Target namespace
        namespace: Option<String>,
        /// Request
        request: RangeRequest,
    },

    // ==================== Query ====================
    /// Similarity query.
    /// Returns: `Output::Matches`
    Query {
        /// Target namespace
        namespace: Option<String>,
        /// Query
        payload: QueryPayload,
    },

    /// Several similarity queries in one request.
    /// Returns: `Output::MatchBatches`
    QueryMany {
        /// Target namespace
        namespace: Option<String>,
        /// Queries
        payload: QueryBatch,
    },

    // ==================== Resumable ====================
    /// Open a resumable query session.
    /// Returns: `Output::ResumableQueryStarted`
    ResumableQueryStart {
        /// Target namespace
        namespace: Option<String>,
        /// Query and idle timeout
        payload: ResumableQueryPayload,
    },

    /// Fetch more results from an open session.
    /// Returns: `Output::Matches`
    ResumableQueryNext {
        /// Session id
        uuid: String,
        /// How many more results
        additional_k: u32,
    },

    /// Close a session.
    /// Returns: `Output::Message`
    ResumableQueryEnd {
        /// Session id
        uuid: String,
    },

    // ==================== Admin ====================
    /// Clear records.
    /// Returns: `Output::Message`
    Reset {
        /// What to clear
        scope: ResetScope,
    },

    /// Index statistics.
    /// Returns: `Output::Info`
    Info {
        /// Namespace to report on; `None` reports the whole index
        namespace: Option<String>,
    },

    /// List namespace names.
    /// Returns: `Output::Namespaces`
    ListNamespaces,

    /// Drop a namespace and its records.
    /// Returns: `Output::Message`
    DeleteNamespace {
        /// Namespace to drop
        namespace: String,
    },
}

impl Command {
    /// Upsert records. Text records route to `upsert-data`.
    pub fn upsert(
        records: impl IntoIterator<Item = Vector>,
        namespace: Option<&str>,
    ) -> Result<Self> {
        Ok(Command::Upsert {
            namespace: normalize_namespace(namespace),
            payload: UpsertPayload::new(records)?,
        })
    }

    /// Update one record.
    pub fn update(record: Vector, namespace: Option<&str>) -> Result<Self> {
        Ok(Command::Update {
            namespace: normalize_namespace(namespace),
            payload: UpdatePayload::new(record)?,
        })
    }

    /// Query. Text queries route to `query-data`.
    pub fn query(request: QueryRequest, namespace: Option<&str>) -> Result<Self> {
        Ok(Command::Query {
            namespace: normalize_namespace(namespace),
            payload: QueryPayload::new(request)?,
        })
    }

    /// Batch query.
    pub fn query_many(requests: Vec<QueryRequest>, namespace: Option<&str>) -> Result<Self> {
        Ok(Command::QueryMany {
            namespace: normalize_namespace(namespace),
            payload: QueryBatch::new(requests)?,
        })
    }

    /// Fetch.
    pub fn fetch(request: FetchRequest, namespace: Option<&str>) -> Result<Self> {
        Ok(Command::Fetch {
            namespace: normalize_namespace(namespace),
            request,
        })
    }

    /// Delete by bare id, id list, or selector options.
    pub fn delete(selector: impl IntoSelector, namespace: Option<&str>) -> Result<Self> {
        Ok(Command::Delete {
            namespace: normalize_namespace(namespace),
            selector: selector.into_selector()?,
        })
    }

    /// Range scan.
    pub fn range(request: RangeRequest, namespace: Option<&str>) -> Result<Self> {
        Ok(Command::Range {
            namespace: normalize_namespace(namespace),
            request,
        })
    }

    /// Reset.
    pub fn reset(scope: ResetScope) -> Result<Self> {
        if matches!(&scope, ResetScope::Namespace(ns) if ns.is_empty()) {
            return Ok(Command::Reset {
                scope: ResetScope::Default,
            });
        }
        Ok(Command::Reset { scope })
    }

    /// Index info, optionally scoped to one namespace.
    pub fn info(namespace: Option<&str>) -> Self {
        Command::Info {
            namespace: normalize_namespace(namespace),
        }
    }

    /// List namespaces.
    pub fn list_namespaces() -> Self {
        Command::ListNamespaces
    }

    /// Delete a namespace.
    pub fn delete_namespace(namespace: &str) -> Result<Self> {
        if namespace.is_empty() {
            return Err(Error::invalid_input("Namespace name must not be empty."));
        }
        Ok(Command::DeleteNamespace {
            namespace: namespace.to_string(),
        })
    }

    /// Open a resumable query. Text queries route to `resumable-query-data`.
    pub fn resumable_query_start(
        request: ResumableQueryRequest,
        namespace: Option<&str>,
    ) -> Result<Self> {
        Ok(Command::ResumableQueryStart {
            namespace: normalize_namespace(namespace),
            payload: ResumableQueryPayload::new(request)?,
        })
    }

    /// Page an open resumable query.
    pub fn resumable_query_next(uuid: impl Into<String>, additional_k: u32) -> Self {
        Command::ResumableQueryNext {
            uuid: uuid.into(),
            additional_k,
        }
    }

    /// Close a resumable query.
    pub fn resumable_query_end(uuid: impl Into<String>) -> Self {
        Command::ResumableQueryEnd { uuid: uuid.into() }
    }

    /// The endpoint this command is sent to.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Command::Upsert { namespace, payload } => Endpoint::new(
                if payload.is_data() {
                    Verb::UpsertData
                } else {
                    Verb::Upsert
                },
                namespace,
            ),
            Command::Update { namespace, .. } => Endpoint::new(Verb::Update, namespace),
            Command::Fetch { namespace, .. } => Endpoint::new(Verb::Fetch, namespace),
            Command::Delete { namespace, .. } => Endpoint::new(Verb::Delete, namespace),
            Command::Range { namespace, .. } => Endpoint::new(Verb::Range, namespace),
            Command::Query { namespace, payload } => Endpoint::new(
                if payload.is_data() {
                    Verb::QueryData
                } else {
                    Verb::Query
                },
                namespace,
            ),
            Command::QueryMany { namespace, payload } => Endpoint::new(
                if payload.is_data() {
                    Verb::QueryData
                } else {
                    Verb::Query
                },
                namespace,
            ),
            Command::ResumableQueryStart { namespace, payload } => Endpoint::new(
                if payload.is_data() {
                    Verb::ResumableQueryData
                } else {
                    Verb::ResumableQuery
                },
                namespace,
            ),
            Command::ResumableQueryNext { .. } => Endpoint::Default(Verb::ResumableQueryNext),
            Command::ResumableQueryEnd { .. } => Endpoint::Default(Verb::ResumableQueryEnd),
            Command::Reset { scope } => match scope {
                ResetScope::Default => Endpoint::Default(Verb::Reset),
                ResetScope::Namespace(ns) => Endpoint::Namespaced(Verb::Reset, ns.clone()),
                ResetScope::All => Endpoint::ResetAll,
            },
            Command::Info { namespace } => Endpoint::new(Verb::Info, namespace),
            Command::ListNamespaces => Endpoint::Default(Verb::ListNamespaces),
            Command::DeleteNamespace { namespace } => {
                Endpoint::Namespaced(Verb::DeleteNamespace, namespace.clone())
            }
        }
    }

    /// The JSON request body. Commands without a payload send `[]`.
    pub fn payload(&self) -> Result<Value> {
        match self {
            Command::Upsert { payload, .. } => to_json(&payload.records),
            Command::Update { payload, .. } => to_json(&payload.record),
            Command::Fetch { request, .. } => to_json(request),
            Command::Delete { selector, .. } => to_json(selector),
            Command::Range { request, .. } => to_json(request),
            Command::Query { payload, .. } => to_json(&payload.request),
            Command::QueryMany { payload, .. } => to_json(&payload.requests),
            Command::ResumableQueryStart { payload, .. } => to_json(&payload.request),
            Command::ResumableQueryNext { uuid, additional_k } => {
                Ok(json!({ "uuid": uuid, "additionalK": additional_k }))
            }
            Command::ResumableQueryEnd { uuid } => Ok(json!({ "uuid": uuid })),
            Command::Reset { .. }
            | Command::Info { .. }
            | Command::ListNamespaces
            | Command::DeleteNamespace { .. } => Ok(json!([])),
        }
    }

    /// Returns the command name (for logging/debugging).
    pub fn name(&self) -> &'static str {
        match self {
            Command::Upsert { .. } => "Upsert",
            Command::Update { .. } => "Update",
            Command::Fetch { .. } => "Fetch",
            Command::Delete { .. } => "Delete",
            Command::Range { .. } => "Range",
            Command::Query { .. } => "Query",
            Command::QueryMany { .. } => "QueryMany",
            Command::ResumableQueryStart { .. } => "ResumableQueryStart",
            Command::ResumableQueryNext { .. } => "ResumableQueryNext",
            Command::ResumableQueryEnd { .. } => "ResumableQueryEnd",
            Command::Reset { .. } => "Reset",
            Command::Info { .. } => "Info",
            Command::ListNamespaces => "ListNamespaces",
            Command::DeleteNamespace { .. } => "DeleteNamespace",
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
