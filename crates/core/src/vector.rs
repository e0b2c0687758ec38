//! Vector records and the result shapes returned by the service.
//!
//! A record may be dense-only, sparse-only, hybrid (both), or text-only
//! (`data`, embedded server-side). The client never computes anything over
//! these values; it only shapes them for the wire.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Sparse vector given as explicit (index, value) pairs for nonzero dimensions.
///
/// Serialized as `{"indices": [...], "values": [...]}`. Some service responses
/// use the positional `[[indices], [values]]` form; both decode to this type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "SparseVectorWire")]
pub struct SparseVector {
    /// Dimension indices
    pub indices: Vec<u32>,
    /// Values, one per index
    pub values: Vec<f32>,
}

impl SparseVector {
    /// Create a sparse vector from parallel index/value lists.
    pub fn new(indices: Vec<u32>, values: Vec<f32>) -> Self {
        Self { indices, values }
    }

    /// Number of nonzero entries.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True if the vector has no entries.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Check that indices and values line up.
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() != self.values.len() {
            return Err(Error::invalid_input(format!(
                "sparse vector has {} indices but {} values",
                self.indices.len(),
                self.values.len()
            )));
        }
        Ok(())
    }
}

impl From<(Vec<u32>, Vec<f32>)> for SparseVector {
    fn from((indices, values): (Vec<u32>, Vec<f32>)) -> Self {
        Self { indices, values }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SparseVectorWire {
    Object { indices: Vec<u32>, values: Vec<f32> },
    Pair(Vec<u32>, Vec<f32>),
}

impl From<SparseVectorWire> for SparseVector {
    fn from(wire: SparseVectorWire) -> Self {
        match wire {
            SparseVectorWire::Object { indices, values } | SparseVectorWire::Pair(indices, values) => {
                Self { indices, values }
            }
        }
    }
}

/// A stored record.
///
/// Used both as upsert/update input and as the shape returned by fetch and
/// range. Absent fields are omitted on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vector {
    /// Record identifier
    pub id: String,
    /// Dense vector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
    /// Sparse vector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparse_vector: Option<SparseVector>,
    /// Arbitrary JSON metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Raw text, embedded server-side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl Vector {
    /// A dense record.
    pub fn dense(id: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            vector: Some(vector),
            ..Default::default()
        }
    }

    /// A sparse-only record.
    pub fn sparse(id: impl Into<String>, sparse: impl Into<SparseVector>) -> Self {
        Self {
            id: id.into(),
            sparse_vector: Some(sparse.into()),
            ..Default::default()
        }
    }

    /// A hybrid record carrying both dense and sparse components.
    pub fn hybrid(id: impl Into<String>, vector: Vec<f32>, sparse: impl Into<SparseVector>) -> Self {
        Self {
            id: id.into(),
            vector: Some(vector),
            sparse_vector: Some(sparse.into()),
            ..Default::default()
        }
    }

    /// A text record, embedded by the service.
    pub fn text(id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: Some(data.into()),
            ..Default::default()
        }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Attach raw data alongside a vector (stored, not embedded).
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// True if the record carries a dense or sparse component.
    pub fn has_vector(&self) -> bool {
        self.vector.is_some() || self.sparse_vector.is_some()
    }

    /// Decode metadata into a caller type.
    pub fn metadata_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        decode_metadata(self.metadata.as_ref())
    }
}

/// One scored match from a query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Record identifier
    pub id: String,
    /// Similarity score
    pub score: f64,
    /// Dense vector, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
    /// Sparse vector, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparse_vector: Option<SparseVector>,
    /// Metadata, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    /// Raw data, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl QueryResult {
    /// Decode metadata into a caller type.
    pub fn metadata_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        decode_metadata(self.metadata.as_ref())
    }
}

/// A page of records from a range scan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeResult {
    /// Cursor for the next page; empty once the scan is exhausted
    pub next_cursor: String,
    /// Records in this page
    #[serde(default)]
    pub vectors: Vec<Vector>,
}

impl RangeResult {
    /// True once there are no further pages.
    pub fn is_exhausted(&self) -> bool {
        self.next_cursor.is_empty()
    }
}

fn decode_metadata<T: DeserializeOwned>(metadata: Option<&Value>) -> Result<Option<T>> {
    metadata
        .map(|m| serde_json::from_value(m.clone()).map_err(Error::from))
        .transpose()
}
