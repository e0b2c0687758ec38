//! Index-level descriptors and query tuning enums.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Index Info
// =============================================================================

/// Similarity function configured on the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimilarityFunction {
    /// Cosine similarity
    Cosine,
    /// Euclidean distance
    Euclidean,
    /// Dot product
    DotProduct,
}

/// Per-namespace counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceInfo {
    /// Indexed records
    pub vector_count: u64,
    /// Records written but not yet indexed
    pub pending_vector_count: u64,
}

/// Index statistics returned by `info`.
///
/// `namespaces` is keyed by namespace name; the default namespace is `""`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResult {
    /// Indexed records across all namespaces
    pub vector_count: u64,
    /// Records written but not yet indexed
    pub pending_vector_count: u64,
    /// Index size in bytes
    pub index_size: u64,
    /// Dense vector dimension
    pub dimension: u64,
    /// Configured similarity function
    pub similarity_function: SimilarityFunction,
    /// Per-namespace counters
    #[serde(default)]
    pub namespaces: BTreeMap<String, NamespaceInfo>,
}

impl InfoResult {
    /// Counters for one namespace, `""` being the default namespace.
    pub fn namespace(&self, name: &str) -> Option<&NamespaceInfo> {
        self.namespaces.get(name)
    }
}

// =============================================================================
// Query Tuning
// =============================================================================

/// Weighting applied to sparse query terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WeightingStrategy {
    /// Inverse document frequency
    Idf,
}

/// How dense and sparse scores are combined on a hybrid index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FusionAlgorithm {
    /// Reciprocal rank fusion (service default)
    Rrf,
    /// Distribution-based score fusion
    Dbsf,
}

/// Which half of a hybrid index a text query is embedded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryMode {
    /// Both halves, fused
    Hybrid,
    /// Dense half only
    Dense,
    /// Sparse half only
    Sparse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn info_decodes_namespaces() {
        let info: InfoResult = serde_json::from_value(json!({
            "vectorCount": 3,
            "pendingVectorCount": 0,
            "indexSize": 1024,
            "dimension": 384,
            "similarityFunction": "DOT_PRODUCT",
            "namespaces": {
                "": {"vectorCount": 2, "pendingVectorCount": 0},
                "books": {"vectorCount": 1, "pendingVectorCount": 0}
            }
        }))
        .unwrap();
        assert_eq!(info.similarity_function, SimilarityFunction::DotProduct);
        assert_eq!(info.namespace("").unwrap().vector_count, 2);
        assert_eq!(info.namespace("books").unwrap().vector_count, 1);
        assert!(info.namespace("missing").is_none());
    }

    #[test]
    fn info_without_namespaces_defaults_empty() {
        let info: InfoResult = serde_json::from_value(json!({
            "vectorCount": 0,
            "pendingVectorCount": 0,
            "indexSize": 0,
            "dimension": 2,
            "similarityFunction": "COSINE"
        }))
        .unwrap();
        assert!(info.namespaces.is_empty());
    }

    #[test]
    fn tuning_enums_are_uppercase_on_the_wire() {
        assert_eq!(serde_json::to_value(WeightingStrategy::Idf).unwrap(), json!("IDF"));
        assert_eq!(serde_json::to_value(FusionAlgorithm::Dbsf).unwrap(), json!("DBSF"));
        assert_eq!(serde_json::to_value(QueryMode::Sparse).unwrap(), json!("SPARSE"));
    }
}
