//! Core types for Quiver
//!
//! This crate defines the data model shared by every layer of the client:
//! - Vector: A stored record (dense, sparse, hybrid, or text)
//! - SparseVector: Explicit (index, value) pairs
//! - QueryResult / RangeResult / InfoResult: Service result shapes
//! - WeightingStrategy / FusionAlgorithm / QueryMode: Query tuning enums
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod types;
pub mod vector;

pub use error::{Error, Result};
pub use types::{
    FusionAlgorithm, InfoResult, NamespaceInfo, QueryMode, SimilarityFunction, WeightingStrategy,
};
pub use vector::{QueryResult, RangeResult, SparseVector, Vector};

/// Re-exported so callers can build metadata without a direct serde_json dependency.
pub use serde_json::Value;
