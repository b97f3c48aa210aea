//! Statistics normalization and aggregation.
//!
//! The registry resolves heterogeneous question codes to canonical
//! categories; the aggregator merges per-question statistics into
//! per-category weighted means.

pub mod aggregator;
pub mod registry;

pub use aggregator::{aggregate, numeric_only};
