//! attrmerge: Spatial attribute merge engine.
//!
//! Attributes extracted from a scanned document by several passes often
//! describe the same field. This crate finds attributes whose raster zones
//! overlap enough on a page, clusters them transitively, and replaces each
//! cluster with one merged attribute whose name, type and value are chosen
//! by configurable policies.
//!
//! # Architecture
//!
//! - **overlap**: overlap percentage between two zone sets
//! - **spatial_index**: per-attribute page/zone cache for one run
//! - **resolver**: priority-list choice between two field values
//! - **clusterer**: merge discovery and page-scoped membership
//! - **assembler**: validation and application of merge results
//! - **engine**: the [`SpatialMergeEngine`] facade

mod assembler;
mod clusterer;
mod engine;
mod error;
mod field_merge;
pub mod options;
pub mod overlap;
pub mod resolver;
mod spatial_index;

pub use assembler::ApplySummary;
pub use attrmerge_core;
pub use engine::SpatialMergeEngine;
pub use error::MergeError;
pub use options::{MergeMode, MergeOptions, PriorityList};
pub use overlap::overlap_percent;
pub use resolver::{FieldResolver, Resolution, Side};
