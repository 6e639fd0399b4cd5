//! attrmerge-core: Backend-independent data types for spatial attribute merging.
//!
//! This crate provides the foundational types ([`Rect`], [`RasterZone`],
//! [`SpatialText`], [`SpatialAttribute`]) and the [`DocumentText`] seam used by
//! the merge engine in the `attrmerge` crate.

pub mod attribute;
pub mod geometry;
pub mod spatial_text;
pub mod warning;
pub mod zone;

pub use attribute::{SpatialAttribute, TYPE_SEPARATOR, split_type_tags};
pub use geometry::Rect;
pub use spatial_text::SpatialText;
pub use warning::{MergeWarning, MergeWarningCode};
pub use zone::{DocumentText, PageInfo, RasterZone};
