//! Error type for the merge engine.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Soft failures (a merge
//! result that cannot be named, an ambiguous value) are not errors; they are
//! collected as [`MergeWarning`](attrmerge_core::MergeWarning)s instead.

use thiserror::Error;

/// Fatal errors raised by [`SpatialMergeEngine`](crate::SpatialMergeEngine).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MergeError {
    /// A configuration value or combination was rejected.
    #[error("invalid option `{field}`: {reason}")]
    InvalidOption {
        /// Name of the offending option.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Merges were applied before any merge plan was computed.
    #[error("no merge plan available: find_qualified_merges must run first")]
    NotPrepared,

    /// The collection handed to `apply_merges` is not the one the plan was computed for.
    #[error("collection mismatch: merge plan covers {expected} attributes, got {actual}")]
    CollectionMismatch {
        /// Number of attributes the plan was computed for.
        expected: usize,
        /// Number of attributes in the supplied collection.
        actual: usize,
    },

    /// The document text has no information for a page a merge result lives on.
    #[error("document text has no page info for page {page}")]
    MissingPageInfo {
        /// The page that could not be looked up.
        page: u32,
    },
}

impl MergeError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        MergeError::InvalidOption {
            field,
            reason: reason.into(),
        }
    }
}
