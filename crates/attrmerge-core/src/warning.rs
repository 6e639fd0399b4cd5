//! Non-fatal diagnostics recorded while merging.
//!
//! Provides [`MergeWarning`] for issues that let a merge run continue
//! such as a result that could not be named together with a
//! machine-readable [`MergeWarningCode`].

use std::fmt;

/// Machine-readable category of a [`MergeWarning`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum MergeWarningCode {
    /// No name could be preserved for a merge result; its sources stay unmerged.
    UnresolvedName,
    /// Value resolution was ambiguous and fell back to the first operand.
    AmbiguousValue,
    /// Any other warning not covered by specific variants.
    Other(String),
}

impl MergeWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            MergeWarningCode::UnresolvedName => "UNRESOLVED_NAME",
            MergeWarningCode::AmbiguousValue => "AMBIGUOUS_VALUE",
            MergeWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for MergeWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal issue encountered during a merge run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergeWarning {
    /// Machine-readable warning code.
    pub code: MergeWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Page the warning refers to, if applicable.
    pub page: Option<u32>,
}

impl MergeWarning {
    /// Create a warning with a specific code and description.
    pub fn with_code(code: MergeWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            page: None,
        }
    }

    /// Create a warning with page context.
    pub fn on_page(code: MergeWarningCode, description: impl Into<String>, page: u32) -> Self {
        Self {
            code,
            description: description.into(),
            page: Some(page),
        }
    }
}

impl fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        Ok(())
    }
}
