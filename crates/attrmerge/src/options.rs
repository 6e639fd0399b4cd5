//! Merge configuration.

use crate::error::MergeError;

/// How a field of a merge result is produced.
///
/// Not every mode is valid for every field; see [`MergeOptions::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MergeMode {
    /// Use a fixed, configured value.
    SpecifyField,
    /// Keep one operand's value, chosen by a priority list.
    PreserveField,
    /// Combine both operands' values (types only).
    CombineField,
    /// Take the value from the operand that supplied the preserved name.
    SelectField,
}

/// Ordered list of patterns deciding which of two competing values to keep.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriorityList {
    /// Patterns in priority order (highest first).
    pub patterns: Vec<String>,
    /// Whether the patterns are regular expressions (matched against the whole value).
    #[cfg_attr(feature = "serde", serde(default))]
    pub as_regex: bool,
}

impl PriorityList {
    /// Literal patterns, compared case-sensitively first and then ignoring case.
    pub fn literal<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            as_regex: false,
        }
    }

    /// Regular-expression patterns.
    pub fn regex<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            as_regex: true,
        }
    }
}

/// Options controlling overlap qualification and field resolution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MergeOptions {
    /// Minimum overlap percentage (0-100) for two attributes to merge on a page. Default: `75.0`.
    pub overlap_threshold_percent: f64,
    /// Divide the intersection by the larger area instead of the smaller one. Default: `false`.
    pub use_mutual_overlap: bool,
    /// Name policy: `SpecifyField` or `PreserveField`. Default: `PreserveField`.
    pub name_mode: MergeMode,
    /// Type policy: `SpecifyField`, `CombineField` or `SelectField`. Default: `CombineField`.
    pub type_mode: MergeMode,
    /// Value policy: `SpecifyField`, `PreserveField` or `SelectField`. Default: `PreserveField`.
    pub value_mode: MergeMode,
    pub specified_name: String,
    pub specified_type: String,
    pub specified_value: String,
    pub name_priority: PriorityList,
    pub type_priority: PriorityList,
    pub value_priority: PriorityList,
    /// Attach the absorbed attributes to each merge result as sub-attributes.
    pub preserve_as_sub_attributes: bool,
    /// Replace the operands' zones with one bounding region per merge result.
    pub create_merged_region: bool,
    /// With `SelectField` types, take the type of the operand that supplied the name.
    pub type_from_name: bool,
    /// With `SelectField` types, pick a type using the type priority list.
    pub preserve_type: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            overlap_threshold_percent: 75.0,
            use_mutual_overlap: false,
            name_mode: MergeMode::PreserveField,
            type_mode: MergeMode::CombineField,
            value_mode: MergeMode::PreserveField,
            specified_name: String::new(),
            specified_type: String::new(),
            specified_value: String::new(),
            name_priority: PriorityList::default(),
            type_priority: PriorityList::default(),
            value_priority: PriorityList::default(),
            preserve_as_sub_attributes: false,
            create_merged_region: false,
            type_from_name: false,
            preserve_type: false,
        }
    }
}

impl MergeOptions {
    /// Reject invalid mode combinations and out-of-range values.
    ///
    /// Priority-list regexes are checked when the engine compiles them.
    pub fn validate(&self) -> Result<(), MergeError> {
        let threshold = self.overlap_threshold_percent;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(MergeError::invalid(
                "overlap_threshold_percent",
                format!("{threshold} is outside 0..=100"),
            ));
        }

        if !matches!(
            self.name_mode,
            MergeMode::SpecifyField | MergeMode::PreserveField
        ) {
            return Err(MergeError::invalid(
                "name_mode",
                format!("{:?} is not supported for names", self.name_mode),
            ));
        }
        if !matches!(
            self.value_mode,
            MergeMode::SpecifyField | MergeMode::PreserveField | MergeMode::SelectField
        ) {
            return Err(MergeError::invalid(
                "value_mode",
                format!("{:?} is not supported for values", self.value_mode),
            ));
        }
        if !matches!(
            self.type_mode,
            MergeMode::SpecifyField | MergeMode::CombineField | MergeMode::SelectField
        ) {
            return Err(MergeError::invalid(
                "type_mode",
                format!("{:?} is not supported for types", self.type_mode),
            ));
        }

        let preserves_name = self.name_mode == MergeMode::PreserveField;
        if self.value_mode == MergeMode::SelectField && !preserves_name {
            return Err(MergeError::invalid(
                "value_mode",
                "SelectField requires name_mode PreserveField",
            ));
        }
        if self.type_mode == MergeMode::SelectField {
            if !self.type_from_name && !self.preserve_type {
                return Err(MergeError::invalid(
                    "type_mode",
                    "SelectField requires type_from_name or preserve_type",
                ));
            }
            if self.type_from_name && !preserves_name {
                return Err(MergeError::invalid(
                    "type_from_name",
                    "requires name_mode PreserveField",
                ));
            }
        }
        Ok(())
    }
}
