//! Extracted document attributes.

use crate::spatial_text::SpatialText;

/// Separator between the tags of a multi-valued attribute type (`"type1|type2"`).
pub const TYPE_SEPARATOR: char = '|';

/// An extracted field: name, type and a spatially located value.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpatialAttribute {
    pub name: String,
    /// Attribute type, possibly multi-valued (`"type1|type2"`).
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub attr_type: String,
    pub value: SpatialText,
    /// Child attributes (for merge results: the attributes that were merged).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub sub_attributes: Vec<SpatialAttribute>,
}

impl SpatialAttribute {
    pub fn new(name: impl Into<String>, value: SpatialText) -> Self {
        Self {
            name: name.into(),
            attr_type: String::new(),
            value,
            sub_attributes: Vec::new(),
        }
    }

    /// Builder-style setter for the attribute type.
    pub fn with_type(mut self, attr_type: impl Into<String>) -> Self {
        self.attr_type = attr_type.into();
        self
    }

    /// Individual type tags, in declaration order, without empty entries.
    pub fn type_tags(&self) -> Vec<&str> {
        split_type_tags(&self.attr_type)
    }

    /// Returns `true` when the value carries at least one non-empty raster zone.
    pub fn is_spatial(&self) -> bool {
        self.value.is_spatial()
    }
}

/// Split a multi-valued type string into its tags.
pub fn split_type_tags(attr_type: &str) -> Vec<&str> {
    attr_type
        .split(TYPE_SEPARATOR)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}
