//! Text with an optional set of page-located raster zones.

use std::collections::BTreeSet;

use crate::zone::RasterZone;

/// Text plus zero or more raster zones keyed by page.
///
/// When the text has exactly one line per zone (and there are several zones),
/// line *i* is the text found in zone *i*: the text is laid out literally.
/// Otherwise the whole text spans every zone.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpatialText {
    pub text: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub zones: Vec<RasterZone>,
}

impl SpatialText {
    pub fn new(text: impl Into<String>, zones: Vec<RasterZone>) -> Self {
        Self {
            text: text.into(),
            zones,
        }
    }

    /// Text without any spatial information.
    pub fn non_spatial(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    /// Returns `true` if at least one zone has a non-empty area.
    pub fn is_spatial(&self) -> bool {
        self.zones.iter().any(|z| !z.is_empty())
    }

    /// Pages carrying at least one non-empty zone, in ascending order.
    pub fn pages(&self) -> BTreeSet<u32> {
        self.zones
            .iter()
            .filter(|z| !z.is_empty())
            .map(|z| z.page)
            .collect()
    }

    /// Non-empty zones located on `page`, in stored order.
    pub fn zones_on_page(&self, page: u32) -> impl Iterator<Item = &RasterZone> {
        self.zones
            .iter()
            .filter(move |z| z.page == page && !z.is_empty())
    }

    /// Returns `true` when each line of the text belongs to the zone at the same index.
    pub fn has_literal_layout(&self) -> bool {
        self.zones.len() > 1 && self.text.lines().count() == self.zones.len()
    }

    /// Text located on `page`.
    ///
    /// With a literal layout only the lines of the zones on that page are
    /// returned; otherwise the full text is returned for any page the value
    /// occupies. Non-spatial text is returned unchanged.
    pub fn page_text(&self, page: u32) -> String {
        if !self.is_spatial() {
            return self.text.clone();
        }
        if self.has_literal_layout() {
            return self
                .text
                .lines()
                .zip(&self.zones)
                .filter(|(_, z)| z.page == page)
                .map(|(line, _)| line)
                .collect::<Vec<_>>()
                .join("\n");
        }
        if self.zones.iter().any(|z| z.page == page) {
            self.text.clone()
        } else {
            String::new()
        }
    }
}
