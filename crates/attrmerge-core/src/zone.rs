//! Raster zones and the per-page information supplied by the document text.

use std::collections::{BTreeMap, HashMap};

use crate::geometry::Rect;

/// One rectangular region on one page associated with (part of) an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RasterZone {
    /// Page number (1-indexed, as in the source document).
    pub page: u32,
    /// Region bounds in page-pixel coordinates.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub rect: Rect,
}

impl RasterZone {
    pub fn new(page: u32, rect: Rect) -> Self {
        Self { page, rect }
    }

    /// Returns `true` when the zone bounds enclose no area.
    pub fn is_empty(&self) -> bool {
        self.rect.is_empty()
    }
}

/// Page dimensions of a document page, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageInfo {
    pub width: i64,
    pub height: i64,
}

impl PageInfo {
    pub fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }

    /// Full-page rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

/// Read-only view of the document the attributes were extracted from.
///
/// Only page geometry is needed: synthesized merge regions are clipped to
/// the page they live on.
pub trait DocumentText {
    /// Page information for `page`, or `None` if the page is unknown.
    fn page_info(&self, page: u32) -> Option<PageInfo>;
}

impl DocumentText for BTreeMap<u32, PageInfo> {
    fn page_info(&self, page: u32) -> Option<PageInfo> {
        self.get(&page).copied()
    }
}

impl DocumentText for HashMap<u32, PageInfo> {
    fn page_info(&self, page: u32) -> Option<PageInfo> {
        self.get(&page).copied()
    }
}

impl<T: DocumentText + ?Sized> DocumentText for &T {
    fn page_info(&self, page: u32) -> Option<PageInfo> {
        (**self).page_info(page)
    }
}
