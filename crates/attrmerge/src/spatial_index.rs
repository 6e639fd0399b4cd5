//! Per-attribute cache of pages and zones, rebuilt for every merge run.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use attrmerge_core::{Rect, SpatialAttribute};

use crate::overlap::overlap_percent;

/// Stable handle of an attribute within one merge run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct AttrId(pub(crate) usize);

/// Pages and zones of one attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct AttributeSpatialInfo {
    pub(crate) pages: BTreeSet<u32>,
    pub(crate) zones_by_page: BTreeMap<u32, Vec<Rect>>,
}

impl AttributeSpatialInfo {
    fn from_attribute(attribute: &SpatialAttribute) -> Self {
        let mut info = Self::default();
        for zone in attribute.value.zones.iter().filter(|z| !z.is_empty()) {
            info.pages.insert(zone.page);
            info.zones_by_page.entry(zone.page).or_default().push(zone.rect);
        }
        info
    }

    pub(crate) fn first_page(&self) -> Option<u32> {
        self.pages.first().copied()
    }

    pub(crate) fn last_page(&self) -> Option<u32> {
        self.pages.last().copied()
    }

    pub(crate) fn zones(&self, page: u32) -> &[Rect] {
        self.zones_by_page
            .get(&page)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Spatial information for every attribute taking part in a merge run.
///
/// Attributes without any non-empty zone are never indexed; the engine
/// passes them through untouched.
#[derive(Debug, Default)]
pub(crate) struct SpatialIndex {
    entries: HashMap<AttrId, AttributeSpatialInfo>,
}

impl SpatialIndex {
    /// (Re)load the spatial info of `attribute` under `id`.
    ///
    /// Returns `true` if the attribute has spatial info and is now indexed.
    pub(crate) fn load(&mut self, id: AttrId, attribute: &SpatialAttribute) -> bool {
        self.entries.remove(&id);
        let info = AttributeSpatialInfo::from_attribute(attribute);
        if info.pages.is_empty() {
            return false;
        }
        self.entries.insert(id, info);
        true
    }

    pub(crate) fn remove(&mut self, id: AttrId) {
        self.entries.remove(&id);
    }

    pub(crate) fn get(&self, id: AttrId) -> Option<&AttributeSpatialInfo> {
        self.entries.get(&id)
    }

    pub(crate) fn contains(&self, id: AttrId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Contiguous page range shared by the first/last pages of `a` and `b`.
    pub(crate) fn common_pages(&self, a: AttrId, b: AttrId) -> BTreeSet<u32> {
        let (Some(ia), Some(ib)) = (self.get(a), self.get(b)) else {
            return BTreeSet::new();
        };
        let (Some(a_first), Some(a_last), Some(b_first), Some(b_last)) =
            (ia.first_page(), ia.last_page(), ib.first_page(), ib.last_page())
        else {
            return BTreeSet::new();
        };
        let first = a_first.max(b_first);
        let last = a_last.min(b_last);
        if first > last {
            return BTreeSet::new();
        }
        (first..=last).collect()
    }

    /// Overlap percentage of `a` and `b` on `page`.
    pub(crate) fn overlap_percent(&self, a: AttrId, b: AttrId, page: u32, mutual: bool) -> f64 {
        match (self.get(a), self.get(b)) {
            (Some(ia), Some(ib)) => overlap_percent(ia.zones(page), ib.zones(page), mutual),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attrmerge_core::{RasterZone, SpatialText};

    fn attr(zones: &[(u32, i64, i64, i64, i64)]) -> SpatialAttribute {
        SpatialAttribute::new(
            "a",
            SpatialText::new(
                "x",
                zones
                    .iter()
                    .map(|&(p, l, t, r, b)| RasterZone::new(p, Rect::new(l, t, r, b)))
                    .collect(),
            ),
        )
    }

    #[test]
    fn load_groups_zones_by_page() {
        let mut index = SpatialIndex::default();
        let a = attr(&[(2, 0, 0, 10, 10), (1, 0, 0, 5, 5), (2, 20, 20, 30, 30)]);
        assert!(index.load(AttrId(0), &a));
        let info = index.get(AttrId(0)).unwrap();
        assert_eq!(info.pages.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(info.zones(2).len(), 2);
        assert_eq!(info.zones(3).len(), 0);
    }

    #[test]
    fn non_spatial_attribute_not_indexed() {
        let mut index = SpatialIndex::default();
        let a = SpatialAttribute::new("a", SpatialText::non_spatial("x"));
        assert!(!index.load(AttrId(0), &a));
        assert!(!index.contains(AttrId(0)));
    }

    #[test]
    fn empty_zones_skipped() {
        let mut index = SpatialIndex::default();
        let a = attr(&[(1, 0, 0, 0, 10)]);
        assert!(!index.load(AttrId(0), &a));
    }

    #[test]
    fn reload_replaces_entry() {
        let mut index = SpatialIndex::default();
        index.load(AttrId(0), &attr(&[(1, 0, 0, 10, 10)]));
        index.load(AttrId(0), &attr(&[(4, 0, 0, 10, 10)]));
        let info = index.get(AttrId(0)).unwrap();
        assert_eq!(info.first_page(), Some(4));
        assert_eq!(info.zones(1).len(), 0);

        assert!(!index.load(AttrId(0), &SpatialAttribute::default()));
        assert!(!index.contains(AttrId(0)));
    }

    #[test]
    fn common_pages_is_bounded_range() {
        let mut index = SpatialIndex::default();
        index.load(AttrId(0), &attr(&[(1, 0, 0, 10, 10), (5, 0, 0, 10, 10)]));
        index.load(AttrId(1), &attr(&[(3, 0, 0, 10, 10), (8, 0, 0, 10, 10)]));
        let pages: Vec<u32> = index.common_pages(AttrId(0), AttrId(1)).into_iter().collect();
        assert_eq!(pages, vec![3, 4, 5]);
    }

    #[test]
    fn disjoint_page_ranges_share_nothing() {
        let mut index = SpatialIndex::default();
        index.load(AttrId(0), &attr(&[(1, 0, 0, 10, 10)]));
        index.load(AttrId(1), &attr(&[(2, 0, 0, 10, 10)]));
        assert!(index.common_pages(AttrId(0), AttrId(1)).is_empty());
        assert_eq!(index.overlap_percent(AttrId(0), AttrId(1), 1, false), 0.0);
    }
}
