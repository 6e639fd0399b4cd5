//! Validation and application of a merge run's results.

use attrmerge_core::{MergeWarning, MergeWarningCode, SpatialAttribute};

use crate::clusterer::{MergeState, NodeKind, PageKey};
use crate::error::MergeError;
use crate::spatial_index::AttrId;

/// What [`apply_merges`](crate::SpatialMergeEngine::apply_merges) changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplySummary {
    /// Merge results appended to the collection.
    pub results_added: usize,
    /// Original attributes removed because every page of theirs was merged.
    pub originals_removed: usize,
}

impl MergeState {
    /// Drop results that could not be named and release their sources.
    pub(crate) fn remove_invalid_results(&mut self) {
        let invalid: Vec<AttrId> = self
            .pending
            .iter()
            .copied()
            .filter(|&id| self.node(id).needs_name)
            .collect();

        for id in invalid {
            let page = match self.node(id).kind {
                NodeKind::Result { page } => page,
                NodeKind::Source { .. } => continue,
            };
            #[cfg(feature = "tracing")]
            tracing::warn!(page, members = self.node(id).members.len(), "discarding unnamed merge result");
            self.warnings.push(MergeWarning::on_page(
                MergeWarningCode::UnresolvedName,
                format!(
                    "no name could be preserved for a merge of {} attributes; they are left unmerged",
                    self.node(id).members.len()
                ),
                page,
            ));
            self.owners.retain(|_, owner| *owner != id);
            self.pending.retain(|&p| p != id);
            self.index.remove(id);
        }
    }

    /// Returns `true` if every page `id` occupies was absorbed by a merge result.
    pub(crate) fn is_fully_absorbed(&self, id: AttrId) -> bool {
        let pages = self.node(id).attribute.value.pages();
        !pages.is_empty()
            && pages.iter().all(|&page| {
                matches!(self.owners.get(&PageKey::new(id, page)), Some(&owner) if owner != id)
            })
    }

    /// The output form of merge result `id`.
    fn finished_result(&self, id: AttrId, with_sub_attributes: bool) -> SpatialAttribute {
        let node = self.node(id);
        let mut attribute = node.attribute.clone();
        if with_sub_attributes {
            let mut members = node.members.clone();
            members.sort();
            attribute.sub_attributes = members
                .into_iter()
                .map(|m| self.node(m).attribute.clone())
                .collect();
        }
        attribute
    }

    /// Live merge results in output form.
    pub(crate) fn finished_results(&self, with_sub_attributes: bool) -> Vec<SpatialAttribute> {
        self.pending
            .iter()
            .map(|&id| self.finished_result(id, with_sub_attributes))
            .collect()
    }

    /// Append the merge results to `collection` and remove fully absorbed originals.
    ///
    /// `collection` must be the collection ingested as set 0.
    pub(crate) fn apply_results(
        &self,
        collection: &mut Vec<SpatialAttribute>,
        with_sub_attributes: bool,
    ) -> Result<ApplySummary, MergeError> {
        let sources: Vec<AttrId> = self.sources(0).collect();
        if collection.len() != sources.len() {
            return Err(MergeError::CollectionMismatch {
                expected: sources.len(),
                actual: collection.len(),
            });
        }

        let absorbed: Vec<bool> = sources.iter().map(|&id| self.is_fully_absorbed(id)).collect();
        let mut position = 0;
        collection.retain(|_| {
            let keep = !absorbed[position];
            position += 1;
            keep
        });

        let results = self.finished_results(with_sub_attributes);
        let summary = ApplySummary {
            results_added: results.len(),
            originals_removed: absorbed.iter().filter(|&&a| a).count(),
        };
        collection.extend(results);
        Ok(summary)
    }

    /// Returns `true` if every spatial source attribute was absorbed on all its pages.
    pub(crate) fn all_sources_absorbed(&self) -> bool {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (AttrId(i), n))
            .filter(|(id, n)| matches!(n.kind, NodeKind::Source { .. }) && self.index.contains(*id))
            .all(|(id, _)| self.is_fully_absorbed(id))
    }
}
