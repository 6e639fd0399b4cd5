//! Discovery of qualifying merges and page-scoped merge membership.
//!
//! Every `(attribute, page)` pair is either unmerged (no owner entry) or owned
//! by a merge result. A merge result owns itself on its page until a later
//! chain merge supersedes it, at which point everything it owned is handed to
//! the new result. Owner entries therefore always point at a live result.

use std::collections::HashMap;

use attrmerge_core::{DocumentText, MergeWarning, SpatialAttribute};

use crate::error::MergeError;
use crate::field_merge::{FieldPolicy, Operand};
use crate::spatial_index::{AttrId, SpatialIndex};

/// Membership unit: one attribute on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PageKey {
    pub(crate) attr: AttrId,
    pub(crate) page: u32,
}

impl PageKey {
    pub(crate) fn new(attr: AttrId, page: u32) -> Self {
        Self { attr, page }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// An input attribute; `set` tells which input collection it came from.
    Source { set: usize },
    /// A merge result living on one page.
    Result { page: u32 },
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) attribute: SpatialAttribute,
    pub(crate) kind: NodeKind,
    pub(crate) needs_name: bool,
    /// Source attributes absorbed into this result.
    pub(crate) members: Vec<AttrId>,
}

/// All state of one merge run.
#[derive(Debug, Default)]
pub(crate) struct MergeState {
    pub(crate) nodes: Vec<Node>,
    pub(crate) index: SpatialIndex,
    pub(crate) owners: HashMap<PageKey, AttrId>,
    /// Live merge results, in creation order.
    pub(crate) pending: Vec<AttrId>,
    pub(crate) warnings: Vec<MergeWarning>,
}

impl MergeState {
    /// Register `attributes` as sources of input collection `set`.
    pub(crate) fn ingest(&mut self, attributes: &[SpatialAttribute], set: usize) -> Vec<AttrId> {
        attributes
            .iter()
            .map(|attribute| {
                let id = AttrId(self.nodes.len());
                self.nodes.push(Node {
                    attribute: attribute.clone(),
                    kind: NodeKind::Source { set },
                    needs_name: false,
                    members: Vec::new(),
                });
                self.index.load(id, attribute);
                id
            })
            .collect()
    }

    /// Source handles of input collection `set`, in ingestion order.
    pub(crate) fn sources(&self, set: usize) -> impl Iterator<Item = AttrId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.kind == NodeKind::Source { set })
            .map(|(i, _)| AttrId(i))
    }

    pub(crate) fn node(&self, id: AttrId) -> &Node {
        &self.nodes[id.0]
    }

    fn is_result(&self, id: AttrId) -> bool {
        matches!(self.node(id).kind, NodeKind::Result { .. })
    }

    /// The attribute currently standing for `id` on `page`.
    pub(crate) fn resolve(&self, id: AttrId, page: u32) -> AttrId {
        // Absorbing a result repoints its members, so owners are never owned.
        match self.owners.get(&PageKey::new(id, page)) {
            Some(&owner) => {
                debug_assert!(
                    self.owners
                        .get(&PageKey::new(owner, page))
                        .is_none_or(|&o| o == owner),
                    "owner {owner:?} of {id:?} on page {page} is itself owned"
                );
                owner
            }
            None => id,
        }
    }

    /// Pages on which `a` and `b` overlap by at least the configured threshold.
    fn pages_with_sufficient_overlap(
        &self,
        a: AttrId,
        b: AttrId,
        policy: &FieldPolicy<'_>,
    ) -> Vec<u32> {
        let threshold = policy.options.overlap_threshold_percent;
        let mutual = policy.options.use_mutual_overlap;
        self.index
            .common_pages(a, b)
            .into_iter()
            .filter(|&page| {
                let percent = self.index.overlap_percent(a, b, page, mutual);
                #[cfg(feature = "tracing")]
                tracing::trace!(a = a.0, b = b.0, page, percent, "overlap");
                percent > 0.0 && percent >= threshold
            })
            .collect()
    }

    /// Find and perform every qualifying merge of `set_a` against `set_b`
    /// (or against itself when `set_b` is `None`).
    ///
    /// Whenever an attribute of `set_a` takes part in a merge, scanning starts
    /// over from the first attribute: the new result may now qualify against an
    /// attribute that was already visited.
    pub(crate) fn find_qualified_merges(
        &mut self,
        set_a: &[AttrId],
        set_b: Option<&[AttrId]>,
        policy: &FieldPolicy<'_>,
        doc: &dyn DocumentText,
    ) -> Result<(), MergeError> {
        let mut targets: Vec<AttrId> = set_b.unwrap_or(set_a).to_vec();

        let mut i = 0;
        while i < set_a.len() {
            let a1 = set_a[i];
            if !self.index.contains(a1) {
                i += 1;
                continue;
            }

            let mut merged = false;
            let mut j = 0;
            while j < targets.len() {
                let a2 = targets[j];
                let mut next = j + 1;
                if a2 != a1 && self.index.contains(a2) {
                    for page in self.pages_with_sufficient_overlap(a1, a2, policy) {
                        if self.merge_pair(a1, a2, page, policy, doc, &mut targets, &mut next)? {
                            merged = true;
                        }
                    }
                }
                j = next;
            }

            i = if merged { 0 } else { i + 1 };
        }
        Ok(())
    }

    /// Merge whatever currently stands for `a1` and `a2` on `page`.
    ///
    /// Returns `false` if both already belong to the same result.
    #[allow(clippy::too_many_arguments)]
    fn merge_pair(
        &mut self,
        a1: AttrId,
        a2: AttrId,
        page: u32,
        policy: &FieldPolicy<'_>,
        doc: &dyn DocumentText,
        targets: &mut Vec<AttrId>,
        next: &mut usize,
    ) -> Result<bool, MergeError> {
        let op1 = self.resolve(a1, page);
        let op2 = self.resolve(a2, page);
        if op1 == op2 {
            return Ok(false);
        }

        let merged = {
            let (n1, n2) = (self.node(op1), self.node(op2));
            policy.merge(
                Operand {
                    attribute: &n1.attribute,
                    needs_name: n1.needs_name,
                },
                Operand {
                    attribute: &n2.attribute,
                    needs_name: n2.needs_name,
                },
                page,
                doc,
            )?
        };

        let result = AttrId(self.nodes.len());
        #[cfg(feature = "tracing")]
        tracing::debug!(
            first = op1.0,
            second = op2.0,
            result = result.0,
            page,
            name = %merged.attribute.name,
            "merged attributes"
        );
        self.index.load(result, &merged.attribute);
        self.nodes.push(Node {
            attribute: merged.attribute,
            kind: NodeKind::Result { page },
            needs_name: merged.needs_name,
            members: Vec::new(),
        });
        self.warnings.extend(merged.warnings);
        self.owners.insert(PageKey::new(result, page), result);

        self.absorb(op1, result, page, targets, next);
        self.absorb(op2, result, page, targets, next);

        self.pending.push(result);
        if !targets.contains(&result) {
            targets.push(result);
        }
        Ok(true)
    }

    /// Hand `operand` (and, for a superseded result, everything it owned) to `result`.
    fn absorb(
        &mut self,
        operand: AttrId,
        result: AttrId,
        page: u32,
        targets: &mut Vec<AttrId>,
        next: &mut usize,
    ) {
        if !self.is_result(operand) {
            self.owners.insert(PageKey::new(operand, page), result);
            self.nodes[result.0].members.push(operand);
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(old = operand.0, new = result.0, page, "superseded merge result");
        for owner in self.owners.values_mut() {
            if *owner == operand {
                *owner = result;
            }
        }
        let members = std::mem::take(&mut self.nodes[operand.0].members);
        self.nodes[result.0].members.extend(members);

        self.pending.retain(|&p| p != operand);
        self.index.remove(operand);
        if let Some(pos) = targets.iter().position(|&t| t == operand) {
            targets.remove(pos);
            if pos < *next {
                *next -= 1;
            }
        }
    }
}
