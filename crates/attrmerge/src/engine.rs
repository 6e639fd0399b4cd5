//! Public entry point of the merge engine.

use attrmerge_core::{DocumentText, MergeWarning, SpatialAttribute};

use crate::assembler::ApplySummary;
use crate::clusterer::MergeState;
use crate::error::MergeError;
use crate::field_merge::{FieldPolicy, PriorityResolvers};
use crate::options::MergeOptions;

/// Finds spatially overlapping attributes and fuses them into merge results.
///
/// The engine is configured once; every call to
/// [`find_qualified_merges`](Self::find_qualified_merges) or
/// [`compare_attribute_sets`](Self::compare_attribute_sets) starts from a
/// clean slate. A merge plan computed by `find_qualified_merges` stays
/// pending until [`apply_merges`](Self::apply_merges) consumes it.
///
/// ```
/// use std::collections::BTreeMap;
/// use attrmerge::{MergeMode, MergeOptions, SpatialMergeEngine};
/// use attrmerge_core::{PageInfo, RasterZone, Rect, SpatialAttribute, SpatialText};
///
/// let zone = RasterZone::new(1, Rect::new(0, 0, 100, 100));
/// let mut attrs = vec![
///     SpatialAttribute::new("A", SpatialText::new("x", vec![zone])),
///     SpatialAttribute::new("B", SpatialText::new("x", vec![zone])),
/// ];
/// let doc = BTreeMap::from([(1u32, PageInfo::new(850, 1100))]);
///
/// let mut engine = SpatialMergeEngine::new(MergeOptions {
///     name_mode: MergeMode::SpecifyField,
///     specified_name: "Foo".to_string(),
///     ..MergeOptions::default()
/// })?;
/// engine.find_qualified_merges(&attrs, &doc)?;
/// engine.apply_merges(&mut attrs)?;
/// assert_eq!(attrs.len(), 1);
/// assert_eq!(attrs[0].name, "Foo");
/// # Ok::<(), attrmerge::MergeError>(())
/// ```
#[derive(Debug)]
pub struct SpatialMergeEngine {
    options: MergeOptions,
    resolvers: PriorityResolvers,
    state: Option<MergeState>,
    warnings: Vec<MergeWarning>,
}

impl SpatialMergeEngine {
    /// Create an engine, rejecting invalid options up front.
    pub fn new(options: MergeOptions) -> Result<Self, MergeError> {
        options.validate()?;
        let resolvers = PriorityResolvers::compile(&options)?;
        Ok(Self {
            options,
            resolvers,
            state: None,
            warnings: Vec::new(),
        })
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Diagnostics collected by the most recent run.
    pub fn warnings(&self) -> &[MergeWarning] {
        &self.warnings
    }

    /// Discard any previous run.
    fn initialize(&mut self) {
        self.state = None;
        self.warnings.clear();
    }

    fn policy(&self) -> FieldPolicy<'_> {
        FieldPolicy {
            options: &self.options,
            resolvers: &self.resolvers,
        }
    }

    /// Compute the merge plan for `attributes`.
    ///
    /// Results that could not be named are discarded here. Returns the
    /// number of merge results now pending.
    pub fn find_qualified_merges(
        &mut self,
        attributes: &[SpatialAttribute],
        doc: &dyn DocumentText,
    ) -> Result<usize, MergeError> {
        self.initialize();

        let mut state = MergeState::default();
        let ids = state.ingest(attributes, 0);
        state.find_qualified_merges(&ids, None, &self.policy(), doc)?;
        state.remove_invalid_results();

        let pending = state.pending.len();
        self.warnings = std::mem::take(&mut state.warnings);
        self.state = Some(state);
        Ok(pending)
    }

    /// Pending merge results, in creation order.
    pub fn pending_merges(&self) -> Vec<SpatialAttribute> {
        self.state.as_ref().map_or_else(Vec::new, |s| {
            s.finished_results(self.options.preserve_as_sub_attributes)
        })
    }

    /// Apply the pending plan to `attributes`, which must be the collection
    /// passed to [`find_qualified_merges`](Self::find_qualified_merges).
    ///
    /// Merge results are appended; originals absorbed on every page they
    /// occupy are removed. The plan is consumed.
    pub fn apply_merges(
        &mut self,
        attributes: &mut Vec<SpatialAttribute>,
    ) -> Result<ApplySummary, MergeError> {
        let state = self.state.as_ref().ok_or(MergeError::NotPrepared)?;
        let summary =
            state.apply_results(attributes, self.options.preserve_as_sub_attributes)?;
        self.state = None;
        Ok(summary)
    }

    /// Run [`find_qualified_merges`](Self::find_qualified_merges) and
    /// [`apply_merges`](Self::apply_merges) in one step.
    pub fn merge_attributes(
        &mut self,
        attributes: &mut Vec<SpatialAttribute>,
        doc: &dyn DocumentText,
    ) -> Result<ApplySummary, MergeError> {
        self.find_qualified_merges(attributes, doc)?;
        self.apply_merges(attributes)
    }

    /// Check whether two extraction runs found the same fields.
    ///
    /// `set_a` is clustered against `set_b` without touching either set.
    /// The sets match iff every spatial attribute of both ends up in a merge
    /// result on every page it occupies. Any pending plan is discarded.
    pub fn compare_attribute_sets(
        &mut self,
        set_a: &[SpatialAttribute],
        set_b: &[SpatialAttribute],
        doc: &dyn DocumentText,
    ) -> Result<bool, MergeError> {
        self.initialize();

        let mut state = MergeState::default();
        let ids_a = state.ingest(set_a, 0);
        let ids_b = state.ingest(set_b, 1);
        state.find_qualified_merges(&ids_a, Some(&ids_b), &self.policy(), doc)?;
        state.remove_invalid_results();

        let matching = state.all_sources_absorbed();
        #[cfg(feature = "tracing")]
        tracing::debug!(matching, results = state.pending.len(), "compared attribute sets");
        self.warnings = state.warnings;
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::MergeMode;
    use attrmerge_core::{PageInfo, RasterZone, Rect, SpatialText};
    use std::collections::BTreeMap;

    fn doc() -> BTreeMap<u32, PageInfo> {
        BTreeMap::from([(1, PageInfo::new(1000, 1000))])
    }

    fn attr(name: &str, rect: Rect) -> SpatialAttribute {
        SpatialAttribute::new(name, SpatialText::new(name, vec![RasterZone::new(1, rect)]))
    }

    #[test]
    fn invalid_options_rejected_at_construction() {
        let err = SpatialMergeEngine::new(MergeOptions {
            value_mode: MergeMode::CombineField,
            ..MergeOptions::default()
        })
        .unwrap_err();
        assert!(matches!(err, MergeError::InvalidOption { field: "value_mode", .. }));
    }

    #[test]
    fn invalid_priority_regex_rejected() {
        let err = SpatialMergeEngine::new(MergeOptions {
            name_priority: crate::options::PriorityList::regex(["[unclosed"]),
            ..MergeOptions::default()
        })
        .unwrap_err();
        assert!(matches!(err, MergeError::InvalidOption { field: "name_priority", .. }));
    }

    #[test]
    fn apply_without_plan_fails_fast() {
        let mut engine = SpatialMergeEngine::new(MergeOptions::default()).unwrap();
        let mut attrs = vec![attr("a", Rect::new(0, 0, 10, 10))];
        assert_eq!(engine.apply_merges(&mut attrs), Err(MergeError::NotPrepared));
    }

    #[test]
    fn plan_is_consumed_by_apply() {
        let mut engine = SpatialMergeEngine::new(MergeOptions::default()).unwrap();
        let r = Rect::new(0, 0, 10, 10);
        let mut attrs = vec![attr("a", r), attr("a", r)];
        assert_eq!(engine.find_qualified_merges(&attrs, &doc()).unwrap(), 1);
        engine.apply_merges(&mut attrs).unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(engine.apply_merges(&mut attrs), Err(MergeError::NotPrepared));
    }

    #[test]
    fn missing_page_info_aborts_run() {
        let mut engine = SpatialMergeEngine::new(MergeOptions::default()).unwrap();
        let r = Rect::new(0, 0, 10, 10);
        let attrs = vec![attr("a", r), attr("a", r)];
        let empty: BTreeMap<u32, PageInfo> = BTreeMap::new();
        assert_eq!(
            engine.find_qualified_merges(&attrs, &empty),
            Err(MergeError::MissingPageInfo { page: 1 })
        );
        assert!(engine.pending_merges().is_empty());
    }

    #[test]
    fn warnings_reset_between_runs() {
        let mut engine = SpatialMergeEngine::new(MergeOptions::default()).unwrap();
        let r = Rect::new(0, 0, 10, 10);
        let conflicting = vec![attr("x", r), attr("y", r)];
        engine.find_qualified_merges(&conflicting, &doc()).unwrap();
        assert!(!engine.warnings().is_empty());

        engine.find_qualified_merges(&[attr("x", r)], &doc()).unwrap();
        assert!(engine.warnings().is_empty());
    }
}
