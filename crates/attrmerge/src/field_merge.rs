//! Field policy applied when two operands are fused into a merge result.

use attrmerge_core::{
    DocumentText, MergeWarning, MergeWarningCode, RasterZone, Rect, SpatialAttribute,
    SpatialText, TYPE_SEPARATOR, split_type_tags,
};

use crate::error::MergeError;
use crate::options::{MergeMode, MergeOptions, PriorityList};
use crate::resolver::{FieldResolver, Side};

/// Compiled priority lists for the three resolvable fields.
#[derive(Debug, Clone, Default)]
pub(crate) struct PriorityResolvers {
    pub(crate) name: FieldResolver,
    pub(crate) attr_type: FieldResolver,
    pub(crate) value: FieldResolver,
}

impl PriorityResolvers {
    pub(crate) fn compile(options: &MergeOptions) -> Result<Self, MergeError> {
        let compile = |field: &'static str, list: &PriorityList| {
            FieldResolver::new(list).map_err(|e| MergeError::invalid(field, e.to_string()))
        };
        Ok(Self {
            name: compile("name_priority", &options.name_priority)?,
            attr_type: compile("type_priority", &options.type_priority)?,
            value: compile("value_priority", &options.value_priority)?,
        })
    }
}

/// Options plus compiled resolvers: everything needed to fuse two operands.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldPolicy<'a> {
    pub(crate) options: &'a MergeOptions,
    pub(crate) resolvers: &'a PriorityResolvers,
}

/// One side of a pairwise merge.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Operand<'a> {
    pub(crate) attribute: &'a SpatialAttribute,
    /// The operand is a merge result that has no name yet.
    pub(crate) needs_name: bool,
}

impl Operand<'_> {
    fn name(&self) -> &str {
        &self.attribute.name
    }

    fn text(&self, page: u32, value_mode: MergeMode) -> String {
        // A nameless result has no selected value either.
        if self.needs_name && value_mode == MergeMode::SelectField {
            String::new()
        } else {
            self.attribute.value.page_text(page)
        }
    }

    fn zones(&self, page: u32) -> impl Iterator<Item = Rect> + '_ {
        self.attribute.value.zones_on_page(page).map(|z| z.rect)
    }
}

/// A freshly fused attribute.
#[derive(Debug, Clone)]
pub(crate) struct MergedFields {
    pub(crate) attribute: SpatialAttribute,
    /// No name could be preserved; the result must not reach the output as is.
    pub(crate) needs_name: bool,
    pub(crate) warnings: Vec<MergeWarning>,
}

impl FieldPolicy<'_> {
    /// Fuse `first` and `second` on `page` into a new attribute.
    pub(crate) fn merge(
        &self,
        first: Operand<'_>,
        second: Operand<'_>,
        page: u32,
        doc: &dyn DocumentText,
    ) -> Result<MergedFields, MergeError> {
        let opts = self.options;
        let mut warnings = Vec::new();

        let (name, name_source, names_identical) = match opts.name_mode {
            MergeMode::SpecifyField => (opts.specified_name.clone(), None, false),
            MergeMode::PreserveField => {
                let (preserved, both_match) = self.resolve_name(first, second);
                let name = match preserved {
                    Some(Side::First) => first.name().to_string(),
                    Some(Side::Second) => second.name().to_string(),
                    None => String::new(),
                };
                (name, preserved, both_match)
            }
            mode => return Err(MergeError::invalid("name_mode", format!("{mode:?}"))),
        };
        let needs_name = opts.name_mode == MergeMode::PreserveField && name_source.is_none();
        if needs_name {
            #[cfg(feature = "tracing")]
            tracing::debug!(page, "merge result has no name yet");
        }

        let pick = |side: Side| match side {
            Side::First => first,
            Side::Second => second,
        };

        let text = match opts.value_mode {
            MergeMode::SpecifyField => opts.specified_value.clone(),
            MergeMode::PreserveField => {
                let t1 = first.text(page, opts.value_mode);
                let t2 = second.text(page, opts.value_mode);
                match self.resolvers.value.choose_preserved(&t1, &t2).preserved {
                    Some(Side::First) => t1,
                    Some(Side::Second) => t2,
                    None => {
                        if !t1.is_empty() || !t2.is_empty() {
                            #[cfg(feature = "tracing")]
                            tracing::warn!(page, first = %t1, second = %t2, "ambiguous merge value, keeping first");
                            warnings.push(MergeWarning::on_page(
                                MergeWarningCode::AmbiguousValue,
                                format!("could not choose between values {t1:?} and {t2:?}; kept the first"),
                                page,
                            ));
                        }
                        t1
                    }
                }
            }
            MergeMode::SelectField => name_source
                .map(|side| pick(side).text(page, opts.value_mode))
                .unwrap_or_default(),
            mode => return Err(MergeError::invalid("value_mode", format!("{mode:?}"))),
        };

        let attr_type = match opts.type_mode {
            MergeMode::SpecifyField => opts.specified_type.clone(),
            MergeMode::CombineField => {
                combine_types(&first.attribute.attr_type, &second.attribute.attr_type)
            }
            MergeMode::SelectField => {
                let mut selected = String::new();
                if opts.type_from_name {
                    if let Some(side) = name_source {
                        selected = pick(side).attribute.attr_type.clone();
                    }
                }
                if opts.preserve_type && (!opts.type_from_name || names_identical) {
                    let t1 = &first.attribute.attr_type;
                    let t2 = &second.attribute.attr_type;
                    match self.resolvers.attr_type.choose_preserved(t1, t2).preserved {
                        Some(Side::First) => selected = t1.clone(),
                        Some(Side::Second) => selected = t2.clone(),
                        None => {}
                    }
                }
                selected
            }
            mode => return Err(MergeError::invalid("type_mode", format!("{mode:?}"))),
        };

        let info = doc
            .page_info(page)
            .ok_or(MergeError::MissingPageInfo { page })?;
        let rects: Vec<Rect> = first.zones(page).chain(second.zones(page)).collect();
        let rects = if opts.create_merged_region {
            bounding_region(&rects).into_iter().collect()
        } else {
            union_overlapping(rects)
        };
        let zones = rects
            .into_iter()
            .map(|r| {
                let clipped = r.clip_to(info.width, info.height);
                let rect = if clipped.is_empty() { r } else { clipped };
                RasterZone::new(page, rect)
            })
            .collect();

        Ok(MergedFields {
            attribute: SpatialAttribute {
                name,
                attr_type,
                value: SpatialText::new(text, zones),
                sub_attributes: Vec::new(),
            },
            needs_name,
            warnings,
        })
    }

    /// Preserved name side and whether both names matched identically.
    ///
    /// A nameless result stays nameless unless the other operand carries a
    /// name from the priority list. Plain fallbacks never lift it, so a name
    /// conflict is not settled by whichever attribute chains in next.
    fn resolve_name(&self, first: Operand<'_>, second: Operand<'_>) -> (Option<Side>, bool) {
        let names = &self.resolvers.name;
        let lifts = |op: Operand<'_>| {
            !op.needs_name && !op.name().is_empty() && names.is_prioritized(op.name())
        };
        match (first.needs_name, second.needs_name) {
            (false, false) => {
                let res = names.choose_preserved(first.name(), second.name());
                (res.preserved, res.both_match)
            }
            (true, false) if lifts(second) => (Some(Side::Second), false),
            (false, true) if lifts(first) => (Some(Side::First), false),
            _ => (None, false),
        }
    }
}

/// Union of both operands' type tags: first operand's tags, then the second's new ones.
pub(crate) fn combine_types(first: &str, second: &str) -> String {
    let mut tags: Vec<&str> = split_type_tags(first);
    for tag in split_type_tags(second) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags.join(&TYPE_SEPARATOR.to_string())
}

/// Single rectangle enclosing every input rectangle.
fn bounding_region(rects: &[Rect]) -> Option<Rect> {
    rects.iter().copied().reduce(|acc, r| acc.union(&r))
}

/// Repeatedly replace intersecting rectangle pairs by their union.
///
/// A union takes the place of its earliest rectangle, so the first operand's
/// zone order survives and stays paired with its text lines.
fn union_overlapping(mut rects: Vec<Rect>) -> Vec<Rect> {
    'restart: loop {
        for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                if rects[i].intersects(&rects[j]) {
                    let other = rects.remove(j);
                    rects[i] = rects[i].union(&other);
                    continue 'restart;
                }
            }
        }
        break;
    }
    rects
}

#[cfg(test)]
mod tests {
    use super::*;
    use attrmerge_core::PageInfo;
    use std::collections::BTreeMap;

    fn doc() -> BTreeMap<u32, PageInfo> {
        BTreeMap::from([(1, PageInfo::new(1000, 1000))])
    }

    fn attr(name: &str, ty: &str, text: &str, rects: &[Rect]) -> SpatialAttribute {
        SpatialAttribute::new(
            name,
            SpatialText::new(text, rects.iter().map(|r| RasterZone::new(1, *r)).collect()),
        )
        .with_type(ty)
    }

    fn op(attribute: &SpatialAttribute) -> Operand<'_> {
        Operand {
            attribute,
            needs_name: false,
        }
    }

    fn merge(
        options: &MergeOptions,
        a: &SpatialAttribute,
        b: &SpatialAttribute,
    ) -> MergedFields {
        let resolvers = PriorityResolvers::compile(options).unwrap();
        let policy = FieldPolicy {
            options,
            resolvers: &resolvers,
        };
        policy.merge(op(a), op(b), 1, &doc()).unwrap()
    }

    #[test]
    fn combine_types_keeps_order_without_duplicates() {
        assert_eq!(combine_types("A|B", "B|C"), "A|B|C");
        assert_eq!(combine_types("", "C"), "C");
        assert_eq!(combine_types("A", ""), "A");
        assert_eq!(combine_types("", ""), "");
    }

    #[test]
    fn union_overlapping_chains_transitively() {
        let rects = vec![
            Rect::new(0, 0, 10, 10),
            Rect::new(100, 100, 110, 110),
            Rect::new(5, 5, 20, 20),
            Rect::new(15, 15, 30, 30),
        ];
        assert_eq!(
            union_overlapping(rects),
            vec![Rect::new(0, 0, 30, 30), Rect::new(100, 100, 110, 110)]
        );
    }

    #[test]
    fn specified_fields() {
        let opts = MergeOptions {
            name_mode: MergeMode::SpecifyField,
            type_mode: MergeMode::SpecifyField,
            value_mode: MergeMode::SpecifyField,
            specified_name: "Foo".to_string(),
            specified_type: "Bar".to_string(),
            specified_value: "Baz".to_string(),
            ..MergeOptions::default()
        };
        let a = attr("x", "t1", "one", &[Rect::new(0, 0, 100, 100)]);
        let b = attr("y", "t2", "two", &[Rect::new(0, 0, 100, 100)]);
        let merged = merge(&opts, &a, &b);
        assert_eq!(merged.attribute.name, "Foo");
        assert_eq!(merged.attribute.attr_type, "Bar");
        assert_eq!(merged.attribute.value.text, "Baz");
        assert!(!merged.needs_name);
    }

    #[test]
    fn unresolved_name_is_flagged() {
        let a = attr("Left", "", "v", &[Rect::new(0, 0, 10, 10)]);
        let b = attr("Right", "", "v", &[Rect::new(0, 0, 10, 10)]);
        let merged = merge(&MergeOptions::default(), &a, &b);
        assert!(merged.needs_name);
        assert!(merged.attribute.name.is_empty());
    }

    #[test]
    fn nameless_result_takes_only_a_prioritized_name() {
        let opts = MergeOptions {
            name_priority: PriorityList::literal(["Total"]),
            ..MergeOptions::default()
        };
        let resolvers = PriorityResolvers::compile(&opts).unwrap();
        let policy = FieldPolicy {
            options: &opts,
            resolvers: &resolvers,
        };
        let rect = [Rect::new(0, 0, 10, 10)];
        let nameless = attr("", "", "v", &rect);
        let pending = Operand {
            attribute: &nameless,
            needs_name: true,
        };

        let other = attr("Subtotal", "", "v", &rect);
        let merged = policy.merge(pending, op(&other), 1, &doc()).unwrap();
        assert!(merged.needs_name);
        let merged = policy.merge(op(&other), pending, 1, &doc()).unwrap();
        assert!(merged.needs_name);

        let empty = attr("", "", "v", &rect);
        let merged = policy.merge(pending, op(&empty), 1, &doc()).unwrap();
        assert!(merged.needs_name);

        let total = attr("Total", "", "v", &rect);
        let merged = policy.merge(pending, op(&total), 1, &doc()).unwrap();
        assert!(!merged.needs_name);
        assert_eq!(merged.attribute.name, "Total");
    }

    #[test]
    fn ambiguous_value_keeps_first_and_warns() {
        let a = attr("N", "", "100", &[Rect::new(0, 0, 10, 10)]);
        let b = attr("N", "", "101", &[Rect::new(0, 0, 10, 10)]);
        let merged = merge(&MergeOptions::default(), &a, &b);
        assert_eq!(merged.attribute.value.text, "100");
        assert_eq!(merged.warnings.len(), 1);
        assert_eq!(merged.warnings[0].code, MergeWarningCode::AmbiguousValue);
    }

    #[test]
    fn select_value_follows_preserved_name() {
        let opts = MergeOptions {
            value_mode: MergeMode::SelectField,
            name_priority: PriorityList::literal(["Seller"]),
            ..MergeOptions::default()
        };
        let a = attr("Buyer", "", "Acme", &[Rect::new(0, 0, 10, 10)]);
        let b = attr("Seller", "", "Globex", &[Rect::new(0, 0, 10, 10)]);
        let merged = merge(&opts, &a, &b);
        assert_eq!(merged.attribute.name, "Seller");
        assert_eq!(merged.attribute.value.text, "Globex");
    }

    #[test]
    fn type_from_name_then_type_priority() {
        let opts = MergeOptions {
            type_mode: MergeMode::SelectField,
            type_from_name: true,
            preserve_type: true,
            type_priority: PriorityList::literal(["Date"]),
            ..MergeOptions::default()
        };
        // Names differ: the type comes from the preserved name only.
        let a = attr("Due", "Text", "v", &[Rect::new(0, 0, 10, 10)]);
        let b = attr("", "Date", "v", &[Rect::new(0, 0, 10, 10)]);
        let merged = merge(&opts, &a, &b);
        assert_eq!(merged.attribute.name, "Due");
        assert_eq!(merged.attribute.attr_type, "Text");

        // Identical names: the type priority list overrides.
        let b = attr("Due", "Date", "v", &[Rect::new(0, 0, 10, 10)]);
        let merged = merge(&opts, &a, &b);
        assert_eq!(merged.attribute.attr_type, "Date");
    }

    #[test]
    fn merged_region_is_one_clipped_zone() {
        let opts = MergeOptions {
            create_merged_region: true,
            ..MergeOptions::default()
        };
        let a = attr("N", "", "v", &[Rect::new(0, 0, 10, 10), Rect::new(50, 0, 60, 10)]);
        let b = attr("N", "", "v", &[Rect::new(990, 990, 1200, 1200)]);
        let merged = merge(&opts, &a, &b);
        assert_eq!(
            merged.attribute.value.zones,
            vec![RasterZone::new(1, Rect::new(0, 0, 1000, 1000))]
        );
    }

    #[test]
    fn zone_union_keeps_separate_lines() {
        let a = attr("N", "", "line one\nline two", &[Rect::new(0, 0, 100, 10), Rect::new(0, 20, 100, 30)]);
        let b = attr("N", "", "line one\nline two", &[Rect::new(0, 0, 90, 12), Rect::new(0, 20, 90, 32)]);
        let merged = merge(&MergeOptions::default(), &a, &b);
        let zones = &merged.attribute.value.zones;
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].rect, Rect::new(0, 0, 100, 12));
        assert_eq!(zones[1].rect, Rect::new(0, 20, 100, 32));
        assert!(merged.attribute.value.has_literal_layout());
        assert_eq!(merged.attribute.value.page_text(1), "line one\nline two");
    }

    #[test]
    fn zone_union_keeps_stored_line_order() {
        // Lines stored bottom-up: the second line sits above the first.
        let a = attr(
            "N",
            "",
            "lower\nupper",
            &[Rect::new(0, 20, 100, 30), Rect::new(0, 0, 100, 10)],
        );
        let b = attr(
            "N",
            "",
            "lower\nupper",
            &[Rect::new(0, 20, 90, 32), Rect::new(0, 0, 90, 12)],
        );
        let merged = merge(&MergeOptions::default(), &a, &b);
        let zones = &merged.attribute.value.zones;
        assert_eq!(zones[0].rect, Rect::new(0, 20, 100, 32));
        assert_eq!(zones[1].rect, Rect::new(0, 0, 100, 12));
        assert_eq!(merged.attribute.value.text, "lower\nupper");
    }

    #[test]
    fn missing_page_info_is_an_error() {
        let opts = MergeOptions::default();
        let resolvers = PriorityResolvers::compile(&opts).unwrap();
        let policy = FieldPolicy {
            options: &opts,
            resolvers: &resolvers,
        };
        let a = attr("N", "", "v", &[Rect::new(0, 0, 10, 10)]);
        let empty: BTreeMap<u32, PageInfo> = BTreeMap::new();
        let err = policy.merge(op(&a), op(&a), 1, &empty).unwrap_err();
        assert_eq!(err, MergeError::MissingPageInfo { page: 1 });
    }
}
