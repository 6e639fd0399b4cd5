//! Overlap percentage between two sets of zones on one page.

use attrmerge_core::Rect;

/// Percentage (0-100) of overlap between two zone sets.
///
/// Intersection area is summed over every zone pair, while each side's own
/// area is summed once per zone. Zones that overlap each other inside one set
/// may count their shared intersection more than once; that is not corrected.
///
/// With `mutual` the intersection is divided by the larger of the two areas,
/// so both sets must cover each other; otherwise by the smaller one.
/// Returns `0.0` if either side has no area. Areas are summed as `f64`, so
/// arbitrarily large coordinates cannot overflow.
pub fn overlap_percent(zones1: &[Rect], zones2: &[Rect], mutual: bool) -> f64 {
    let area1: f64 = zones1.iter().map(Rect::area_f64).sum();
    let area2: f64 = zones2.iter().map(Rect::area_f64).sum();
    if area1 == 0.0 || area2 == 0.0 {
        return 0.0;
    }

    let intersection: f64 = zones1
        .iter()
        .flat_map(|z1| zones2.iter().filter_map(move |z2| z1.intersection(z2)))
        .map(|r| r.area_f64())
        .sum();

    let denominator = if mutual {
        area1.max(area2)
    } else {
        area1.min(area2)
    };
    (100.0 * intersection / denominator).min(100.0)
}
