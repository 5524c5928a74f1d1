//! Pen ordering across a whole drawing.
//!
//! Each pen set orders its own pens; these functions combine the pen sets
//! of every group into one sequence.
//!
//! ## Orders
//!
//! - **Display order**: what a pen list panel shows. Pen sets in the
//!   caller's slot order, each contributing its pens as stored.
//! - **Render order**: what the plotter draws and the exporter writes.
//!   Every unique pen, sorted by the drawing's dominant
//!   [`DistributionOrder`], then reversed.

use std::collections::HashSet;

use crate::drawing::Drawing;
use crate::pen::{DistributionOrder, Pen, PenId, PenSet, PenSetId};

/// Distinct pen sets of the drawing's groups, first seen first.
fn distinct_pen_sets(drawing: &Drawing) -> Vec<&PenSet> {
    let mut seen = HashSet::new();
    drawing
        .groups()
        .map(|group| group.pen_set().as_ref())
        .filter(|set| seen.insert(set.id()))
        .collect()
}

/// Pens of every distinct pen set, pen sets ordered by their position in
/// `slots`.
///
/// A pen set missing from `slots` sorts before all listed ones; ties keep
/// first-seen order.
pub fn global_display_order<'a>(drawing: &'a Drawing, slots: &[PenSetId]) -> Vec<&'a Pen> {
    let mut sets = distinct_pen_sets(drawing);
    sets.sort_by_key(|set| slots.iter().position(|slot| *slot == set.id()).map_or(-1, |p| p as i64));
    sets.into_iter().flat_map(|set| set.pens()).collect()
}

/// The distribution order used by the most distinct pen sets.
///
/// Ties go to the order declared first in [`DistributionOrder`]. An empty
/// drawing (impossible in practice, the default group always exists) gets
/// the default order.
pub fn dominant_order(drawing: &Drawing) -> DistributionOrder {
    let sets = distinct_pen_sets(drawing);
    let mut best = DistributionOrder::default();
    let mut best_count = 0;
    for order in DistributionOrder::all() {
        let count = sets.iter().filter(|set| set.distribution_order == *order).count();
        if count > best_count {
            best = *order;
            best_count = count;
        }
    }
    best
}

/// Every unique pen of the drawing in plotting order.
///
/// Pens are collected in first-seen order, stably sorted by the dominant
/// order's comparator, and the sorted list is then reversed. With
/// `DarkestFirst` dominant the lightest pen is therefore plotted first.
pub fn global_render_order(drawing: &Drawing) -> Vec<&Pen> {
    let mut seen: HashSet<PenId> = HashSet::new();
    let mut pens: Vec<&Pen> = distinct_pen_sets(drawing)
        .into_iter()
        .flat_map(|set| set.pens())
        .filter(|pen| seen.insert(pen.id()))
        .collect();

    let order = dominant_order(drawing);
    pens.sort_by(|a, b| order.compare(a, b));
    pens.reverse();
    pens
}

// ============================================================================
// TESTS
// ============================================================================
