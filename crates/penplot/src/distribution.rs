//! Pen distribution - assigning each geometry of a group to one pen.
//!
//! Every policy is a pure function of the group's member order and its pen
//! set; running it twice on the same input gives the same assignment.
//!
//! ## Policies
//!
//! - **Even weighted**: contiguous runs of geometries, pen by pen in render
//!   order, each run sized `floor(weight / total * count)`. The last enabled
//!   pen takes whatever is left so no geometry is dropped.
//! - **Even**: the same, with every enabled pen weighing 100.
//! - **Random**: a seeded draw per geometry, weighted.
//! - **Pre-configured**: the producer's pen choice, followed through any
//!   reordering of the pen set since production.
//! - **Single pen**: everything on the first enabled pen in render order.
//!
//! With no enabled pen, geometries stay unassigned (`None`).

use std::collections::HashMap;

use crate::drawing::Drawing;
use crate::geometry::Geometry;
use crate::group::Group;
use crate::pen::{DistributionType, PenId, PenSet, DEFAULT_WEIGHT};
use crate::rng::Rng;

/// Seed of the random policy. Fixed so results are reproducible.
pub const RANDOM_SEED: u64 = 0;

/// Run the group's policy over its members.
///
/// `geometries` is the owning drawing's full geometry list; only the
/// group's members are touched. Previous assignments are cleared first.
pub fn distribute(group: &Group, geometries: &mut [Geometry]) {
    let policy = group.distribution_type();
    let _span = tracing::debug_span!(
        "distribute",
        group = %group.id(),
        policy = policy.name(),
        geometries = group.geometry_count(),
    )
    .entered();

    for &member in group.members() {
        geometries[member].set_pen_index(None);
    }

    match policy {
        DistributionType::EvenWeighted => distribute_even(group, geometries, true),
        DistributionType::Even => distribute_even(group, geometries, false),
        DistributionType::Random => distribute_random(group, geometries),
        DistributionType::PreConfigured => distribute_preconfigured(group, geometries),
        DistributionType::SinglePen => distribute_single_pen(group, geometries),
    }
}

/// Weight of each pen position, 0 for disabled pens.
fn effective_weights(pen_set: &PenSet, weighted: bool) -> Vec<u64> {
    pen_set
        .pens()
        .iter()
        .map(|pen| match (pen.enabled, weighted) {
            (false, _) => 0,
            (true, true) => pen.weight as u64,
            (true, false) => DEFAULT_WEIGHT as u64,
        })
        .collect()
}

/// Contiguous runs in render order, sized by weight.
pub fn distribute_even(group: &Group, geometries: &mut [Geometry], weighted: bool) {
    let pen_set = group.pen_set();
    let weights = effective_weights(pen_set, weighted);
    let total: u64 = weights.iter().sum();
    let order = pen_set.render_order();

    let Some(last_enabled) = order.iter().rposition(|&p| pen_set.pens()[p].enabled) else {
        tracing::debug!(group = %group.id(), "no enabled pens, geometries left unassigned");
        return;
    };

    let members = group.members();
    let count = members.len();
    let mut current = 0;

    for (i, &position) in order.iter().enumerate() {
        if !pen_set.pens()[position].enabled {
            continue;
        }
        let end = if i == last_enabled {
            count
        } else if total == 0 {
            current
        } else {
            // Integer floor of weight / total * count.
            let share = (weights[position] * count as u64 / total) as usize;
            (current + share).min(count)
        };
        for &member in &members[current..end] {
            geometries[member].set_pen_index(Some(position));
        }
        current = end;
    }
}

/// Seeded weighted draw per geometry, in append order.
pub fn distribute_random(group: &Group, geometries: &mut [Geometry]) {
    let weights = effective_weights(group.pen_set(), true);
    let total: u64 = weights.iter().sum();
    if total == 0 {
        tracing::debug!(group = %group.id(), "no pen weight, geometries left unassigned");
        return;
    }
    let bound = total.min(i32::MAX as u64) as u32;

    let mut rng = Rng::new(RANDOM_SEED);
    for &member in group.members() {
        let draw = rng.next_below(bound) as u64;
        let mut cumulative = 0;
        for (position, weight) in weights.iter().enumerate() {
            cumulative += weight;
            if draw < cumulative {
                geometries[member].set_pen_index(Some(position));
                break;
            }
        }
    }
}

/// Map each geometry's producer-time pen to that pen's current position.
///
/// A pen removed from the set since production leaves its geometries
/// unassigned.
pub fn distribute_preconfigured(group: &Group, geometries: &mut [Geometry]) {
    let pen_set = group.pen_set();
    for &member in group.members() {
        let original = geometries[member].original_pen_index();
        let current = group
            .original_order()
            .get(original)
            .and_then(|&pen| pen_set.position_of(pen));
        geometries[member].set_pen_index(current);
    }
}

/// Everything on the first enabled pen in render order.
pub fn distribute_single_pen(group: &Group, geometries: &mut [Geometry]) {
    let pen_set = group.pen_set();
    let Some(position) = pen_set.render_order().into_iter().find(|&p| pen_set.pens()[p].enabled) else {
        tracing::debug!(group = %group.id(), "no enabled pens, geometries left unassigned");
        return;
    };
    for &member in group.members() {
        geometries[member].set_pen_index(Some(position));
    }
}

/// Geometry count of one pen across every group of a drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct PenStats {
    pub pen: PenId,
    pub name: String,
    pub geometries: usize,
    /// Share of all the drawing's geometries, 0-100.
    pub percentage: f64,
}

/// Tally assigned geometries per unique pen.
///
/// Pens are listed in first-seen order (groups by id, pens by position).
/// Unassigned geometries are not counted anywhere.
pub fn per_pen_stats(drawing: &Drawing) -> Vec<PenStats> {
    let mut stats: Vec<PenStats> = Vec::new();
    let mut slots: HashMap<PenId, usize> = HashMap::new();

    for group in drawing.groups() {
        for pen in group.pen_set().pens() {
            slots.entry(pen.id()).or_insert_with(|| {
                stats.push(PenStats { pen: pen.id(), name: pen.name.clone(), geometries: 0, percentage: 0.0 });
                stats.len() - 1
            });
        }
    }

    for geometry in drawing.geometries() {
        let Some(position) = geometry.pen_index() else { continue };
        let group = drawing.group_of(geometry);
        if let Some(slot) = group.pen_set().pen(position).and_then(|pen| slots.get(&pen.id())) {
            stats[*slot].geometries += 1;
        }
    }

    let total = drawing.geometry_count();
    if total > 0 {
        for entry in &mut stats {
            entry.percentage = entry.geometries as f64 / total as f64 * 100.0;
        }
    }
    stats
}

// ============================================================================
// TESTS
// ============================================================================
