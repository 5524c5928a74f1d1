//! Pens and pen sets.
//!
//! A [`PenSet`] is an ordered palette of [`Pen`]s plus the two policies that
//! govern it: the [`DistributionOrder`] (which pen comes first) and the
//! [`DistributionType`] (how geometries are shared between pens).
//!
//! Pen sets are edited as owned values and shared read-only as
//! `Arc<PenSet>`. Every editing method keeps each pen's `number` equal to
//! its position, so a shared set is always correctly numbered.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Default distribution weight of a pen.
pub const DEFAULT_WEIGHT: u32 = 100;

static NEXT_PEN_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_PEN_SET_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PenId(u64);

impl PenId {
    fn next() -> Self {
        PenId(NEXT_PEN_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

/// Process-unique identity of a pen set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PenSetId(u64);

impl PenSetId {
    fn next() -> Self {
        PenSetId(NEXT_PEN_SET_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

/// A drawing tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    id: PenId,
    /// Display name, also used for layer names in exports.
    pub name: String,
    /// Colour as 0xAARRGGBB.
    pub argb: u32,
    pub enabled: bool,
    /// Relative share of geometries for weighted distribution.
    pub weight: u32,
    number: usize,
}

impl Pen {
    /// Create an enabled pen with the default weight.
    pub fn new(name: impl Into<String>, argb: u32) -> Self {
        Self {
            id: PenId::next(),
            name: name.into(),
            argb,
            enabled: true,
            weight: DEFAULT_WEIGHT,
            number: 0,
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn id(&self) -> PenId {
        self.id
    }

    /// Position of the pen in its pen set.
    pub fn number(&self) -> usize {
        self.number
    }

    /// (red, green, blue) channels.
    pub fn rgb(&self) -> (u8, u8, u8) {
        (
            ((self.argb >> 16) & 0xff) as u8,
            ((self.argb >> 8) & 0xff) as u8,
            (self.argb & 0xff) as u8,
        )
    }

    /// Perceived brightness, the mean of the RGB channels (0-255).
    pub fn brightness(&self) -> u32 {
        let (r, g, b) = self.rgb();
        (r as u32 + g as u32 + b as u32) / 3
    }
}

/// Order in which a pen set's pens receive geometries.
///
/// Declaration order matters: when several orders tie for "dominant" in
/// [`crate::order::dominant_order`], the earliest declared wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DistributionOrder {
    #[default]
    DarkestFirst,
    LightestFirst,
    Displayed,
    Reversed,
}

impl DistributionOrder {
    /// All orders, in declaration order.
    pub fn all() -> &'static [DistributionOrder] {
        &[
            DistributionOrder::DarkestFirst,
            DistributionOrder::LightestFirst,
            DistributionOrder::Displayed,
            DistributionOrder::Reversed,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            DistributionOrder::DarkestFirst => "darkest-first",
            DistributionOrder::LightestFirst => "lightest-first",
            DistributionOrder::Displayed => "displayed",
            DistributionOrder::Reversed => "reversed",
        }
    }

    pub fn from_name(name: &str) -> Option<DistributionOrder> {
        match name.to_lowercase().as_str() {
            "darkest-first" | "darkest" => Some(DistributionOrder::DarkestFirst),
            "lightest-first" | "lightest" => Some(DistributionOrder::LightestFirst),
            "displayed" => Some(DistributionOrder::Displayed),
            "reversed" => Some(DistributionOrder::Reversed),
            _ => None,
        }
    }

    /// Comparator used to sort pens by this order.
    pub fn compare(&self, a: &Pen, b: &Pen) -> Ordering {
        match self {
            DistributionOrder::DarkestFirst => a.brightness().cmp(&b.brightness()),
            DistributionOrder::LightestFirst => b.brightness().cmp(&a.brightness()),
            DistributionOrder::Displayed => a.number.cmp(&b.number),
            DistributionOrder::Reversed => b.number.cmp(&a.number),
        }
    }
}

/// How a group's geometries are shared between its pens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DistributionType {
    /// Contiguous ranges sized by pen weight.
    #[default]
    EvenWeighted,
    /// Contiguous ranges of equal size.
    Even,
    /// Seeded pseudo-random choice, weighted.
    Random,
    /// The producer's own pen choice.
    PreConfigured,
    /// Everything on the first enabled pen.
    SinglePen,
}

impl DistributionType {
    pub fn all() -> &'static [DistributionType] {
        &[
            DistributionType::EvenWeighted,
            DistributionType::Even,
            DistributionType::Random,
            DistributionType::PreConfigured,
            DistributionType::SinglePen,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            DistributionType::EvenWeighted => "even-weighted",
            DistributionType::Even => "even",
            DistributionType::Random => "random",
            DistributionType::PreConfigured => "preconfigured",
            DistributionType::SinglePen => "single-pen",
        }
    }

    pub fn from_name(name: &str) -> Option<DistributionType> {
        match name.to_lowercase().as_str() {
            "even-weighted" | "weighted" => Some(DistributionType::EvenWeighted),
            "even" => Some(DistributionType::Even),
            "random" => Some(DistributionType::Random),
            "preconfigured" | "pre-configured" => Some(DistributionType::PreConfigured),
            "single-pen" | "single" => Some(DistributionType::SinglePen),
            _ => None,
        }
    }
}

/// An ordered palette of unique pens.
#[derive(Debug, Clone, PartialEq)]
pub struct PenSet {
    id: PenSetId,
    pub name: String,
    pens: Vec<Pen>,
    pub distribution_order: DistributionOrder,
    pub distribution_type: DistributionType,
}

impl PenSet {
    /// Create a pen set. Pens repeated by id are kept once.
    pub fn new(name: impl Into<String>, pens: Vec<Pen>) -> Self {
        let mut set = Self {
            id: PenSetId::next(),
            name: name.into(),
            pens: Vec::with_capacity(pens.len()),
            distribution_order: DistributionOrder::default(),
            distribution_type: DistributionType::default(),
        };
        for pen in pens {
            set.add_pen(pen);
        }
        set
    }

    pub fn with_order(mut self, order: DistributionOrder) -> Self {
        self.distribution_order = order;
        self
    }

    pub fn with_distribution(mut self, distribution: DistributionType) -> Self {
        self.distribution_type = distribution;
        self
    }

    pub fn id(&self) -> PenSetId {
        self.id
    }

    pub fn pens(&self) -> &[Pen] {
        &self.pens
    }

    pub fn pen(&self, position: usize) -> Option<&Pen> {
        self.pens.get(position)
    }

    pub fn len(&self) -> usize {
        self.pens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pens.is_empty()
    }

    /// Current position of a pen in this set.
    pub fn position_of(&self, pen: PenId) -> Option<usize> {
        self.pens.iter().position(|p| p.id == pen)
    }

    /// Pen ids in current order.
    pub fn pen_ids(&self) -> Vec<PenId> {
        self.pens.iter().map(|p| p.id).collect()
    }

    /// Append a pen. Returns false if the pen is already in the set.
    pub fn add_pen(&mut self, pen: Pen) -> bool {
        if self.position_of(pen.id).is_some() {
            return false;
        }
        self.pens.push(pen);
        self.renumber();
        true
    }

    /// Move the pen at `from` to position `to`.
    pub fn move_pen(&mut self, from: usize, to: usize) {
        if from >= self.pens.len() || to >= self.pens.len() {
            return;
        }
        let pen = self.pens.remove(from);
        self.pens.insert(to, pen);
        self.renumber();
    }

    pub fn remove_pen(&mut self, position: usize) -> Option<Pen> {
        if position >= self.pens.len() {
            return None;
        }
        let pen = self.pens.remove(position);
        self.renumber();
        Some(pen)
    }

    pub fn set_enabled(&mut self, position: usize, enabled: bool) {
        if let Some(pen) = self.pens.get_mut(position) {
            pen.enabled = enabled;
        }
    }

    pub fn set_weight(&mut self, position: usize, weight: u32) {
        if let Some(pen) = self.pens.get_mut(position) {
            pen.weight = weight;
        }
    }

    /// Set every pen back to the default weight.
    pub fn reset_weights(&mut self) {
        for pen in &mut self.pens {
            pen.weight = DEFAULT_WEIGHT;
        }
    }

    /// Add `delta` to one pen's weight, never going below zero.
    pub fn adjust_weight(&mut self, position: usize, delta: i64) {
        if let Some(pen) = self.pens.get_mut(position) {
            pen.weight = (pen.weight as i64 + delta).clamp(0, u32::MAX as i64) as u32;
        }
    }

    /// Pen positions sorted by the distribution order (stable).
    pub fn render_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.pens.len()).collect();
        order.sort_by(|&a, &b| self.distribution_order.compare(&self.pens[a], &self.pens[b]));
        order
    }

    fn renumber(&mut self) {
        for (i, pen) in self.pens.iter_mut().enumerate() {
            pen.number = i;
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
