//! Groups: subsets of a drawing bound to one pen set and one producer.

use std::sync::Arc;

use crate::geometry::GroupId;
use crate::pen::{DistributionType, PenId, PenSet};

/// Descriptor of the algorithm that produced a group's geometries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Producer {
    pub name: String,
    /// The producer picks pens itself; distribution must honour its choice.
    pub preconfigured_pens: bool,
}

impl Producer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), preconfigured_pens: false }
    }

    pub fn with_preconfigured_pens(mut self, preconfigured: bool) -> Self {
        self.preconfigured_pens = preconfigured;
        self
    }
}

/// A subset of a drawing's geometries.
///
/// The group does not own geometries: `members` are positions in the
/// drawing's geometry list, in append order.
#[derive(Debug, Clone)]
pub struct Group {
    id: GroupId,
    pen_set: Arc<PenSet>,
    producer: Arc<Producer>,
    original_order: Vec<PenId>,
    members: Vec<usize>,
}

impl Group {
    pub(crate) fn new(id: GroupId, pen_set: Arc<PenSet>, producer: Arc<Producer>) -> Self {
        let original_order = pen_set.pen_ids();
        Self { id, pen_set, producer, original_order, members: Vec::new() }
    }

    /// Same id, pen set, producer and snapshot, no members.
    pub(crate) fn empty_copy(&self) -> Self {
        Self {
            id: self.id,
            pen_set: Arc::clone(&self.pen_set),
            producer: Arc::clone(&self.producer),
            original_order: self.original_order.clone(),
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: GroupId) {
        self.id = id;
    }

    pub fn pen_set(&self) -> &Arc<PenSet> {
        &self.pen_set
    }

    pub(crate) fn set_pen_set(&mut self, pen_set: Arc<PenSet>) {
        self.pen_set = pen_set;
    }

    pub fn producer(&self) -> &Arc<Producer> {
        &self.producer
    }

    pub(crate) fn set_producer(&mut self, producer: Arc<Producer>) {
        self.producer = producer;
    }

    /// Pen order of the pen set when the group was created.
    pub fn original_order(&self) -> &[PenId] {
        &self.original_order
    }

    pub(crate) fn set_original_order(&mut self, order: Vec<PenId>) {
        self.original_order = order;
    }

    /// Positions of member geometries in the owning drawing.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub(crate) fn push_member(&mut self, index: usize) {
        self.members.push(index);
    }

    pub(crate) fn clear_members(&mut self) {
        self.members.clear();
    }

    pub fn geometry_count(&self) -> usize {
        self.members.len()
    }

    pub fn pen_count(&self) -> usize {
        self.pen_set.len()
    }

    /// The policy distribution will use for this group.
    pub fn distribution_type(&self) -> DistributionType {
        if self.producer.preconfigured_pens {
            DistributionType::PreConfigured
        } else {
            self.pen_set.distribution_type
        }
    }
}

/// Decides whether an incoming group may be folded into an existing one.
pub trait MergeRule: Send + Sync {
    fn can_merge(&self, existing: &Group, incoming: &Group, for_export: bool) -> bool;
}

/// Same pen set and same producer. On export the producer check can be
/// relaxed, so everything drawn with one pen set ends up in one group.
#[derive(Debug, Clone, Copy)]
pub struct DefaultMergeRule {
    pub relax_producer_for_export: bool,
}

impl Default for DefaultMergeRule {
    fn default() -> Self {
        Self { relax_producer_for_export: true }
    }
}

impl MergeRule for DefaultMergeRule {
    fn can_merge(&self, existing: &Group, incoming: &Group, for_export: bool) -> bool {
        if existing.pen_set.id() != incoming.pen_set.id() {
            return false;
        }
        (for_export && self.relax_producer_for_export) || existing.producer == incoming.producer
    }
}

impl<F> MergeRule for F
where
    F: Fn(&Group, &Group, bool) -> bool + Send + Sync,
{
    fn can_merge(&self, existing: &Group, incoming: &Group, for_export: bool) -> bool {
        self(existing, incoming, for_export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pen::Pen;

    fn pens() -> Arc<PenSet> {
        Arc::new(PenSet::new("set", vec![Pen::new("a", 0xff000000), Pen::new("b", 0xffffffff)]))
    }

    #[test]
    fn snapshot_taken_at_creation() {
        let set = pens();
        let group = Group::new(GroupId(0), Arc::clone(&set), Arc::new(Producer::new("sketch")));
        assert_eq!(group.original_order(), set.pen_ids().as_slice());
    }

    #[test]
    fn preconfigured_producer_overrides_distribution() {
        let set = pens();
        let plain = Group::new(GroupId(0), Arc::clone(&set), Arc::new(Producer::new("sketch")));
        let fixed = Group::new(
            GroupId(1),
            set,
            Arc::new(Producer::new("svg").with_preconfigured_pens(true)),
        );
        assert_eq!(plain.distribution_type(), DistributionType::EvenWeighted);
        assert_eq!(fixed.distribution_type(), DistributionType::PreConfigured);
    }

    #[test]
    fn default_rule_relaxes_producer_on_export() {
        let set = pens();
        let a = Group::new(GroupId(0), Arc::clone(&set), Arc::new(Producer::new("sketch")));
        let b = Group::new(GroupId(1), Arc::clone(&set), Arc::new(Producer::new("squares")));
        let other = Group::new(GroupId(2), pens(), Arc::new(Producer::new("sketch")));

        let rule = DefaultMergeRule::default();
        assert!(!rule.can_merge(&a, &b, false));
        assert!(rule.can_merge(&a, &b, true));
        assert!(!rule.can_merge(&a, &other, true));

        let strict = DefaultMergeRule { relax_producer_for_export: false };
        assert!(!strict.can_merge(&a, &b, true));
    }

    #[test]
    fn closures_are_merge_rules() {
        let set = pens();
        let a = Group::new(GroupId(0), Arc::clone(&set), Arc::new(Producer::new("x")));
        let b = Group::new(GroupId(1), set, Arc::new(Producer::new("y")));
        let never = |_: &Group, _: &Group, _: bool| false;
        assert!(!never.can_merge(&a, &b, true));
    }
}
