//! The drawing: every geometry of a plot, partitioned into groups.
//!
//! ## Invariants
//!
//! - `geometries[i].index() == Some(i)`.
//! - Every geometry's group id names a live group, and each geometry index
//!   appears in exactly one group's member list.
//! - The default group always exists.
//!
//! ## Rust Lesson #12: Interior mutability
//!
//! Production runs on a background thread while the UI reads the drawing.
//! [`SharedDrawing`] wraps the drawing in `Arc<RwLock<..>>`: the `Arc` lets
//! both threads own a handle, the `RwLock` lets many readers in at once but
//! only one writer. Everything else takes `&mut Drawing`, so the borrow
//! checker proves nobody else is looking while groups are merged or pens
//! are distributed.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::distribution::{self, PenStats};
use crate::events::{DrawingEvent, DrawingObserver};
use crate::geometry::{Geometry, GroupId};
use crate::group::{DefaultMergeRule, Group, MergeRule, Producer};
use crate::pen::PenSet;

/// All geometries of a plot and the groups they belong to.
pub struct Drawing {
    geometries: Vec<Geometry>,
    groups: BTreeMap<GroupId, Group>,
    default_group: GroupId,
    vertex_count: u64,
    displayed_min: Option<usize>,
    displayed_max: Option<usize>,
    next_group_id: u32,
    /// Skip [`Drawing::update_pen_distribution`]; sub-tasks keep the
    /// producer's own assignment.
    pub ignore_weighted_distribution: bool,
    merge_rule: Arc<dyn MergeRule>,
    observers: Vec<Arc<dyn DrawingObserver>>,
}

/// A group taken out of a drawing together with its geometries.
///
/// Produced by [`Drawing::into_groups`] and consumed by
/// [`Drawing::merge_group`]; the source drawing no longer exists.
#[derive(Debug)]
pub struct DetachedGroup {
    pub group: Group,
    pub geometries: Vec<Geometry>,
}

impl Drawing {
    /// Create an empty drawing whose default group uses `pen_set`.
    pub fn new(pen_set: Arc<PenSet>, producer: Arc<Producer>) -> Self {
        let mut drawing = Self {
            geometries: Vec::new(),
            groups: BTreeMap::new(),
            default_group: GroupId(0),
            vertex_count: 0,
            displayed_min: None,
            displayed_max: None,
            next_group_id: 0,
            ignore_weighted_distribution: false,
            merge_rule: Arc::new(DefaultMergeRule::default()),
            observers: Vec::new(),
        };
        drawing.default_group = drawing.create_group(pen_set, producer);
        drawing
    }

    /// Replace the rule used by [`Drawing::merge_group`] to find a
    /// compatible group.
    pub fn with_merge_rule(mut self, rule: impl MergeRule + 'static) -> Self {
        self.merge_rule = Arc::new(rule);
        self
    }

    pub fn add_observer(&mut self, observer: Arc<dyn DrawingObserver>) {
        self.observers.push(observer);
    }

    fn emit(&self, event: DrawingEvent) {
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }

    // ------------------------------------------------------------------
    // Geometries
    // ------------------------------------------------------------------

    /// Append a geometry, returning its index.
    ///
    /// The geometry joins the group it names, or the default group when it
    /// names none or an unknown one.
    pub fn append(&mut self, mut geometry: Geometry) -> usize {
        let index = self.geometries.len();
        let group_id = self.group(geometry.group_id().unwrap_or(self.default_group)).id();

        geometry.set_index(index);
        geometry.set_group_id(group_id);
        self.vertex_count += geometry.vertex_count() as u64;
        self.geometries.push(geometry);

        if let Some(group) = self.groups.get_mut(&group_id) {
            group.push_member(index);
        }
        index
    }

    /// Append a geometry to a specific group.
    pub fn append_to(&mut self, mut geometry: Geometry, group_id: GroupId) -> usize {
        geometry.set_group_id(group_id);
        self.append(geometry)
    }

    pub fn append_all(&mut self, geometries: impl IntoIterator<Item = Geometry>) {
        for geometry in geometries {
            self.append(geometry);
        }
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn geometry(&self, index: usize) -> Option<&Geometry> {
        self.geometries.get(index)
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn vertex_count(&self) -> u64 {
        self.vertex_count
    }

    /// Remove every geometry. Groups and pen sets stay, empty.
    pub fn clear_geometries(&mut self) {
        self.geometries.clear();
        self.vertex_count = 0;
        for group in self.groups.values_mut() {
            group.clear_members();
        }
        self.emit(DrawingEvent::GeometriesCleared);
    }

    /// Clear geometries and the displayed range.
    pub fn reset(&mut self) {
        self.clear_geometries();
        self.displayed_min = None;
        self.displayed_max = None;
    }

    // ------------------------------------------------------------------
    // Displayed range
    // ------------------------------------------------------------------

    pub fn set_displayed_range(&mut self, min: Option<usize>, max: Option<usize>) {
        self.displayed_min = min;
        self.displayed_max = max;
    }

    /// First displayed geometry, 0 when unset.
    pub fn displayed_min(&self) -> usize {
        self.displayed_min.unwrap_or(0)
    }

    /// One past the last displayed geometry, the geometry count when unset.
    pub fn displayed_max(&self) -> usize {
        self.displayed_max.unwrap_or(self.geometries.len())
    }

    /// Geometries inside the displayed range, clamped to what exists.
    pub fn displayed_geometries(&self) -> &[Geometry] {
        let max = self.displayed_max().min(self.geometries.len());
        let min = self.displayed_min().min(max);
        &self.geometries[min..max]
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    /// Smallest free id at or above the counter.
    fn allocate_group_id(&mut self) -> GroupId {
        loop {
            let id = GroupId(self.next_group_id);
            self.next_group_id += 1;
            if !self.groups.contains_key(&id) {
                return id;
            }
        }
    }

    /// Register a new, empty group.
    pub fn create_group(&mut self, pen_set: Arc<PenSet>, producer: Arc<Producer>) -> GroupId {
        let id = self.allocate_group_id();
        tracing::debug!(group = %id, producer = %producer.name, pen_set = %pen_set.name, "group created");
        self.groups.insert(id, Group::new(id, pen_set, producer));
        self.emit(DrawingEvent::GroupCreated(id));
        id
    }

    pub fn default_group(&self) -> &Group {
        &self.groups[&self.default_group]
    }

    /// The group with this id, or the default group if there is none.
    pub fn group(&self, id: GroupId) -> &Group {
        self.groups.get(&id).unwrap_or_else(|| self.default_group())
    }

    /// The group a geometry belongs to.
    pub fn group_of(&self, geometry: &Geometry) -> &Group {
        self.group(geometry.group_id().unwrap_or(self.default_group))
    }

    /// Groups in ascending id order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn contains_group(&self, id: GroupId) -> bool {
        self.groups.contains_key(&id)
    }

    /// Replace a group's producer descriptor.
    pub fn set_group_producer(&mut self, id: GroupId, producer: Arc<Producer>) -> bool {
        match self.groups.get_mut(&id) {
            Some(group) => {
                group.set_producer(producer);
                true
            }
            None => false,
        }
    }

    /// Swap in an edited pen set for every group using a set with the same
    /// id. Returns how many groups were updated.
    pub fn replace_pen_set(&mut self, pen_set: Arc<PenSet>) -> usize {
        let mut updated = 0;
        for group in self.groups.values_mut() {
            if group.pen_set().id() == pen_set.id() {
                group.set_pen_set(Arc::clone(&pen_set));
                updated += 1;
            }
        }
        updated
    }

    /// First existing group the merge rule accepts for `incoming`.
    pub fn matching_group(&self, incoming: &Group, for_export: bool) -> Option<GroupId> {
        self.groups
            .values()
            .find(|existing| self.merge_rule.can_merge(existing, incoming, for_export))
            .map(Group::id)
    }

    /// Renumber groups 0..n in the given order.
    ///
    /// Unknown or repeated ids in `order` are ignored; groups not listed
    /// keep their relative order and are numbered after the listed ones.
    pub fn reorder_groups(&mut self, order: &[GroupId]) {
        let mut sequence: Vec<GroupId> = Vec::with_capacity(self.groups.len());
        for id in order {
            if self.groups.contains_key(id) && !sequence.contains(id) {
                sequence.push(*id);
            }
        }
        for id in self.groups.keys() {
            if !sequence.contains(id) {
                sequence.push(*id);
            }
        }

        let mut old = std::mem::take(&mut self.groups);
        let mut default_group = self.default_group;
        for (position, old_id) in sequence.into_iter().enumerate() {
            let Some(mut group) = old.remove(&old_id) else { continue };
            let new_id = GroupId(position as u32);
            if old_id != new_id {
                group.set_id(new_id);
                for &member in group.members() {
                    self.geometries[member].set_group_id(new_id);
                }
            }
            if old_id == self.default_group {
                default_group = new_id;
            }
            self.groups.insert(new_id, group);
        }
        self.default_group = default_group;
        self.next_group_id = self.groups.len() as u32;
        self.emit(DrawingEvent::GroupsReordered);
    }

    /// Fold a detached group into this drawing.
    ///
    /// With `simplify`, the first compatible existing group receives the
    /// geometries; otherwise (or when none matches) a new group is created
    /// with the source's pen set, producer and original pen order.
    pub fn merge_group(&mut self, source: DetachedGroup, simplify: bool, for_export: bool) -> GroupId {
        let DetachedGroup { group, geometries } = source;
        let _span = tracing::debug_span!("merge_group", source = %group.id(), count = geometries.len()).entered();

        let matching = if simplify { self.matching_group(&group, for_export) } else { None };
        let target = match matching {
            Some(id) => id,
            None => {
                let id = self.create_group(Arc::clone(group.pen_set()), Arc::clone(group.producer()));
                if let Some(created) = self.groups.get_mut(&id) {
                    created.set_original_order(group.original_order().to_vec());
                }
                id
            }
        };

        let count = geometries.len();
        for mut geometry in geometries {
            geometry.clear_index();
            self.append_to(geometry, target);
        }
        tracing::debug!(target = %target, count, merged = matching.is_some(), "group merged");
        self.emit(DrawingEvent::GroupMerged { target, count });
        target
    }

    /// Merge every group of another drawing, in its group id order.
    pub fn merge_drawing(&mut self, other: Drawing, simplify: bool, for_export: bool) {
        for detached in other.into_groups() {
            self.merge_group(detached, simplify, for_export);
        }
    }

    /// Split the drawing into its groups, each with its own geometries in
    /// append order.
    pub fn into_groups(self) -> Vec<DetachedGroup> {
        let mut slots: Vec<Option<Geometry>> = self.geometries.into_iter().map(Some).collect();
        self.groups
            .into_values()
            .map(|group| {
                let geometries = group.members().iter().filter_map(|&i| slots[i].take()).collect();
                DetachedGroup { group: group.empty_copy(), geometries }
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Copies
    // ------------------------------------------------------------------

    /// A drawing with the same groups and pen sets but no geometries.
    pub fn copy_base(&self) -> Drawing {
        Drawing {
            geometries: Vec::new(),
            groups: self.groups.iter().map(|(id, group)| (*id, group.empty_copy())).collect(),
            default_group: self.default_group,
            vertex_count: 0,
            displayed_min: None,
            displayed_max: None,
            next_group_id: self.next_group_id,
            ignore_weighted_distribution: self.ignore_weighted_distribution,
            merge_rule: Arc::clone(&self.merge_rule),
            observers: Vec::new(),
        }
    }

    /// [`Drawing::copy_base`] plus a copy of every geometry.
    pub fn copy_all(&self) -> Drawing {
        let mut copy = self.copy_base();
        for geometry in &self.geometries {
            copy.append(geometry.copy_geometry());
        }
        copy
    }

    // ------------------------------------------------------------------
    // Distribution
    // ------------------------------------------------------------------

    /// Run each group's distribution policy.
    ///
    /// Must not overlap with production: take the drawing out of its
    /// [`SharedDrawing`] (or hold the write lock) first.
    pub fn update_pen_distribution(&mut self) {
        if self.ignore_weighted_distribution {
            return;
        }
        for group in self.groups.values() {
            distribution::distribute(group, &mut self.geometries);
        }
        self.emit(DrawingEvent::DistributionUpdated);
    }

    /// Geometry count per unique pen, see [`distribution::per_pen_stats`].
    pub fn pen_stats(&self) -> Vec<PenStats> {
        distribution::per_pen_stats(self)
    }
}

impl fmt::Debug for Drawing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Drawing")
            .field("geometries", &self.geometries.len())
            .field("groups", &self.groups.keys().collect::<Vec<_>>())
            .field("default_group", &self.default_group)
            .field("vertex_count", &self.vertex_count)
            .finish_non_exhaustive()
    }
}

/// A drawing shared between one producer and any number of readers.
///
/// Appends and group creation lock internally. Readers may see a drawing
/// that is still growing but never a half-applied append.
#[derive(Clone)]
pub struct SharedDrawing {
    inner: Arc<RwLock<Drawing>>,
}

impl SharedDrawing {
    pub fn new(drawing: Drawing) -> Self {
        Self { inner: Arc::new(RwLock::new(drawing)) }
    }

    pub fn append(&self, geometry: Geometry) -> usize {
        self.write().append(geometry)
    }

    pub fn append_to(&self, geometry: Geometry, group_id: GroupId) -> usize {
        self.write().append_to(geometry, group_id)
    }

    pub fn create_group(&self, pen_set: Arc<PenSet>, producer: Arc<Producer>) -> GroupId {
        self.write().create_group(pen_set, producer)
    }

    pub fn geometry_count(&self) -> usize {
        self.read().geometry_count()
    }

    /// Shared read access, e.g. for previews during production.
    pub fn read(&self) -> RwLockReadGuard<'_, Drawing> {
        // A panicking producer leaves a consistent drawing behind: every
        // append finishes its bookkeeping before it can panic.
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Drawing> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take the drawing back once every other handle is gone.
    pub fn into_inner(self) -> Result<Drawing, SharedDrawing> {
        match Arc::try_unwrap(self.inner) {
            Ok(lock) => Ok(lock.into_inner().unwrap_or_else(PoisonError::into_inner)),
            Err(inner) => Err(SharedDrawing { inner }),
        }
    }
}

impl fmt::Debug for SharedDrawing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedDrawing").field("geometries", &self.geometry_count()).finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Path, Point};
    use crate::pen::Pen;
    use std::sync::Mutex;
    use std::thread;

    fn pen_set() -> Arc<PenSet> {
        Arc::new(PenSet::new("set", vec![Pen::new("black", 0xff000000), Pen::new("red", 0xffff0000)]))
    }

    fn producer(name: &str) -> Arc<Producer> {
        Arc::new(Producer::new(name))
    }

    fn shape(vertices: usize) -> Geometry {
        let points: Vec<Point> = (0..vertices).map(|i| Point::new(i as f64, 0.0)).collect();
        Geometry::new(Path::from_polyline(&points, false), 0)
    }

    fn assert_partition(drawing: &Drawing) {
        let mut seen = vec![0usize; drawing.geometry_count()];
        for group in drawing.groups() {
            for &member in group.members() {
                seen[member] += 1;
                assert_eq!(drawing.geometries()[member].group_id(), Some(group.id()));
            }
        }
        assert!(seen.iter().all(|&n| n == 1), "membership {:?}", seen);
        for (i, geometry) in drawing.geometries().iter().enumerate() {
            assert_eq!(geometry.index(), Some(i));
        }
    }

    #[test]
    fn append_assigns_index_and_counts_vertices() {
        let mut drawing = Drawing::new(pen_set(), producer("sketch"));
        assert_eq!(drawing.append(shape(3)), 0);
        assert_eq!(drawing.append(shape(4)), 1);
        assert_eq!(drawing.vertex_count(), 7);
        assert_eq!(drawing.default_group().members(), &[0, 1]);
        assert_partition(&drawing);
    }

    #[test]
    fn appending_a_clone_renumbers_it() {
        let mut drawing = Drawing::new(pen_set(), producer("sketch"));
        drawing.append(shape(3));
        let again = drawing.geometries()[0].clone();
        assert_eq!(drawing.append(again), 1);
        assert_eq!(drawing.vertex_count(), 6);
        assert_partition(&drawing);
    }

    #[test]
    fn unknown_group_falls_back_to_default() {
        let mut drawing = Drawing::new(pen_set(), producer("sketch"));
        drawing.append(shape(2).with_group(GroupId(42)));
        assert_eq!(drawing.group(GroupId(42)).id(), drawing.default_group().id());
        assert_eq!(drawing.geometries()[0].group_id(), Some(GroupId(0)));
        assert_partition(&drawing);
    }

    #[test]
    fn group_ids_probe_past_used_ids() {
        let mut drawing = Drawing::new(pen_set(), producer("a"));
        let b = drawing.create_group(pen_set(), producer("b"));
        let c = drawing.create_group(pen_set(), producer("c"));
        assert_eq!((drawing.default_group().id(), b, c), (GroupId(0), GroupId(1), GroupId(2)));

        // Reorder resets the counter to the group count; ids stay unique.
        drawing.reorder_groups(&[c, b]);
        let d = drawing.create_group(pen_set(), producer("d"));
        assert_eq!(d, GroupId(3));
        assert_eq!(drawing.group_count(), 4);
    }

    #[test]
    fn reorder_rewrites_geometry_group_ids() {
        let mut drawing = Drawing::new(pen_set(), producer("a"));
        let second = drawing.create_group(pen_set(), producer("b"));
        drawing.append(shape(2));
        drawing.append_to(shape(2), second);

        drawing.reorder_groups(&[second]);
        assert_eq!(drawing.group(GroupId(0)).producer().name, "b");
        assert_eq!(drawing.group(GroupId(1)).producer().name, "a");
        assert_eq!(drawing.default_group().id(), GroupId(1));
        assert_eq!(drawing.geometries()[1].group_id(), Some(GroupId(0)));
        assert_partition(&drawing);
    }

    #[test]
    fn simplified_merge_keeps_counts() {
        let set = pen_set();
        let mut target = Drawing::new(Arc::clone(&set), producer("sketch"));
        target.append(shape(3));

        let mut source = Drawing::new(Arc::clone(&set), producer("sketch"));
        source.append(shape(2));
        source.append(shape(5));

        target.merge_drawing(source, true, false);
        assert_eq!(target.group_count(), 1);
        assert_eq!(target.geometry_count(), 3);
        assert_eq!(target.vertex_count(), 10);
        assert_partition(&target);
    }

    #[test]
    fn incompatible_merge_creates_group() {
        let mut target = Drawing::new(pen_set(), producer("sketch"));
        let mut source = Drawing::new(pen_set(), producer("sketch"));
        source.append(shape(2));

        target.merge_drawing(source, true, false);
        assert_eq!(target.group_count(), 2);
        assert_eq!(target.geometries()[0].group_id(), Some(GroupId(1)));
        assert_partition(&target);
    }

    #[test]
    fn merge_without_simplify_always_creates_group() {
        let set = pen_set();
        let mut target = Drawing::new(Arc::clone(&set), producer("sketch"));
        let mut source = Drawing::new(Arc::clone(&set), producer("sketch"));
        source.append(shape(2));

        target.merge_drawing(source, false, false);
        assert_eq!(target.group_count(), 2);
    }

    #[test]
    fn export_merge_ignores_producer() {
        let set = pen_set();
        let mut target = Drawing::new(Arc::clone(&set), producer("sketch"));
        let mut source = Drawing::new(Arc::clone(&set), producer("squares"));
        source.append(shape(2));

        target.merge_drawing(source, true, true);
        assert_eq!(target.group_count(), 1);

        let mut strict = Drawing::new(Arc::clone(&set), producer("sketch"))
            .with_merge_rule(DefaultMergeRule { relax_producer_for_export: false });
        let mut source = Drawing::new(set, producer("squares"));
        source.append(shape(2));
        strict.merge_drawing(source, true, true);
        assert_eq!(strict.group_count(), 2);
    }

    #[test]
    fn copies() {
        let mut drawing = Drawing::new(pen_set(), producer("a"));
        let other = drawing.create_group(pen_set(), producer("b"));
        drawing.append(shape(2));
        drawing.append_to(shape(3), other);

        let base = drawing.copy_base();
        assert_eq!(base.group_count(), 2);
        assert_eq!(base.geometry_count(), 0);
        assert_eq!(base.default_group().id(), drawing.default_group().id());

        let all = drawing.copy_all();
        assert_eq!(all.geometry_count(), 2);
        assert_eq!(all.vertex_count(), 5);
        assert_eq!(all.group(other).members(), &[1]);
        assert_partition(&all);
    }

    #[test]
    fn reset_keeps_groups() {
        let mut drawing = Drawing::new(pen_set(), producer("a"));
        drawing.append(shape(2));
        drawing.set_displayed_range(Some(0), Some(1));
        drawing.reset();

        assert_eq!(drawing.geometry_count(), 0);
        assert_eq!(drawing.vertex_count(), 0);
        assert_eq!(drawing.group_count(), 1);
        assert!(drawing.default_group().members().is_empty());
        assert_eq!(drawing.displayed_max(), 0);
    }

    #[test]
    fn displayed_range_defaults_and_clamps() {
        let mut drawing = Drawing::new(pen_set(), producer("a"));
        for _ in 0..5 {
            drawing.append(shape(2));
        }
        assert_eq!((drawing.displayed_min(), drawing.displayed_max()), (0, 5));
        drawing.set_displayed_range(Some(1), Some(3));
        assert_eq!(drawing.displayed_geometries().len(), 2);
        drawing.set_displayed_range(Some(4), Some(99));
        assert_eq!(drawing.displayed_geometries().len(), 1);
    }

    #[test]
    fn replace_pen_set_updates_sharing_groups() {
        let set = pen_set();
        let mut drawing = Drawing::new(Arc::clone(&set), producer("a"));
        drawing.create_group(Arc::clone(&set), producer("b"));
        drawing.create_group(pen_set(), producer("c"));

        let mut edited = (*set).clone();
        edited.move_pen(0, 1);
        assert_eq!(drawing.replace_pen_set(Arc::new(edited)), 2);
        assert_eq!(drawing.default_group().pen_set().pens()[0].name, "red");
    }

    #[test]
    fn observers_see_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let mut drawing = Drawing::new(pen_set(), producer("a"));
        drawing.add_observer(Arc::new(move |event: &DrawingEvent| {
            sink.lock().unwrap().push(event.clone());
        }));

        let id = drawing.create_group(pen_set(), producer("b"));
        drawing.update_pen_distribution();
        drawing.clear_geometries();

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                DrawingEvent::GroupCreated(id),
                DrawingEvent::DistributionUpdated,
                DrawingEvent::GeometriesCleared,
            ]
        );
    }

    #[test]
    fn shared_drawing_single_producer_many_readers() {
        let shared = SharedDrawing::new(Drawing::new(pen_set(), producer("a")));

        let producer_handle = {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    shared.append(shape(i % 4 + 1));
                }
            })
        };
        let reader_handle = {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    let drawing = shared.read();
                    assert_eq!(drawing.default_group().members().len(), drawing.geometry_count());
                }
            })
        };
        producer_handle.join().unwrap();
        reader_handle.join().unwrap();

        let drawing = shared.into_inner().ok().expect("no other handles");
        assert_eq!(drawing.geometry_count(), 200);
        assert_partition(&drawing);
    }
}
