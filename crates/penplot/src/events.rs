//! Typed notifications for drawing lifecycle events.
//!
//! Observers are handed to a [`crate::Drawing`] explicitly with
//! [`crate::Drawing::add_observer`]; there is no global registry.

use crate::geometry::GroupId;

/// Something structural happened to a drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawingEvent {
    GroupCreated(GroupId),
    GroupsReordered,
    /// `count` geometries were re-homed into `target`.
    GroupMerged { target: GroupId, count: usize },
    DistributionUpdated,
    GeometriesCleared,
}

/// Receives [`DrawingEvent`]s.
///
/// Called synchronously on the thread that mutated the drawing, so
/// implementations should be quick and must not call back into it.
pub trait DrawingObserver: Send + Sync {
    fn on_event(&self, event: &DrawingEvent);
}

impl<F> DrawingObserver for F
where
    F: Fn(&DrawingEvent) + Send + Sync,
{
    fn on_event(&self, event: &DrawingEvent) {
        self(event)
    }
}
