//! Core geometry types for penplot.
//!
//! A [`Geometry`] is one plottable shape: a vector [`Path`] plus the
//! bookkeeping the drawing needs (append index, owning group, assigned pen).
//!
//! ## Rust Lesson #3: Newtypes
//!
//! `GroupId(u32)` is a "newtype" - a struct wrapping one value. It costs
//! nothing at runtime, but the compiler now refuses to mix a group id up
//! with a pen index or a geometry index, even though all three are integers.

use std::fmt;

/// A 2D point with x,y coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One drawing command of a vector path.
///
/// Coordinates are absolute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { ctrl: Point, to: Point },
    CubicTo { ctrl1: Point, ctrl2: Point, to: Point },
    /// Closes the current subpath back to its last `MoveTo`.
    Close,
}

impl PathSegment {
    /// The point the pen ends on, if the segment has one.
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => Some(p),
            PathSegment::QuadTo { to, .. } | PathSegment::CubicTo { to, .. } => Some(to),
            PathSegment::Close => None,
        }
    }
}

/// A vector path: an ordered list of segments, possibly several subpaths.
///
/// The drawing core never looks inside a path except to count vertices and
/// to hand the segments to the exporter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an open or closed polyline.
    pub fn from_polyline(points: &[Point], closed: bool) -> Self {
        let mut path = Path::new();
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            path.move_to(*first);
            for p in iter {
                path.line_to(*p);
            }
            if closed {
                path.close();
            }
        }
        path
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.segments.push(PathSegment::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.segments.push(PathSegment::LineTo(p));
        self
    }

    pub fn quad_to(&mut self, ctrl: Point, to: Point) -> &mut Self {
        self.segments.push(PathSegment::QuadTo { ctrl, to });
        self
    }

    pub fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) -> &mut Self {
        self.segments.push(PathSegment::CubicTo { ctrl1, ctrl2, to });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.segments.push(PathSegment::Close);
        self
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of on-curve vertices (control points are not counted).
    pub fn vertex_count(&self) -> usize {
        self.segments.iter().filter(|s| s.end_point().is_some()).count()
    }
}

/// Identifier of a [`crate::Group`] within one drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GroupId(pub u32);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single plottable shape.
///
/// Created by a producer, appended to a drawing exactly once, and from then
/// on only its group and pen assignment ever change.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    index: Option<usize>,
    group_id: Option<GroupId>,
    pen_index: Option<usize>,
    original_pen_index: usize,
    vertex_count: usize,
    path: Path,
}

impl Geometry {
    /// Create a geometry for the default group.
    ///
    /// `original_pen_index` is the pen the producer intended, as a position
    /// in the pen set at production time.
    pub fn new(path: Path, original_pen_index: usize) -> Self {
        Self {
            index: None,
            group_id: None,
            vertex_count: path.vertex_count(),
            pen_index: None,
            original_pen_index,
            path,
        }
    }

    /// Target a specific group when appended with [`crate::Drawing::append`].
    pub fn with_group(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// Position in the drawing's geometry list, `None` until appended.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Appending always hands out a fresh index, so a clone of an appended
    /// geometry is simply renumbered.
    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = Some(index);
    }

    pub(crate) fn clear_index(&mut self) {
        self.index = None;
    }

    /// Owning group. Always `Some` once appended; before that, `None`
    /// means "the drawing's default group".
    pub fn group_id(&self) -> Option<GroupId> {
        self.group_id
    }

    pub(crate) fn set_group_id(&mut self, group_id: GroupId) {
        self.group_id = Some(group_id);
    }

    /// Assigned pen position within the group's pen set.
    ///
    /// `None` means unassigned: no distribution has run, or no pen was
    /// enabled when it did.
    pub fn pen_index(&self) -> Option<usize> {
        self.pen_index
    }

    pub fn set_pen_index(&mut self, pen_index: Option<usize>) {
        self.pen_index = pen_index;
    }

    pub fn original_pen_index(&self) -> usize {
        self.original_pen_index
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy the shape, its group and pen assignment; the copy has no append
    /// index until it is appended somewhere.
    pub fn copy_geometry(&self) -> Geometry {
        Geometry {
            index: None,
            group_id: self.group_id,
            pen_index: self.pen_index,
            original_pen_index: self.original_pen_index,
            vertex_count: self.vertex_count,
            path: self.path.clone(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
