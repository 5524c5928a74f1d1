//! Image space to plotter space.
//!
//! Drawing coordinates are in scaled canvas units with y pointing down.
//! The plotter wants millimetres with y pointing up, shifted by the
//! configured offsets, optionally mirrored or centred on the origin.
//!
//! ## Composition order
//!
//! The transform is built as a chain of `pre_*` operations, each one
//! applied to points *before* everything built so far:
//!
//! 1. translate by the G-code offset
//! 2. scale by `1 / plotting_scale`
//! 3. place the canvas (mirror: `(w, h) - offset`, default: `(0, h) + (ox, -oy)`)
//! 4. when centring, translate by `(-w/2, -h/2)`
//! 5. flip (mirror: `(-1, -1)`, default: `(1, -1)`)
//!
//! A point therefore meets the flip first and the G-code offset last.
//! These do not commute; reordering them moves the output.

use lyon_geom::{point, vector, CubicBezierSegment, QuadraticBezierSegment, Transform};

use crate::geometry::{Path, PathSegment, Point};

/// Physical page and its relation to drawing units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width_mm: f64,
    pub height_mm: f64,
    /// Drawing units per millimetre.
    pub plotting_scale: f64,
    pub drawing_offset_x_mm: f64,
    pub drawing_offset_y_mm: f64,
}

impl Canvas {
    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self { width_mm, height_mm, ..Self::default() }
    }

    pub fn scaled_width(&self) -> f64 {
        self.width_mm * self.plotting_scale
    }

    pub fn scaled_height(&self) -> f64 {
        self.height_mm * self.plotting_scale
    }

    pub fn scaled_drawing_offset_x(&self) -> f64 {
        self.drawing_offset_x_mm * self.plotting_scale
    }

    pub fn scaled_drawing_offset_y(&self) -> f64 {
        self.drawing_offset_y_mm * self.plotting_scale
    }
}

impl Default for Canvas {
    /// A4 portrait, one drawing unit per millimetre.
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            plotting_scale: 1.0,
            drawing_offset_x_mm: 0.0,
            drawing_offset_y_mm: 0.0,
        }
    }
}

pub const DEFAULT_START_CODE: &str = "G21 (programming in millimeters, mm)\n\
                                      G90 (programming in absolute positioning)\n\
                                      G28 (auto homing)\n\
                                      G1 F8000 (set speed)";
pub const DEFAULT_PEN_DOWN_CODE: &str = "G1 Z0";
pub const DEFAULT_PEN_UP_CODE: &str = "G0 Z1";
pub const DEFAULT_CURVE_FLATNESS: f64 = 0.1;
/// Smallest curve tolerance used; lower or NaN settings are raised to it.
pub const MIN_CURVE_FLATNESS: f64 = 1e-4;

/// Everything the G-code exporter reads from configuration.
///
/// Read once when the transform and writer are built; editing the settings
/// afterwards does not affect an export in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct GCodeSettings {
    pub x_offset: f64,
    pub y_offset: f64,
    /// Flip X as well as Y, placing the origin at the far corner.
    pub mirror: bool,
    /// Put (0, 0) at the centre of the canvas.
    pub center_zero_point: bool,
    /// Replace curves by line segments.
    pub enable_flattening: bool,
    /// Maximum deviation of flattened curves, in millimetres.
    pub curve_flatness: f64,
    pub start_code: String,
    pub end_code: String,
    pub pen_down_code: String,
    pub pen_up_code: String,
    pub start_layer_code: String,
    pub end_layer_code: String,
}

impl Default for GCodeSettings {
    fn default() -> Self {
        Self {
            x_offset: 0.0,
            y_offset: 0.0,
            mirror: false,
            center_zero_point: false,
            enable_flattening: true,
            curve_flatness: DEFAULT_CURVE_FLATNESS,
            start_code: DEFAULT_START_CODE.to_string(),
            end_code: String::new(),
            pen_down_code: DEFAULT_PEN_DOWN_CODE.to_string(),
            pen_up_code: DEFAULT_PEN_UP_CODE.to_string(),
            start_layer_code: String::new(),
            end_layer_code: String::new(),
        }
    }
}

/// The image-to-plotter transform of one export.
#[derive(Debug, Clone, Copy)]
pub struct PlotTransform {
    placement: Transform<f64>,
    full: Transform<f64>,
    flatness: Option<f64>,
}

impl PlotTransform {
    pub fn new(canvas: &Canvas, settings: &GCodeSettings) -> Self {
        let scale = 1.0 / canvas.plotting_scale;
        let (w, h) = (canvas.scaled_width(), canvas.scaled_height());
        let (ox, oy) = (canvas.scaled_drawing_offset_x(), canvas.scaled_drawing_offset_y());

        let mut placement = Transform::identity()
            .pre_translate(vector(settings.x_offset, settings.y_offset))
            .pre_scale(scale, scale);

        placement = if settings.mirror {
            placement.pre_translate(vector(w, h)).pre_translate(vector(-ox, -oy))
        } else {
            placement.pre_translate(vector(0.0, h)).pre_translate(vector(ox, -oy))
        };

        if settings.center_zero_point {
            placement = placement.pre_translate(vector(-w / 2.0, -h / 2.0));
        }

        let full = if settings.mirror {
            placement.pre_scale(-1.0, -1.0)
        } else {
            placement.pre_scale(1.0, -1.0)
        };

        let flatness = settings
            .enable_flattening
            .then(|| settings.curve_flatness.max(MIN_CURVE_FLATNESS));
        Self { placement, full, flatness }
    }

    /// Map one image point to plotter millimetres.
    pub fn apply(&self, p: Point) -> Point {
        let q = self.full.transform_point(point(p.x, p.y));
        Point::new(q.x, q.y)
    }

    /// The transform without its final flip.
    pub fn apply_placement(&self, p: Point) -> Point {
        let q = self.placement.transform_point(point(p.x, p.y));
        Point::new(q.x, q.y)
    }

    /// Curve tolerance, `None` when curves are kept.
    pub fn flatness(&self) -> Option<f64> {
        self.flatness
    }

    /// Transform every segment of a path.
    ///
    /// With flattening enabled, curves come back as runs of `LineTo`;
    /// otherwise their control points are transformed and the curves kept.
    /// Flattening happens after transforming, so the tolerance is in
    /// millimetres.
    pub fn transform_path(&self, path: &Path) -> Vec<PathSegment> {
        let mut out = Vec::with_capacity(path.segments().len());
        let mut current = Point::new(0.0, 0.0);
        let mut subpath_start = current;

        for segment in path.segments() {
            match *segment {
                PathSegment::MoveTo(p) => {
                    current = self.apply(p);
                    subpath_start = current;
                    out.push(PathSegment::MoveTo(current));
                }
                PathSegment::LineTo(p) => {
                    current = self.apply(p);
                    out.push(PathSegment::LineTo(current));
                }
                PathSegment::QuadTo { ctrl, to } => {
                    let (ctrl, to) = (self.apply(ctrl), self.apply(to));
                    match self.flatness {
                        Some(tolerance) => {
                            let curve = QuadraticBezierSegment {
                                from: point(current.x, current.y),
                                ctrl: point(ctrl.x, ctrl.y),
                                to: point(to.x, to.y),
                            };
                            curve.for_each_flattened(tolerance, &mut |line| {
                                out.push(PathSegment::LineTo(Point::new(line.to.x, line.to.y)));
                            });
                        }
                        None => out.push(PathSegment::QuadTo { ctrl, to }),
                    }
                    current = to;
                }
                PathSegment::CubicTo { ctrl1, ctrl2, to } => {
                    let (ctrl1, ctrl2, to) = (self.apply(ctrl1), self.apply(ctrl2), self.apply(to));
                    match self.flatness {
                        Some(tolerance) => {
                            let curve = CubicBezierSegment {
                                from: point(current.x, current.y),
                                ctrl1: point(ctrl1.x, ctrl1.y),
                                ctrl2: point(ctrl2.x, ctrl2.y),
                                to: point(to.x, to.y),
                            };
                            curve.for_each_flattened(tolerance, &mut |line| {
                                out.push(PathSegment::LineTo(Point::new(line.to.x, line.to.y)));
                            });
                        }
                        None => out.push(PathSegment::CubicTo { ctrl1, ctrl2, to }),
                    }
                    current = to;
                }
                PathSegment::Close => {
                    current = subpath_start;
                    out.push(PathSegment::Close);
                }
            }
        }
        out
    }
}

// ============================================================================
// TESTS
// ============================================================================
