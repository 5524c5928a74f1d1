//! SVG import - turn the paths of an SVG file into drawing geometries.
//!
//! Uses usvg for complete SVG resolution (CSS, transforms, basic shapes)
//! then walks the tree. Every path becomes one [`Geometry`] with its
//! curves kept; the exporter decides whether to flatten them.
//!
//! The importer chooses pens itself: each geometry's original pen is the
//! pen whose colour is closest to the path's stroke colour (or fill, for
//! paths without a stroke). Groups built from it should use a producer
//! flagged with `preconfigured_pens`.

use crate::error::SvgError;
use crate::geometry::{Geometry, Path, Point};
use crate::pen::PenSet;

/// Extract every path of an SVG document.
///
/// ## Rust Lesson #21: The ? Operator
///
/// `map_err` turns usvg's error into ours, then `?` returns it early.
/// Without `?` this would be a `match` with an explicit `return Err(..)`.
pub fn extract_geometries_from_svg(svg_content: &str, pen_set: &PenSet) -> Result<Vec<Geometry>, SvgError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options).map_err(|e| SvgError::Parse(e.to_string()))?;

    let mut geometries = Vec::new();
    extract_from_group(tree.root(), pen_set, &mut geometries);
    tracing::debug!(geometries = geometries.len(), "svg parsed");

    if geometries.is_empty() {
        Err(SvgError::NoGeometry)
    } else {
        Ok(geometries)
    }
}

fn extract_from_group(group: &usvg::Group, pen_set: &PenSet, geometries: &mut Vec<Geometry>) {
    for child in group.children() {
        match child {
            usvg::Node::Group(group) => extract_from_group(group, pen_set, geometries),
            usvg::Node::Path(path) => {
                if let Some(geometry) = path_to_geometry(path, pen_set) {
                    geometries.push(geometry);
                }
            }
            // Text and images have no outline to plot.
            _ => {}
        }
    }
}

/// Colour a path is drawn with, black when it has neither stroke nor a
/// solid fill.
fn path_colour(path: &usvg::Path) -> (u8, u8, u8) {
    let paint = path
        .stroke()
        .map(|stroke| stroke.paint())
        .or_else(|| path.fill().map(|fill| fill.paint()));
    match paint {
        Some(usvg::Paint::Color(c)) => (c.red, c.green, c.blue),
        _ => (0, 0, 0),
    }
}

/// Position of the pen closest in RGB space; the first wins ties.
pub fn nearest_pen(pen_set: &PenSet, (r, g, b): (u8, u8, u8)) -> usize {
    let distance = |(pr, pg, pb): (u8, u8, u8)| {
        let dr = pr as i32 - r as i32;
        let dg = pg as i32 - g as i32;
        let db = pb as i32 - b as i32;
        dr * dr + dg * dg + db * db
    };
    pen_set
        .pens()
        .iter()
        .enumerate()
        .min_by_key(|(_, pen)| distance(pen.rgb()))
        .map_or(0, |(position, _)| position)
}

fn path_to_geometry(path: &usvg::Path, pen_set: &PenSet) -> Option<Geometry> {
    // Bake in the element's transforms so every geometry shares one space.
    let data = path.data().clone().transform(path.abs_transform())?;

    let mut out = Path::new();
    for segment in data.segments() {
        match segment {
            usvg::tiny_skia_path::PathSegment::MoveTo(p) => {
                out.move_to(Point::new(p.x as f64, p.y as f64));
            }
            usvg::tiny_skia_path::PathSegment::LineTo(p) => {
                out.line_to(Point::new(p.x as f64, p.y as f64));
            }
            usvg::tiny_skia_path::PathSegment::QuadTo(ctrl, p) => {
                out.quad_to(Point::new(ctrl.x as f64, ctrl.y as f64), Point::new(p.x as f64, p.y as f64));
            }
            usvg::tiny_skia_path::PathSegment::CubicTo(ctrl1, ctrl2, p) => {
                out.cubic_to(
                    Point::new(ctrl1.x as f64, ctrl1.y as f64),
                    Point::new(ctrl2.x as f64, ctrl2.y as f64),
                    Point::new(p.x as f64, p.y as f64),
                );
            }
            usvg::tiny_skia_path::PathSegment::Close => {
                out.close();
            }
        }
    }

    if out.vertex_count() < 2 {
        return None;
    }
    Some(Geometry::new(out, nearest_pen(pen_set, path_colour(path))))
}

// ============================================================================
// TESTS
// ============================================================================
