//! G-code export of a finished drawing.
//!
//! One layer per enabled pen, in global render order. Within a layer the
//! pen's geometries are written in append order, restricted to the
//! drawing's displayed range.
//!
//! The drawing must be complete: run [`crate::Drawing::update_pen_distribution`]
//! first, and make sure no producer is still appending.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::drawing::Drawing;
use crate::error::{PlotError, Result};
use crate::gcode::{format_coord, GCodeWriter};
use crate::order::global_render_order;
use crate::pen::{Pen, PenId};
use crate::transform::{Canvas, GCodeSettings, PlotTransform};

/// Length of each calibration corner mark, in millimetres.
pub const CALIBRATION_STROKE_MM: f64 = 15.0;

/// Receives export progress and may stop the export.
///
/// Cancellation is polled between geometries. A cancelled export leaves
/// whatever was already written in place.
pub trait ExportListener {
    fn on_geometry_exported(&mut self, _done: usize, _total: usize) {}

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Listener that ignores progress and never cancels.
impl ExportListener for () {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub layers: usize,
    pub geometries: usize,
    pub cancelled: bool,
}

/// Write the drawing as G-code to `out`.
pub fn export_gcode<W: Write>(
    drawing: &Drawing,
    canvas: &Canvas,
    settings: &GCodeSettings,
    out: W,
    listener: &mut dyn ExportListener,
) -> Result<ExportReport> {
    let transform = PlotTransform::new(canvas, settings);
    let mut writer = GCodeWriter::new(out, settings);
    let mut report = ExportReport::default();

    let pens: Vec<&Pen> = global_render_order(drawing).into_iter().filter(|pen| pen.enabled).collect();

    // Resolve each displayed geometry to a pen once; `None` is skipped.
    let displayed = drawing.displayed_geometries();
    let assigned: Vec<Option<PenId>> = displayed
        .iter()
        .map(|geometry| {
            let position = geometry.pen_index()?;
            drawing.group_of(geometry).pen_set().pen(position).map(Pen::id)
        })
        .collect();
    let total = assigned
        .iter()
        .filter(|pen| pen.is_some_and(|id| pens.iter().any(|p| p.id() == id)))
        .count();

    let _span = tracing::debug_span!("export_gcode", pens = pens.len(), geometries = total).entered();

    writer.open()?;
    'pens: for pen in &pens {
        writer.start_layer(&pen.name)?;
        report.layers += 1;

        for (geometry, assigned) in displayed.iter().zip(&assigned) {
            if *assigned != Some(pen.id()) {
                continue;
            }
            if listener.is_cancelled() {
                report.cancelled = true;
                break 'pens;
            }
            for segment in transform.transform_path(geometry.path()) {
                writer.segment(&segment)?;
            }
            report.geometries += 1;
            listener.on_geometry_exported(report.geometries, total);
        }

        writer.end_layer(&pen.name)?;
    }

    if report.cancelled {
        tracing::warn!(exported = report.geometries, total, "export cancelled, output truncated");
        writer.flush()?;
    } else {
        writer.close()?;
    }
    Ok(report)
}

/// Create `path` and export into it.
///
/// Fails with [`PlotError::Destination`] before anything is traversed if
/// the file cannot be created.
pub fn export_gcode_file(
    drawing: &Drawing,
    canvas: &Canvas,
    settings: &GCodeSettings,
    path: &Path,
    listener: &mut dyn ExportListener,
) -> Result<ExportReport> {
    let file = create(path)?;
    let report = export_gcode(drawing, canvas, settings, BufWriter::new(file), listener)?;
    tracing::info!(path = %path.display(), layers = report.layers, geometries = report.geometries, "G-code file created");
    Ok(report)
}

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| PlotError::Destination { path: path.to_path_buf(), source })
}

/// Where the calibration file for an export to `path` goes:
/// `out.gcode` becomes `outgcode_test.gcode`.
pub fn calibration_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.with_extension("").into_os_string();
    name.push("gcode_test");
    if let Some(extension) = path.extension() {
        name.push(".");
        name.push(extension);
    }
    PathBuf::from(name)
}

/// Write a calibration program: a mark just outside each canvas corner.
///
/// The marks are placed in plotter millimetres directly, no drawing
/// involved. The pen goes down, so load paper first.
pub fn export_calibration<W: Write>(canvas: &Canvas, settings: &GCodeSettings, out: W) -> Result<()> {
    let (mut x_min, mut x_max) = (0.0, canvas.width_mm);
    let (mut y_min, mut y_max) = (0.0, canvas.height_mm);

    if settings.center_zero_point {
        let (half_w, half_h) = (x_max / 2.0, y_max / 2.0);
        x_min -= half_w;
        x_max -= half_w;
        y_min -= half_h;
        y_max -= half_h;
    }
    x_min += settings.x_offset;
    x_max += settings.x_offset;
    y_min += settings.y_offset;
    y_max += settings.y_offset;

    let mut writer = GCodeWriter::new(out, settings);
    writer.comment("This is a test file to draw the extremes of the drawing area.")?;
    writer.comment(&format!("Draws a {CALIBRATION_STROKE_MM} mm mark on all four corners of the paper."))?;
    writer.comment("WARNING: pen will be down.")?;
    writer.comment(&format!("Extremes of X: {} thru {}", format_coord(x_min), format_coord(x_max)))?;
    writer.comment(&format!("Extremes of Y: {} thru {}", format_coord(y_min), format_coord(y_max)))?;
    writer.open()?;

    let s = CALIBRATION_STROKE_MM;
    let h = s / 2.0;
    let corners: [(&str, [(f64, f64); 5]); 4] = [
        (
            "Lower left",
            [(x_min - h, y_min), (x_min - s, y_min), (x_min - s, y_min - s), (x_min, y_min - s), (x_min, y_min - h)],
        ),
        (
            "Lower right",
            [(x_max, y_min - h), (x_max, y_min - s), (x_max + s, y_min - s), (x_max + s, y_min), (x_max + h, y_min)],
        ),
        (
            "Upper right",
            [(x_max + h, y_max), (x_max + s, y_max), (x_max + s, y_max + s), (x_max, y_max + s), (x_max, y_max + h)],
        ),
        (
            "Upper left",
            [(x_min, y_max + h), (x_min, y_max + s), (x_min - s, y_max + s), (x_min - s, y_max), (x_min - h, y_max)],
        ),
    ];

    for (name, [(sx, sy), rest @ ..]) in corners {
        writer.comment(name)?;
        writer.linear_move(sx, sy)?;
        writer.pen_down()?;
        for (x, y) in rest {
            writer.linear_move(x, y)?;
        }
        writer.pen_up()?;
    }

    writer.close()?;
    Ok(())
}

/// Write the calibration program next to `path`, see [`calibration_path`].
/// Returns the path actually written.
pub fn export_calibration_file(canvas: &Canvas, settings: &GCodeSettings, path: &Path) -> Result<PathBuf> {
    let target = calibration_path(path);
    let file = create(&target)?;
    export_calibration(canvas, settings, BufWriter::new(file))?;
    tracing::info!(path = %target.display(), "calibration file created");
    Ok(target)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Geometry, Path as VectorPath, Point};
    use crate::group::Producer;
    use crate::pen::{DistributionOrder, PenSet};
    use std::sync::Arc;

    fn bare() -> GCodeSettings {
        GCodeSettings { start_code: String::new(), ..GCodeSettings::default() }
    }

    fn drawing(pens: Vec<Pen>, count: usize) -> Drawing {
        let set = PenSet::new("pens", pens).with_order(DistributionOrder::Displayed);
        let mut drawing = Drawing::new(Arc::new(set), Arc::new(Producer::new("test")));
        for i in 0..count {
            let x = i as f64;
            drawing.append(Geometry::new(
                VectorPath::from_polyline(&[Point::new(x, 0.0), Point::new(x, 10.0)], false),
                0,
            ));
        }
        drawing.update_pen_distribution();
        drawing
    }

    fn export(drawing: &Drawing, listener: &mut dyn ExportListener) -> (String, ExportReport) {
        let mut out = Vec::new();
        let report = export_gcode(drawing, &Canvas::default(), &bare(), &mut out, listener).unwrap();
        (String::from_utf8(out).unwrap(), report)
    }

    #[test]
    fn one_layer_per_enabled_pen_in_render_order() {
        let drawing = drawing(
            vec![
                Pen::new("a", 0xff000000),
                Pen::new("off", 0xff000000).with_enabled(false),
                Pen::new("c", 0xff000000),
            ],
            4,
        );
        let (text, report) = export(&drawing, &mut ());

        assert_eq!(report, ExportReport { layers: 2, geometries: 4, cancelled: false });
        let layers: Vec<&str> = text.lines().filter(|l| l.starts_with("(Start Layer")).collect();
        // Displayed order, reversed for rendering.
        assert_eq!(layers, vec!["(Start Layer: c)", "(Start Layer: a)"]);
    }

    #[test]
    fn unassigned_and_hidden_geometries_are_skipped() {
        let mut drawing = drawing(vec![Pen::new("a", 0xff000000)], 5);
        drawing.set_displayed_range(Some(1), Some(4));
        let (_, report) = export(&drawing, &mut ());
        assert_eq!(report.geometries, 3);

        let unassigned = self::drawing(vec![Pen::new("a", 0xff000000).with_enabled(false)], 3);
        let (text, report) = export(&unassigned, &mut ());
        assert_eq!(report, ExportReport::default());
        assert!(!text.contains("G1 X"));
    }

    struct Recorder {
        calls: Vec<(usize, usize)>,
        cancel_after: Option<usize>,
    }

    impl ExportListener for Recorder {
        fn on_geometry_exported(&mut self, done: usize, total: usize) {
            self.calls.push((done, total));
        }

        fn is_cancelled(&self) -> bool {
            self.cancel_after.is_some_and(|n| self.calls.len() >= n)
        }
    }

    #[test]
    fn progress_once_per_geometry() {
        let drawing = drawing(vec![Pen::new("a", 0xff000000), Pen::new("b", 0xff000000)], 3);
        let mut recorder = Recorder { calls: Vec::new(), cancel_after: None };
        export(&drawing, &mut recorder);
        assert_eq!(recorder.calls, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[test]
    fn cancellation_truncates_output() {
        let drawing = drawing(vec![Pen::new("a", 0xff000000)], 5);
        let mut recorder = Recorder { calls: Vec::new(), cancel_after: Some(2) };
        let (text, report) = export(&drawing, &mut recorder);

        assert!(report.cancelled);
        assert_eq!(report.geometries, 2);
        assert!(!text.contains("(End Layer"));
    }

    #[test]
    fn destination_error_before_writing() {
        let drawing = drawing(vec![Pen::new("a", 0xff000000)], 1);
        let path = Path::new("/definitely/not/a/dir/out.gcode");
        let result = export_gcode_file(&drawing, &Canvas::default(), &bare(), path, &mut ());
        assert!(matches!(result, Err(PlotError::Destination { .. })));
    }

    #[test]
    fn calibration_file_name() {
        assert_eq!(calibration_path(Path::new("plots/out.gcode")), PathBuf::from("plots/outgcode_test.gcode"));
        assert_eq!(calibration_path(Path::new("out")), PathBuf::from("outgcode_test"));
    }

    #[test]
    fn calibration_marks_corners() {
        let canvas = Canvas::new(100.0, 50.0);
        let mut out = Vec::new();
        export_calibration(&canvas, &bare(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("(This is a test file"));
        assert!(text.contains("(Extremes of X: 0.000 thru 100.000)"));
        assert!(text.contains("(Extremes of Y: 0.000 thru 50.000)"));
        for corner in ["(Lower left)", "(Lower right)", "(Upper right)", "(Upper left)"] {
            assert!(text.contains(corner), "missing {corner}");
        }
        assert_eq!(text.matches("G1 Z0").count(), 4);
        assert!(text.contains("G1 X-7.500 Y0.000"));
        assert!(text.contains("G1 X115.000 Y65.000"));
    }

    #[test]
    fn calibration_centred_with_offset() {
        let canvas = Canvas::new(100.0, 50.0);
        let settings = GCodeSettings { center_zero_point: true, x_offset: 10.0, ..bare() };
        let mut out = Vec::new();
        export_calibration(&canvas, &settings, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("(Extremes of X: -40.000 thru 60.000)"));
        assert!(text.contains("(Extremes of Y: -25.000 thru 25.000)"));
    }
}
