//! # penplot
//!
//! Drawing model, pen distribution and G-code export for pen plotters.
//!
//! A producer appends [`Geometry`] to a [`Drawing`] (possibly from a
//! background thread through [`SharedDrawing`]). Once production is done,
//! [`Drawing::update_pen_distribution`] assigns every geometry a pen, and
//! [`export::export_gcode`] writes one layer per pen in render order.
//!
//! ## Rust Lesson #7: Modules and re-exports
//!
//! Every file under `src/` is a module declared below with `pub mod`.
//! The `pub use` lines lift the types most callers need to the crate root,
//! so `penplot::Drawing` works as well as `penplot::drawing::Drawing`.
//! The full paths stay available for everything else.

pub mod distribution;
pub mod drawing;
pub mod error;
pub mod events;
pub mod export;
pub mod gcode;
pub mod geometry;
pub mod group;
pub mod order;
pub mod pen;
pub mod rng;
pub mod svg;
pub mod transform;

// Re-export common types at crate root for convenience.
pub use distribution::{distribute, per_pen_stats, PenStats};
pub use drawing::{DetachedGroup, Drawing, SharedDrawing};
pub use error::{PlotError, Result, SvgError};
pub use events::{DrawingEvent, DrawingObserver};
pub use export::{
    calibration_path, export_calibration, export_calibration_file, export_gcode, export_gcode_file, ExportListener,
    ExportReport,
};
pub use gcode::GCodeWriter;
pub use geometry::{Geometry, GroupId, Path, PathSegment, Point};
pub use group::{DefaultMergeRule, Group, MergeRule, Producer};
pub use order::{dominant_order, global_display_order, global_render_order};
pub use pen::{DistributionOrder, DistributionType, Pen, PenId, PenSet, PenSetId};
pub use svg::extract_geometries_from_svg;
pub use transform::{Canvas, GCodeSettings, PlotTransform};
