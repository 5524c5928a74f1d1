//! Shared command plumbing: argument helpers and drawing loading.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use penplot::{extract_geometries_from_svg, Drawing, Producer};

use super::config::PlotConfig;
use super::error::CliError;

/// Value following an option flag, e.g. the path after `-o`.
pub fn option_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, CliError> {
    *i += 1;
    args.get(*i).map(String::as_str).ok_or_else(|| CliError::usage(format!("{flag} needs a value")))
}

/// Read an SVG into a drawing with the configured pen set, then run pen
/// distribution.
pub fn load_drawing(svg_path: &Path, config: &PlotConfig) -> Result<Drawing, CliError> {
    let content =
        fs::read_to_string(svg_path).map_err(|source| CliError::Read { path: svg_path.to_path_buf(), source })?;

    let pen_set = Arc::new(config.pen_set.to_pen_set()?);
    let geometries = extract_geometries_from_svg(&content, &pen_set)?;
    let producer = Producer::new("svg").with_preconfigured_pens(config.match_svg_colours);

    let mut drawing = Drawing::new(pen_set, Arc::new(producer));
    drawing.append_all(geometries);
    drawing.update_pen_distribution();

    tracing::info!(
        svg = %svg_path.display(),
        geometries = drawing.geometry_count(),
        vertices = drawing.vertex_count(),
        "drawing loaded"
    );
    Ok(drawing)
}
