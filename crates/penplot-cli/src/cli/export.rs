//! Export command implementation.

use std::path::{Path, PathBuf};

use penplot::{export_calibration_file, export_gcode_file, ExportListener};

use super::common::{load_drawing, option_value};
use super::config::PlotConfig;
use super::error::CliError;

/// Logs progress every ten percent.
struct ProgressLog {
    last_decile: usize,
}

impl ExportListener for ProgressLog {
    fn on_geometry_exported(&mut self, done: usize, total: usize) {
        let decile = done * 10 / total.max(1);
        if decile > self.last_decile {
            self.last_decile = decile;
            tracing::debug!(done, total, "exporting");
        }
    }
}

/// Execute the export command.
pub fn cmd_export(args: &[String]) -> Result<(), CliError> {
    let mut svg_path: Option<&str> = None;
    let mut config_path: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut calibration = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => config_path = Some(option_value(args, &mut i, "--config")?),
            "-o" | "--output" => output_path = Some(option_value(args, &mut i, "--output")?),
            "--calibration" => calibration = true,
            other if other.starts_with('-') => return Err(CliError::usage(format!("unknown option: {other}"))),
            other => svg_path = Some(other),
        }
        i += 1;
    }

    let svg_path = Path::new(svg_path.ok_or_else(|| CliError::usage("export needs an SVG file"))?);
    let output: PathBuf = output_path.map_or_else(|| svg_path.with_extension("gcode"), PathBuf::from);

    let config = PlotConfig::load_or_default(config_path)?;
    let canvas = config.canvas.to_canvas()?;
    let settings = config.gcode.to_settings()?;
    let drawing = load_drawing(svg_path, &config)?;

    let report = export_gcode_file(&drawing, &canvas, &settings, &output, &mut ProgressLog { last_decile: 0 })?;
    println!(
        "Wrote {} geometries in {} layers to {}",
        report.geometries,
        report.layers,
        output.display()
    );

    if calibration {
        let written = export_calibration_file(&canvas, &settings, &output)?;
        println!("Wrote calibration to {}", written.display());
    }
    Ok(())
}
