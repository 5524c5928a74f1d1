//! Calibrate command implementation.

use std::path::Path;

use penplot::export_calibration_file;

use super::common::option_value;
use super::config::PlotConfig;
use super::error::CliError;

/// Execute the calibrate command.
///
/// `-o` names the export the calibration belongs to; the file written is
/// the matching `..gcode_test..` name next to it.
pub fn cmd_calibrate(args: &[String]) -> Result<(), CliError> {
    let mut config_path: Option<&str> = None;
    let mut output_path: Option<&str> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => config_path = Some(option_value(args, &mut i, "--config")?),
            "-o" | "--output" => output_path = Some(option_value(args, &mut i, "--output")?),
            other => return Err(CliError::usage(format!("unexpected argument: {other}"))),
        }
        i += 1;
    }

    let output = output_path.ok_or_else(|| CliError::usage("calibrate needs -o <file>"))?;
    let config = PlotConfig::load_or_default(config_path)?;

    let canvas = config.canvas.to_canvas()?;
    let settings = config.gcode.to_settings()?;
    let written = export_calibration_file(&canvas, &settings, Path::new(output))?;
    println!("Wrote calibration to {}", written.display());
    Ok(())
}
