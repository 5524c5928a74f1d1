//! Stats command implementation.

use std::path::Path;

use serde::Serialize;

use penplot::{dominant_order, global_render_order};

use super::common::{load_drawing, option_value};
use super::config::PlotConfig;
use super::error::CliError;

/// One pen in JSON output.
#[derive(Serialize)]
struct JsonPen {
    name: String,
    geometries: usize,
    percentage: f64,
}

/// JSON output of the stats command.
#[derive(Serialize)]
struct JsonStats {
    geometries: usize,
    vertices: u64,
    order: &'static str,
    render_order: Vec<String>,
    pens: Vec<JsonPen>,
}

/// Execute the stats command.
pub fn cmd_stats(args: &[String]) -> Result<(), CliError> {
    let mut svg_path: Option<&str> = None;
    let mut config_path: Option<&str> = None;
    let mut json = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => config_path = Some(option_value(args, &mut i, "--config")?),
            "--json" => json = true,
            other if other.starts_with('-') => return Err(CliError::usage(format!("unknown option: {other}"))),
            other => svg_path = Some(other),
        }
        i += 1;
    }

    let svg_path = svg_path.ok_or_else(|| CliError::usage("stats needs an SVG file"))?;
    let config = PlotConfig::load_or_default(config_path)?;
    let drawing = load_drawing(Path::new(svg_path), &config)?;

    let stats = JsonStats {
        geometries: drawing.geometry_count(),
        vertices: drawing.vertex_count(),
        order: dominant_order(&drawing).name(),
        render_order: global_render_order(&drawing).iter().map(|pen| pen.name.clone()).collect(),
        pens: drawing
            .pen_stats()
            .into_iter()
            .map(|s| JsonPen { name: s.name, geometries: s.geometries, percentage: s.percentage })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Geometries: {}", stats.geometries);
    println!("Vertices:   {}", stats.vertices);
    println!("Order:      {} ({})", stats.render_order.join(", "), stats.order);
    println!();
    println!("{:<20} {:>10} {:>8}", "PEN", "GEOMETRIES", "%");
    for pen in &stats.pens {
        println!("{:<20} {:>10} {:>7.1}%", pen.name, pen.geometries, pen.percentage);
    }
    Ok(())
}
