//! Plot configuration files.
//!
//! A YAML file describing the page, the pens and the G-code dialect. Every
//! field is optional; a missing file section falls back to the library
//! defaults.
//!
//! ```yaml
//! canvas:
//!   width_mm: 297
//!   height_mm: 210
//! pen_set:
//!   name: inks
//!   distribution: even-weighted
//!   order: darkest-first
//!   pens:
//!     - { name: black, color: "#000000", weight: 200 }
//!     - { name: red, color: "#d01010" }
//! gcode:
//!   mirror: false
//!   pen_down_code: "M3 S90"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use penplot::{Canvas, DistributionOrder, DistributionType, GCodeSettings, Pen, PenSet};

use super::error::CliError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub canvas: CanvasConfig,
    pub pen_set: PenSetConfig,
    pub gcode: GCodeConfig,
    /// Let SVG colours pick pens instead of the pen set's distribution.
    pub match_svg_colours: bool,
}

impl PlotConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// The file at `path`, or defaults when no path is given.
    pub fn load_or_default(path: Option<&str>) -> Result<Self, CliError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width_mm: f64,
    pub height_mm: f64,
    pub plotting_scale: f64,
    pub drawing_offset_x_mm: f64,
    pub drawing_offset_y_mm: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        let canvas = Canvas::default();
        Self {
            width_mm: canvas.width_mm,
            height_mm: canvas.height_mm,
            plotting_scale: canvas.plotting_scale,
            drawing_offset_x_mm: canvas.drawing_offset_x_mm,
            drawing_offset_y_mm: canvas.drawing_offset_y_mm,
        }
    }
}

impl CanvasConfig {
    pub fn to_canvas(&self) -> Result<Canvas, CliError> {
        if self.plotting_scale.is_nan() || self.plotting_scale <= 0.0 {
            return Err(CliError::Config(format!("plotting_scale must be positive, got {}", self.plotting_scale)));
        }
        Ok(Canvas {
            width_mm: self.width_mm,
            height_mm: self.height_mm,
            plotting_scale: self.plotting_scale,
            drawing_offset_x_mm: self.drawing_offset_x_mm,
            drawing_offset_y_mm: self.drawing_offset_y_mm,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PenSetConfig {
    pub name: String,
    pub distribution: String,
    pub order: String,
    pub pens: Vec<PenConfig>,
}

impl Default for PenSetConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            distribution: DistributionType::default().name().to_string(),
            order: DistributionOrder::default().name().to_string(),
            pens: vec![PenConfig::default()],
        }
    }
}

impl PenSetConfig {
    pub fn to_pen_set(&self) -> Result<PenSet, CliError> {
        let distribution = DistributionType::from_name(&self.distribution)
            .ok_or_else(|| CliError::Config(format!("unknown distribution: {}", self.distribution)))?;
        let order = DistributionOrder::from_name(&self.order)
            .ok_or_else(|| CliError::Config(format!("unknown pen order: {}", self.order)))?;

        let pens = self
            .pens
            .iter()
            .map(|pen| {
                let argb = parse_color(&pen.color)
                    .ok_or_else(|| CliError::Config(format!("pen {}: invalid colour {}", pen.name, pen.color)))?;
                Ok(Pen::new(&pen.name, argb).with_weight(pen.weight).with_enabled(pen.enabled))
            })
            .collect::<Result<Vec<_>, CliError>>()?;

        Ok(PenSet::new(&self.name, pens).with_order(order).with_distribution(distribution))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PenConfig {
    pub name: String,
    /// `#rrggbb`
    pub color: String,
    pub weight: u32,
    pub enabled: bool,
}

impl Default for PenConfig {
    fn default() -> Self {
        Self { name: "black".to_string(), color: "#000000".to_string(), weight: 100, enabled: true }
    }
}

/// `#rrggbb` (or `rrggbb`) to opaque 0xAARRGGBB.
pub fn parse_color(color: &str) -> Option<u32> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().map(|rgb| 0xff00_0000 | rgb)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GCodeConfig {
    pub x_offset: f64,
    pub y_offset: f64,
    pub mirror: bool,
    pub center_zero_point: bool,
    pub enable_flattening: bool,
    pub curve_flatness: f64,
    pub start_code: String,
    pub end_code: String,
    pub pen_down_code: String,
    pub pen_up_code: String,
    pub start_layer_code: String,
    pub end_layer_code: String,
}

impl Default for GCodeConfig {
    fn default() -> Self {
        let GCodeSettings {
            x_offset,
            y_offset,
            mirror,
            center_zero_point,
            enable_flattening,
            curve_flatness,
            start_code,
            end_code,
            pen_down_code,
            pen_up_code,
            start_layer_code,
            end_layer_code,
        } = GCodeSettings::default();
        Self {
            x_offset,
            y_offset,
            mirror,
            center_zero_point,
            enable_flattening,
            curve_flatness,
            start_code,
            end_code,
            pen_down_code,
            pen_up_code,
            start_layer_code,
            end_layer_code,
        }
    }
}

impl GCodeConfig {
    pub fn to_settings(&self) -> Result<GCodeSettings, CliError> {
        if self.curve_flatness.is_nan() || self.curve_flatness <= 0.0 {
            return Err(CliError::Config(format!("curve_flatness must be positive, got {}", self.curve_flatness)));
        }
        Ok(GCodeSettings {
            x_offset: self.x_offset,
            y_offset: self.y_offset,
            mirror: self.mirror,
            center_zero_point: self.center_zero_point,
            enable_flattening: self.enable_flattening,
            curve_flatness: self.curve_flatness,
            start_code: self.start_code.clone(),
            end_code: self.end_code.clone(),
            pen_down_code: self.pen_down_code.clone(),
            pen_up_code: self.pen_up_code.clone(),
            start_layer_code: self.start_layer_code.clone(),
            end_layer_code: self.end_layer_code.clone(),
        })
    }
}
