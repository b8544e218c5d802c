use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{PrismError, Result};

pub mod heatmap;
pub mod json;
pub mod scatter;

pub const SCATTER_SIZE: (u32, u32) = (1200, 800);
pub const HEATMAP_SIZE: (u32, u32) = (900, 760);
pub const FONT: &str = "sans-serif";

const BITMAP_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

pub(crate) type DrawResult = std::result::Result<(), Box<dyn Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Bitmap,
    /// No extension: written as PNG.
    BarePng,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let Some(ext) = path.extension() else {
            return Ok(ImageFormat::BarePng);
        };
        let ext = ext.to_string_lossy().to_ascii_lowercase();
        if ext == "svg" {
            Ok(ImageFormat::Svg)
        } else if BITMAP_EXTENSIONS.contains(&ext.as_str()) {
            Ok(ImageFormat::Bitmap)
        } else {
            Err(PrismError::Plot(format!(
                "{}: unsupported image format `.{ext}` (use .svg, .png, .jpg or .bmp)",
                path.display()
            )))
        }
    }
}

/// Sibling path with a `.png` suffix so the bitmap encoder can pick a format.
pub(crate) fn png_staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp.png");
    PathBuf::from(name)
}

/// Dispatches a figure to the backend matching `path`.
pub(crate) fn render_image(
    path: &Path,
    size: (u32, u32),
    svg: impl FnOnce(DrawingArea<SVGBackend<'_>, Shift>) -> DrawResult,
    bitmap: impl FnOnce(DrawingArea<BitMapBackend<'_>, Shift>) -> DrawResult,
) -> Result<()> {
    let drawn = match ImageFormat::from_path(path)? {
        ImageFormat::Svg => svg(SVGBackend::new(path, size).into_drawing_area()),
        ImageFormat::Bitmap => bitmap(BitMapBackend::new(path, size).into_drawing_area()),
        ImageFormat::BarePng => {
            let staging = png_staging_path(path);
            let drawn = bitmap(BitMapBackend::new(&staging, size).into_drawing_area());
            match drawn {
                Ok(()) => fs::rename(&staging, path).map_err(|e| Box::new(e) as Box<dyn Error>),
                Err(e) => {
                    let _ = fs::remove_file(&staging);
                    Err(e)
                }
            }
        }
    };
    drawn.map_err(|e| PrismError::Plot(format!("{}: {e}", path.display())))
}

/// Float text in Python `repr` form: shortest round-trip digits, a trailing
/// `.0` for integral values, and exponent notation below 1e-4 or from 1e16
/// (`1.2e-05`, `1e+16`).
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let text = format!("{value:e}");
        return match text.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exp),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => text,
        };
    }
    let text = format!("{value}");
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

/// Rounds to `decimals` places, then formats like [`format_float`], so
/// 1 prints as `1.0` and 1.23e-5 at six places as `1.2e-05`.
pub fn format_rounded(value: f64, decimals: i32) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    let scale = 10f64.powi(decimals);
    let rounded = (value * scale).round() / scale;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format_float(rounded)
}

/// Heatmap cell annotation.
pub fn format_cell(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
