use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::{PrismError, Result};
use crate::report::{DrawResult, FONT, HEATMAP_SIZE, format_cell, render_image};

pub const TITLE: &str = "Median Human Quality Score Correlation";

const HEADER_PX: u32 = 48;
const COLORBAR_PX: u32 = 110;
const AXIS_LABEL_PX: u32 = 140;
const COLORBAR_STEPS: usize = 64;

// Dark to light ramp, low correlation dark.
const RAMP: [(f64, (u8, u8, u8)); 4] = [
    (0.0, (28, 16, 68)),
    (0.4, (161, 31, 87)),
    (0.7, (234, 91, 62)),
    (1.0, (250, 235, 221)),
];
const NAN_COLOR: RGBColor = RGBColor(235, 235, 235);

pub fn render_heatmap(path: &Path, names: &[&str], matrix: &[Vec<f64>]) -> Result<()> {
    if matrix.len() != names.len() || matrix.iter().any(|row| row.len() != names.len()) {
        return Err(PrismError::Plot(format!(
            "correlation matrix is not {0}x{0}",
            names.len()
        )));
    }
    render_image(
        path,
        HEATMAP_SIZE,
        |root| draw_heatmap(root, names, matrix),
        |root| draw_heatmap(root, names, matrix),
    )
}

/// Finite value range of the matrix, widened when degenerate.
pub(crate) fn value_range(matrix: &[Vec<f64>]) -> (f64, f64) {
    let (lo, hi) = matrix
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return (-1.0, 1.0);
    }
    if hi - lo < 1e-12 {
        return (lo - 0.5, hi + 0.5);
    }
    (lo, hi)
}

pub(crate) fn heat_color(value: f64, lo: f64, hi: f64) -> RGBColor {
    if !value.is_finite() {
        return NAN_COLOR;
    }
    let t = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    for pair in RAMP.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = (t - t0) / (t1 - t0);
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
            return RGBColor(mix(c0.0, c1.0), mix(c0.1, c1.1), mix(c0.2, c1.2));
        }
    }
    let (_, c) = RAMP[RAMP.len() - 1];
    RGBColor(c.0, c.1, c.2)
}

pub(crate) fn is_dark(color: &RGBColor) -> bool {
    let RGBColor(r, g, b) = *color;
    let luminance = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
    luminance < 128.0
}

fn draw_heatmap<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    names: &[&str],
    matrix: &[Vec<f64>],
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let (width, _) = root.dim_in_pixel();
    let n = names.len();
    let (lo, hi) = value_range(matrix);

    let (header, body) = root.split_vertically(HEADER_PX);
    let title_style = TextStyle::from((FONT, 20).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    header.draw_text(TITLE, &title_style, ((width / 2) as i32, (HEADER_PX / 2) as i32))?;

    let (main, colorbar) = body.split_horizontally(width - COLORBAR_PX);

    let extent = n as f64;
    let mut chart = ChartBuilder::on(&main)
        .margin(10)
        .x_label_area_size(AXIS_LABEL_PX)
        .y_label_area_size(AXIS_LABEL_PX)
        .build_cartesian_2d(0f64..extent, 0f64..extent)?;

    // Row 0 is drawn at the top.
    let cell_y = |row: usize| (n - 1 - row) as f64;

    chart.draw_series((0..n).flat_map(|row| (0..n).map(move |col| (row, col))).map(
        |(row, col)| {
            let y = cell_y(row);
            let x = col as f64;
            Rectangle::new(
                [(x, y), (x + 1.0, y + 1.0)],
                heat_color(matrix[row][col], lo, hi).filled(),
            )
        },
    ))?;

    for (row, values) in matrix.iter().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            let fill = heat_color(value, lo, hi);
            let text_color = if is_dark(&fill) { &WHITE } else { &BLACK };
            let style = TextStyle::from((FONT, 15).into_font())
                .color(text_color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            chart.draw_series(std::iter::once(Text::new(
                format_cell(value),
                (col as f64 + 0.5, cell_y(row) + 0.5),
                style,
            )))?;
        }
    }

    // Axis names, placed through the chart's pixel mapping.
    let x_style = TextStyle::from((FONT, 14).into_font())
        .transform(FontTransform::Rotate90)
        .pos(Pos::new(HPos::Left, VPos::Center));
    let y_style = TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Right, VPos::Center));
    for (i, name) in names.iter().enumerate() {
        let (px, py) = chart.backend_coord(&(i as f64 + 0.5, 0.0));
        root.draw_text(name, &x_style, (px, py + 8))?;
        let (px, py) = chart.backend_coord(&(0.0, cell_y(i) + 0.5));
        root.draw_text(name, &y_style, (px - 8, py))?;
    }

    draw_colorbar(&colorbar, lo, hi)?;

    root.present()?;
    Ok(())
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    lo: f64,
    hi: f64,
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let mut bar = ChartBuilder::on(area)
        .margin_top(10)
        .margin_bottom(AXIS_LABEL_PX + 10)
        .margin_right(50)
        .y_label_area_size(0)
        .right_y_label_area_size(44)
        .build_cartesian_2d(0f64..1f64, lo..hi)?;

    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(6)
        .y_label_formatter(&|v| format!("{v:.2}"))
        .draw()?;

    let step = (hi - lo) / COLORBAR_STEPS as f64;
    bar.draw_series((0..COLORBAR_STEPS).map(|i| {
        let y0 = lo + step * i as f64;
        let y1 = y0 + step;
        let mid = 0.5 * (y0 + y1);
        Rectangle::new([(0.0, y0), (1.0, y1)], heat_color(mid, lo, hi).filled())
    }))?;
    Ok(())
}
