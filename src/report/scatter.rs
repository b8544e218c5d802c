use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::{PrismError, Result};
use crate::report::{DrawResult, FONT, SCATTER_SIZE, format_rounded, render_image};
use crate::stats::RegressionResult;

pub const SUPTITLE: &str = "PRISM vs. Median Human Annotator Score Correlation";
pub const X_LABEL: &str = "Median Human Annotator Score";
pub const Y_LABEL: &str = "PRISM Score";
pub const LEGEND_POINTS: &str = "original data";
pub const LEGEND_LINE: &str = "fitted line";

const GRID: (usize, usize) = (2, 3);
const HEADER_PX: u32 = 56;
const LABEL_PX: u32 = 36;

pub struct ScatterPanel<'a> {
    pub name: &'a str,
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub fit: RegressionResult,
}

impl ScatterPanel<'_> {
    pub fn title(&self) -> String {
        format!(
            "{}: R² = {}, p = {}",
            self.name,
            format_rounded(self.fit.r_squared, 6),
            format_rounded(self.fit.p_value, 6)
        )
    }
}

pub fn render_scatter_grid(path: &Path, panels: &[ScatterPanel<'_>]) -> Result<()> {
    if panels.len() > GRID.0 * GRID.1 {
        return Err(PrismError::Plot(format!(
            "{} panels do not fit a {}x{} grid",
            panels.len(),
            GRID.0,
            GRID.1
        )));
    }
    render_image(
        path,
        SCATTER_SIZE,
        |root| draw_grid(root, panels),
        |root| draw_grid(root, panels),
    )
}

/// Padded `[lo, hi]` covering every value.
pub(crate) fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    let pad = if span > 0.0 { span * 0.05 } else { 0.5 };
    (lo - pad, hi + pad)
}

fn draw_grid<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    panels: &[ScatterPanel<'_>],
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let (width, height) = root.dim_in_pixel();

    let (header, rest) = root.split_vertically(HEADER_PX);
    let (y_label_area, rest) = rest.split_horizontally(LABEL_PX);
    let (grid, x_label_area) = rest.split_vertically(height - HEADER_PX - LABEL_PX);

    let title_style = TextStyle::from((FONT, 22).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    header.draw_text(SUPTITLE, &title_style, ((width / 2) as i32, (HEADER_PX / 2) as i32))?;
    draw_legend(&header, width)?;

    let axis_style = TextStyle::from((FONT, 16).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    let (grid_w, _) = x_label_area.dim_in_pixel();
    x_label_area.draw_text(
        X_LABEL,
        &axis_style,
        ((grid_w / 2) as i32, (LABEL_PX / 2) as i32),
    )?;
    let (_, grid_h) = y_label_area.dim_in_pixel();
    y_label_area.draw_text(
        Y_LABEL,
        &axis_style.transform(FontTransform::Rotate270),
        ((LABEL_PX / 2) as i32, (grid_h / 2) as i32),
    )?;

    let cells = grid.split_evenly(GRID);
    for (area, panel) in cells.iter().zip(panels) {
        draw_panel(area, panel)?;
    }

    root.present()?;
    Ok(())
}

fn draw_legend<DB: DrawingBackend>(
    header: &DrawingArea<DB, Shift>,
    width: u32,
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let x = width as i32 - 150;
    let label_style = TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Left, VPos::Center));

    let y = 16;
    header.draw(&Circle::new((x, y), 4, BLUE.filled()))?;
    header.draw_text(LEGEND_POINTS, &label_style, (x + 16, y))?;

    let y = 38;
    header.draw(&PathElement::new(
        vec![(x - 8, y), (x + 8, y)],
        RED.stroke_width(2),
    ))?;
    header.draw_text(LEGEND_LINE, &label_style, (x + 16, y))?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &ScatterPanel<'_>,
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let (x_min, x_max) = padded_range(panel.x.iter().copied());
    let fit_ends = [panel.fit.predict(x_min), panel.fit.predict(x_max)];
    let (y_min, y_max) = padded_range(panel.y.iter().copied().chain(fit_ends));

    let mut chart = ChartBuilder::on(area)
        .caption(panel.title(), (FONT, 14))
        .margin(8)
        .x_label_area_size(28)
        .y_label_area_size(52)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart.configure_mesh().x_labels(6).y_labels(6).draw()?;

    chart.draw_series(
        panel
            .x
            .iter()
            .zip(panel.y)
            .map(|(&x, &y)| Circle::new((x, y), 3, BLUE.filled())),
    )?;

    let (lo, hi) = panel
        .x
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if lo.is_finite() && hi.is_finite() {
        chart.draw_series(LineSeries::new(
            vec![(lo, panel.fit.predict(lo)), (hi, panel.fit.predict(hi))],
            RED.stroke_width(2),
        ))?;
    }
    Ok(())
}
