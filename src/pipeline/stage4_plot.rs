use std::path::Path;

use crate::error::Result;
use crate::input::Dimension;
use crate::pipeline::stage2_aggregate::AggregatedAnnotations;
use crate::pipeline::stage3_correlate::Stage3Output;
use crate::report::heatmap::render_heatmap;
use crate::report::scatter::{ScatterPanel, render_scatter_grid};
use crate::stats::correlation_matrix;

#[derive(Debug, Clone)]
pub struct Stage4Inputs<'a> {
    pub aggregated: &'a AggregatedAnnotations,
    pub correlations: &'a Stage3Output,
    pub scores: &'a [f64],
    pub scatter_path: &'a Path,
    pub heatmap_path: &'a Path,
}

pub fn dimension_names() -> Vec<&'static str> {
    Dimension::ALL.iter().map(|d| d.name()).collect()
}

/// Pairwise Pearson matrix over the six aggregated columns.
pub fn annotation_correlation(aggregated: &AggregatedAnnotations) -> Vec<Vec<f64>> {
    correlation_matrix(aggregated.columns())
}

pub fn run_stage4(inputs: &Stage4Inputs<'_>) -> Result<()> {
    let panels: Vec<ScatterPanel<'_>> = Dimension::ALL
        .iter()
        .filter_map(|&dim| {
            inputs.correlations.fit(dim).map(|fit| ScatterPanel {
                name: dim.name(),
                x: inputs.aggregated.column(dim),
                y: inputs.scores,
                fit: *fit,
            })
        })
        .collect();
    render_scatter_grid(inputs.scatter_path, &panels)?;
    tracing::info!("wrote scatter grid to {}", inputs.scatter_path.display());

    let matrix = annotation_correlation(inputs.aggregated);
    render_heatmap(inputs.heatmap_path, &dimension_names(), &matrix)?;
    tracing::info!("wrote heatmap to {}", inputs.heatmap_path.display());
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_plot.rs"]
mod tests;
