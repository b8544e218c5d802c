use crate::error::{PrismError, Result};
use crate::input::Dimension;
use crate::pipeline::stage2_aggregate::AggregatedAnnotations;
use crate::stats::{RegressionResult, linregress};

#[derive(Debug, Clone, Copy)]
pub struct DimensionFit {
    pub dimension: Dimension,
    pub result: RegressionResult,
}

#[derive(Debug, Clone)]
pub struct Stage3Output {
    pub fits: Vec<DimensionFit>,
}

impl Stage3Output {
    pub fn fit(&self, dim: Dimension) -> Option<&RegressionResult> {
        self.fits
            .iter()
            .find(|f| f.dimension == dim)
            .map(|f| &f.result)
    }
}

/// Regresses the automatic score (y) on each aggregated dimension (x).
pub fn run_stage3(aggregated: &AggregatedAnnotations, scores: &[f64]) -> Result<Stage3Output> {
    let mut fits = Vec::with_capacity(Dimension::ALL.len());
    for dim in Dimension::ALL {
        let x = aggregated.column(dim);
        let result = linregress(x, scores).map_err(|e| match e {
            PrismError::Statistics(msg) => PrismError::Statistics(format!("{}: {msg}", dim.name())),
            other => other,
        })?;
        tracing::info!(
            "{}: slope={:.6} intercept={:.6} R^2={:.6} p={:.6}",
            dim.name(),
            result.slope,
            result.intercept,
            result.r_squared,
            result.p_value
        );
        fits.push(DimensionFit {
            dimension: dim,
            result,
        });
    }
    Ok(Stage3Output { fits })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_correlate.rs"]
mod tests;
