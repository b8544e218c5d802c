use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::stats::RegressionResult;

#[derive(Debug, Serialize)]
pub struct DimensionSummary<'a> {
    pub dimension: &'a str,
    #[serde(flatten)]
    pub regression: RegressionResult,
}

#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub tool: &'a str,
    pub version: &'a str,
    pub n_rows: usize,
    pub dimensions: Vec<DimensionSummary<'a>>,
    /// Row-major; NaN cells serialize as `null`.
    pub annotation_correlation: Vec<Vec<Option<f64>>>,
}

pub fn correlation_cells(matrix: &[Vec<f64>]) -> Vec<Vec<Option<f64>>> {
    matrix
        .iter()
        .map(|row| row.iter().map(|&v| v.is_finite().then_some(v)).collect())
        .collect()
}

pub fn render_summary_json(summary: &RunSummary<'_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

pub fn write_summary_json(path: &Path, summary: &RunSummary<'_>) -> Result<()> {
    let json = render_summary_json(summary)?;
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(json.as_bytes())?;
    w.write_all(b"\n")?;
    w.flush()?;
    Ok(())
}
