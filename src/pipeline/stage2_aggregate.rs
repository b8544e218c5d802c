use crate::input::Dimension;
use crate::pipeline::stage1_score::ScoredTable;

/// Median annotator rating per row, one column per dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedAnnotations {
    columns: [Vec<f64>; 6],
}

impl AggregatedAnnotations {
    pub fn column(&self, dim: Dimension) -> &[f64] {
        &self.columns[dim.index()]
    }

    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.columns[0].len()
    }
}

pub fn run_stage2(table: &ScoredTable) -> AggregatedAnnotations {
    let mut columns: [Vec<f64>; 6] = Default::default();
    for column in columns.iter_mut() {
        column.reserve(table.n_rows());
    }

    for record in &table.records {
        for dim in Dimension::ALL {
            columns[dim.index()].push(record.median(dim));
        }
    }

    let aggregated = AggregatedAnnotations { columns };
    tracing::debug!(
        "aggregated {} rows over {} dimensions",
        aggregated.n_rows(),
        Dimension::ALL.len()
    );
    aggregated
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_aggregate.rs"]
mod tests;
