use std::io::Read;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{PrismError, Result};
use crate::input::{Record, RecordReader};
use crate::report::format_float;
use crate::scorer::Scorer;

const PROGRESS_EVERY: usize = 100;

/// Scored rows kept in memory for the downstream stages.
#[derive(Debug, Clone)]
pub struct ScoredTable {
    pub header: Vec<String>,
    pub records: Vec<Record>,
    pub scores: Vec<f64>,
}

impl ScoredTable {
    pub fn n_rows(&self) -> usize {
        self.records.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.records.iter().zip(&self.scores).map(|(record, &score)| {
            let mut row: Vec<String> = record.raw.iter().map(|s| s.to_string()).collect();
            row.push(format_float(score));
            row
        })
    }
}

pub fn run_stage1(input: &Path, output: &Path, scorer: &mut dyn Scorer) -> Result<ScoredTable> {
    let reader = RecordReader::open(input)?;
    let table = score_records(reader, scorer)?;
    write_scored_tsv(output, &table)?;
    tracing::info!(
        "wrote {} scored rows to {}",
        table.n_rows(),
        output.display()
    );
    Ok(table)
}

pub fn score_records<R: Read>(
    reader: RecordReader<R>,
    scorer: &mut dyn Scorer,
) -> Result<ScoredTable> {
    let header = reader.schema().scored_header();
    let mut records = Vec::new();
    let mut scores = Vec::new();

    for record in reader {
        let record = record?;
        let score = scorer
            .score(&record.candidate, &record.reference)
            .map_err(|e| PrismError::Scoring {
                row: record.row,
                message: e.to_string(),
            })?;
        if !score.is_finite() {
            return Err(PrismError::Scoring {
                row: record.row,
                message: format!("scorer returned non-finite value {score}"),
            });
        }
        tracing::trace!("row {}: prism_score={}", record.row, score);
        if record.row % PROGRESS_EVERY == 0 {
            tracing::debug!("scored {} rows", record.row);
        }
        records.push(record);
        scores.push(score);
    }

    Ok(ScoredTable {
        header,
        records,
        scores,
    })
}

pub fn write_scored_tsv(path: &Path, table: &ScoredTable) -> Result<()> {
    let mut w = WriterBuilder::new()
        .delimiter(b'\t')
        .quote(b'"')
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_path(path)?;
    w.write_record(&table.header)?;
    for row in table.rows() {
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_score.rs"]
mod tests;
