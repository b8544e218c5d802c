use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::StringRecord;
use flate2::read::MultiGzDecoder;

pub mod reader;
pub mod schema;

pub use reader::RecordReader;
pub use schema::{Dimension, Schema};

/// One input row. `raw` keeps every original column for the scored output;
/// `medians` holds each dimension's aggregated annotator rating.
#[derive(Debug, Clone)]
pub struct Record {
    pub row: usize,
    pub reference: String,
    pub candidate: String,
    pub medians: [f64; 6],
    pub raw: StringRecord,
}

impl Record {
    pub fn median(&self, dim: Dimension) -> f64 {
        self.medians[dim.index()]
    }
}

pub fn open_maybe_gz(path: &Path) -> std::io::Result<Box<dyn Read>> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(MultiGzDecoder::new(BufReader::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
