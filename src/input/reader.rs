use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::annotations::aggregate;
use crate::error::{PrismError, Result};
use crate::input::schema::{CAND_COLUMN, REF_COLUMN};
use crate::input::{Dimension, Record, Schema, open_maybe_gz};

/// Single forward pass over a tab-separated, `"`-quoted record file.
pub struct RecordReader<R: Read> {
    inner: csv::Reader<R>,
    schema: Schema,
    buf: StringRecord,
    row: usize,
}

impl RecordReader<Box<dyn Read>> {
    pub fn open(path: &Path) -> Result<Self> {
        let source = open_maybe_gz(path)?;
        tracing::debug!("opened record file {}", path.display());
        RecordReader::from_reader(source)
    }
}

impl<R: Read> RecordReader<R> {
    pub fn from_reader(source: R) -> Result<Self> {
        let mut inner = ReaderBuilder::new()
            .delimiter(b'\t')
            .quote(b'"')
            .has_headers(true)
            .from_reader(source);
        let header = inner.headers()?.clone();
        let schema = Schema::from_header(&header)?;
        Ok(RecordReader {
            inner,
            schema,
            buf: StringRecord::new(),
            row: 0,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    fn build_record(&self, raw: StringRecord) -> Result<Record> {
        let row = self.row;
        let field = |idx: usize| raw.get(idx).unwrap_or("");

        let reference = field(self.schema.ref_idx).to_string();
        let candidate = field(self.schema.cand_idx).to_string();
        for (name, value) in [(REF_COLUMN, &reference), (CAND_COLUMN, &candidate)] {
            if value.is_empty() {
                return Err(PrismError::Parse {
                    row,
                    column: name.to_string(),
                    message: "empty text".to_string(),
                });
            }
        }

        let mut medians = [0.0; 6];
        for dim in Dimension::ALL {
            let cell = field(self.schema.column_of(dim));
            medians[dim.index()] = aggregate(cell).map_err(|e| PrismError::Parse {
                row,
                column: dim.name().to_string(),
                message: e.to_string(),
            })?;
        }

        Ok(Record {
            row,
            reference,
            candidate,
            medians,
            raw,
        })
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.read_record(&mut self.buf) {
            Ok(false) => None,
            Ok(true) => {
                self.row += 1;
                let raw = std::mem::take(&mut self.buf);
                Some(self.build_record(raw))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}
