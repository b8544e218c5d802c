use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

use super::*;
use crate::error::PrismError;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("prism_corr_input_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(path: &Path, contents: &str) {
    let mut f = BufWriter::new(File::create(path).unwrap());
    f.write_all(contents.as_bytes()).unwrap();
}

const HEADER: &str =
    "id\tref\tcand\tunderstandable\tnatural\tmaintains_context\tengaging\tuses_knowledge\toverall\n";

fn sample_tsv() -> String {
    let mut s = HEADER.to_string();
    s.push_str("a\thello there\thi there\t[4,5]\t[3]\t[1,2,3]\t[2,2]\t[0,1]\t[5,4,3]\n");
    s.push_str("b\t\"quoted\ttab\"\tplain\t[3,4,4]\t[2]\t[1]\t[3]\t[1]\t[2]\n");
    s
}

#[test]
fn test_reads_records_in_order() {
    let dir = make_temp_dir();
    let path = dir.join("in.tsv");
    write_file(&path, &sample_tsv());

    let reader = RecordReader::open(&path).unwrap();
    assert_eq!(reader.schema().header.len(), 9);
    let records: Vec<Record> = reader.map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].row, 1);
    assert_eq!(records[0].reference, "hello there");
    assert_eq!(records[0].candidate, "hi there");
    assert_eq!(records[0].median(Dimension::Understandable), 4.5);
    assert_eq!(records[0].median(Dimension::Overall), 4.0);
    assert_eq!(records[0].median(Dimension::UsesKnowledge), 0.5);
    assert_eq!(records[0].raw.get(0), Some("a"));

    assert_eq!(records[1].row, 2);
    assert_eq!(records[1].reference, "quoted\ttab");
    assert_eq!(records[1].median(Dimension::MaintainsContext), 1.0);
    assert_eq!(records[1].median(Dimension::Understandable), 4.0);
}

#[test]
fn test_columns_resolved_by_name_not_position() {
    let tsv = "overall\tcand\tuses_knowledge\tengaging\tref\tmaintains_context\tnatural\tunderstandable\n\
               [1]\tc\t[2]\t[3]\tr\t[4]\t[5]\t[6]\n";
    let reader = RecordReader::from_reader(tsv.as_bytes()).unwrap();
    let record = reader.into_iter().next().unwrap().unwrap();
    assert_eq!(record.reference, "r");
    assert_eq!(record.candidate, "c");
    assert_eq!(record.median(Dimension::Understandable), 6.0);
    assert_eq!(record.median(Dimension::Overall), 1.0);
}

#[test]
fn test_missing_column_is_schema_error() {
    let tsv = "ref\tcand\tunderstandable\tnatural\tengaging\tuses_knowledge\toverall\n";
    match RecordReader::from_reader(tsv.as_bytes()) {
        Err(PrismError::Schema(msg)) => assert!(msg.contains("maintains_context")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected schema error"),
    }
}

#[test]
fn test_empty_file_is_schema_error() {
    assert!(matches!(
        RecordReader::from_reader("".as_bytes()),
        Err(PrismError::Schema(_))
    ));
}

#[test]
fn test_malformed_annotation_reports_row_and_column() {
    let mut tsv = HEADER.to_string();
    tsv.push_str("a\tr\tc\t[1]\t[1]\t[1]\t[1]\t[1]\t[1]\n");
    tsv.push_str("b\tr\tc\t[1]\tnope\t[1]\t[1]\t[1]\t[1]\n");
    let mut reader = RecordReader::from_reader(tsv.as_bytes()).unwrap();
    assert!(reader.next().unwrap().is_ok());
    match reader.next().unwrap() {
        Err(PrismError::Parse { row, column, .. }) => {
            assert_eq!(row, 2);
            assert_eq!(column, "natural");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_empty_reference_rejected() {
    let mut tsv = HEADER.to_string();
    tsv.push_str("a\t\"\"\tc\t[1]\t[1]\t[1]\t[1]\t[1]\t[1]\n");
    let mut reader = RecordReader::from_reader(tsv.as_bytes()).unwrap();
    match reader.next().unwrap() {
        Err(PrismError::Parse { column, .. }) => assert_eq!(column, "ref"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_gzip_input_is_decoded() {
    let dir = make_temp_dir();
    let path = dir.join("in.tsv.gz");
    let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    enc.write_all(sample_tsv().as_bytes()).unwrap();
    enc.finish().unwrap();

    let records: Vec<Record> = RecordReader::open(&path)
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].candidate, "plain");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = make_temp_dir();
    assert!(matches!(
        RecordReader::open(&dir.join("absent.tsv")),
        Err(PrismError::Io(_))
    ));
}

#[test]
fn test_scored_header_appends_score_column() {
    let tsv = sample_tsv();
    let reader = RecordReader::from_reader(tsv.as_bytes()).unwrap();
    let header = reader.schema().scored_header();
    assert_eq!(header.len(), 10);
    assert_eq!(header.last().map(String::as_str), Some("prism_score"));
    assert_eq!(header[1], "ref");
}
