use super::*;
use crate::input::RecordReader;
use crate::pipeline::stage1_score::score_records;
use crate::pipeline::stage2_aggregate::run_stage2;
use crate::scorer::stub::FixedScorer;

const HEADER: &str =
    "ref\tcand\tunderstandable\tnatural\tmaintains_context\tengaging\tuses_knowledge\toverall\n";

fn aggregated(rows: &[&str]) -> AggregatedAnnotations {
    let mut tsv = HEADER.to_string();
    for row in rows {
        tsv.push_str(row);
        tsv.push('\n');
    }
    let reader = RecordReader::from_reader(tsv.as_bytes()).unwrap();
    let table = score_records(reader, &mut FixedScorer::new(vec![0.0; rows.len()])).unwrap();
    run_stage2(&table)
}

#[test]
fn test_fits_in_fixed_dimension_order() {
    let agg = aggregated(&[
        "r\tc\t[1]\t[4]\t[1]\t[2]\t[1]\t[3]",
        "r\tc\t[2]\t[3]\t[2]\t[1]\t[3]\t[3,4]",
        "r\tc\t[3]\t[2]\t[4]\t[4]\t[2]\t[5]",
        "r\tc\t[4]\t[1]\t[3]\t[3]\t[4]\t[6]",
    ]);
    let scores = [2.0, 4.0, 6.0, 8.0];
    let out = run_stage3(&agg, &scores).unwrap();

    let order: Vec<Dimension> = out.fits.iter().map(|f| f.dimension).collect();
    assert_eq!(order, Dimension::ALL.to_vec());

    let understandable = out.fit(Dimension::Understandable).unwrap();
    assert!((understandable.slope - 2.0).abs() < 1e-12);
    assert!(understandable.intercept.abs() < 1e-12);
    assert!((understandable.r_squared - 1.0).abs() < 1e-12);
    assert!(understandable.p_value < 1e-9);

    let natural = out.fit(Dimension::Natural).unwrap();
    assert!((natural.slope + 2.0).abs() < 1e-12);
}

#[test]
fn test_constant_dimension_fails() {
    let agg = aggregated(&[
        "r\tc\t[5]\t[4]\t[1]\t[2]\t[1]\t[3]",
        "r\tc\t[5]\t[3]\t[2]\t[1]\t[3]\t[4]",
        "r\tc\t[4,6]\t[2]\t[4]\t[4]\t[2]\t[5]",
    ]);
    match run_stage3(&agg, &[1.0, 2.0, 3.0]) {
        Err(PrismError::Statistics(msg)) => assert!(msg.starts_with("understandable")),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_single_row_fails() {
    let agg = aggregated(&["r\tc\t[1]\t[4]\t[1]\t[2]\t[1]\t[3]"]);
    assert!(matches!(
        run_stage3(&agg, &[0.5]),
        Err(PrismError::Statistics(_))
    ));
}
