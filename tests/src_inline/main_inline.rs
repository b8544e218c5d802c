use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::error::PrismError;
use crate::scorer::stub::FixedScorer;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("prism_corr_main_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

const INPUT: &str = "id\tref\tcand\tunderstandable\tnatural\tmaintains_context\tengaging\tuses_knowledge\toverall\n\
1\tthe cat sat\ta cat sat\t[4,5]\t[4]\t[3,5]\t[2]\t[1,2]\t[4]\n\
2\tit is raining\tit rains\t[3,4,4]\t[2]\t[2]\t[3]\t[3]\t[3,3]\n\
3\thello\thi\t[5,5]\t[5,4]\t[4]\t[5]\t[2]\t[5]\n";

fn config_in(dir: &std::path::Path, with_summary: bool) -> RunConfig {
    let input = dir.join("in.tsv");
    fs::write(&input, INPUT).unwrap();
    RunConfig {
        input: Some(input),
        scores_out: Some(dir.join("scores.tsv")),
        scatter_out: Some(dir.join("corr.svg")),
        heatmap_out: Some(dir.join("heat.svg")),
        summary_out: with_summary.then(|| dir.join("summary.json")),
        model_dir: None,
        lang: "en".to_string(),
        verbose: 0,
    }
}

#[test]
fn test_end_to_end_with_stub_scorer() {
    let dir = make_temp_dir();
    let config = config_in(&dir, true);
    let mut scorer = FixedScorer::new(vec![0.8, 0.6, 0.9]);
    run_with_scorer(&config, &mut scorer).unwrap();

    let scores = fs::read_to_string(dir.join("scores.tsv")).unwrap();
    let mut lines = scores.lines();
    assert!(lines.next().unwrap().ends_with("\toverall\tprism_score"));
    let written: Vec<&str> = lines.map(|l| l.rsplit('\t').next().unwrap()).collect();
    assert_eq!(written, vec!["0.8", "0.6", "0.9"]);

    assert!(dir.join("corr.svg").exists());
    assert!(dir.join("heat.svg").exists());

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary["n_rows"], 3);
    assert_eq!(summary["dimensions"].as_array().unwrap().len(), 6);
    assert_eq!(summary["dimensions"][0]["dimension"], "understandable");
}

#[test]
fn test_missing_input_flag_fails_before_writing() {
    let dir = make_temp_dir();
    let mut config = config_in(&dir, false);
    config.input = None;
    let mut scorer = FixedScorer::new(vec![]);
    assert!(matches!(
        run_with_scorer(&config, &mut scorer),
        Err(PrismError::Io(_))
    ));
    assert!(!dir.join("scores.tsv").exists());
    assert!(scorer.calls.is_empty());
}

#[test]
fn test_missing_model_dir_is_model_init_error() {
    let dir = make_temp_dir();
    let config = config_in(&dir, false);
    assert!(matches!(run(&config), Err(PrismError::ModelInit(_))));
    assert!(!dir.join("scores.tsv").exists());
}

#[test]
fn test_scoring_failure_aborts_run() {
    let dir = make_temp_dir();
    let config = config_in(&dir, false);
    let mut scorer = FixedScorer::new(vec![0.8, 0.6, 0.9]).failing_on(2);
    assert!(matches!(
        run_with_scorer(&config, &mut scorer),
        Err(PrismError::Scoring { row: 3, .. })
    ));
    assert!(!dir.join("corr.svg").exists());
}
