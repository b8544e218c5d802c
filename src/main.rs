mod annotations;
mod config;
mod error;
mod input;
mod logging;
mod pipeline;
mod report;
mod scorer;
mod stats;

use clap::Parser;

use crate::config::{Cli, RunConfig};
use crate::error::Result;
use crate::pipeline::stage1_score::run_stage1;
use crate::pipeline::stage2_aggregate::run_stage2;
use crate::pipeline::stage3_correlate::run_stage3;
use crate::pipeline::stage4_plot::{Stage4Inputs, annotation_correlation, run_stage4};
use crate::report::json::{DimensionSummary, RunSummary, correlation_cells, write_summary_json};
use crate::scorer::{Scorer, load_scorer};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = RunConfig::from_cli(cli);
    tracing::debug!(
        "log level {}, config {:?}",
        logging::level_name(config.verbose),
        config
    );
    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(config: &RunConfig) -> Result<()> {
    let scorer_config = config.scorer_config()?;
    let mut scorer = load_scorer(&scorer_config)?;
    run_with_scorer(config, scorer.as_mut())
}

fn run_with_scorer(config: &RunConfig, scorer: &mut dyn Scorer) -> Result<()> {
    tracing::info!("getting scores");
    let table = run_stage1(config.input()?, config.scores_out()?, scorer)?;

    tracing::info!("getting correlations");
    let aggregated = run_stage2(&table);
    let correlations = run_stage3(&aggregated, &table.scores)?;

    run_stage4(&Stage4Inputs {
        aggregated: &aggregated,
        correlations: &correlations,
        scores: &table.scores,
        scatter_path: config.scatter_out()?,
        heatmap_path: config.heatmap_out()?,
    })?;

    if let Some(path) = &config.summary_out {
        let matrix = annotation_correlation(&aggregated);
        let summary = RunSummary {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            n_rows: table.n_rows(),
            dimensions: correlations
                .fits
                .iter()
                .map(|fit| DimensionSummary {
                    dimension: fit.dimension.name(),
                    regression: fit.result,
                })
                .collect(),
            annotation_correlation: correlation_cells(&matrix),
        };
        write_summary_json(path, &summary)?;
        tracing::info!("wrote summary to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
