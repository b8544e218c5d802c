use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};

use crate::error::{PrismError, Result};
use crate::scorer::{DEFAULT_LANG, ScorerConfig};

#[derive(Debug, Parser)]
#[command(
    name = "prism-corr",
    version,
    about = "Score reference/candidate pairs with PRISM and correlate against median human annotations."
)]
pub struct Cli {
    /// Input TSV with ref, cand and the six annotation columns.
    #[arg(short = 'd', long = "datadir")]
    pub datadir: Option<PathBuf>,

    /// Where to write the input rows plus a prism_score column.
    #[arg(short = 'o', long = "outputdir")]
    pub outputdir: Option<PathBuf>,

    /// Where to write the 2x3 scatter/fit figure.
    #[arg(short = 'p', long = "plotdir")]
    pub plotdir: Option<PathBuf>,

    /// Where to write the annotation correlation heatmap.
    #[arg(short = 'm', long = "heatmapdir")]
    pub heatmapdir: Option<PathBuf>,

    /// PRISM model directory (model.onnx + tokenizer.json).
    #[arg(long = "model-dir", env = "MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_LANG)]
    pub lang: String,

    /// Optional JSON dump of the regression results.
    #[arg(short = 's', long)]
    pub summary: Option<PathBuf>,

    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: Option<PathBuf>,
    pub scores_out: Option<PathBuf>,
    pub scatter_out: Option<PathBuf>,
    pub heatmap_out: Option<PathBuf>,
    pub summary_out: Option<PathBuf>,
    pub model_dir: Option<PathBuf>,
    pub lang: String,
    pub verbose: u8,
}

impl RunConfig {
    pub fn from_cli(cli: Cli) -> Self {
        RunConfig {
            input: cli.datadir,
            scores_out: cli.outputdir,
            scatter_out: cli.plotdir,
            heatmap_out: cli.heatmapdir,
            summary_out: cli.summary,
            model_dir: cli.model_dir,
            lang: cli.lang,
            verbose: cli.verbose,
        }
    }

    pub fn scorer_config(&self) -> Result<ScorerConfig> {
        ScorerConfig::new(self.model_dir.clone(), &self.lang)
    }

    pub fn input(&self) -> Result<&Path> {
        required(&self.input, "--datadir")
    }

    pub fn scores_out(&self) -> Result<&Path> {
        required(&self.scores_out, "--outputdir")
    }

    pub fn scatter_out(&self) -> Result<&Path> {
        required(&self.scatter_out, "--plotdir")
    }

    pub fn heatmap_out(&self) -> Result<&Path> {
        required(&self.heatmap_out, "--heatmapdir")
    }
}

fn required<'a>(path: &'a Option<PathBuf>, flag: &str) -> Result<&'a Path> {
    path.as_deref().ok_or_else(|| PrismError::missing_path(flag))
}

#[cfg(test)]
#[path = "../tests/src_inline/config.rs"]
mod tests;
