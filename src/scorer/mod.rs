use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::{PrismError, Result};

#[cfg(feature = "onnx")]
pub mod prism;

#[cfg(feature = "onnx")]
pub use prism::PrismModel;

pub const DEFAULT_LANG: &str = "en";
pub const MODEL_FILE: &str = "model.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

#[derive(Debug, Error)]
#[error("{0}")]
pub struct ScoreError(pub String);

/// Similarity scorer for one reference/candidate pair.
pub trait Scorer {
    fn score(&mut self, candidate: &str, reference: &str) -> std::result::Result<f64, ScoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorerConfig {
    pub model_dir: PathBuf,
    pub lang: String,
}

impl ScorerConfig {
    pub fn new(model_dir: Option<PathBuf>, lang: &str) -> Result<Self> {
        let model_dir = model_dir.ok_or_else(|| {
            PrismError::ModelInit("no model directory given (--model-dir or MODEL_DIR)".to_string())
        })?;
        if lang.trim().is_empty() {
            return Err(PrismError::ModelInit("language tag is empty".to_string()));
        }
        Ok(ScorerConfig {
            model_dir,
            lang: lang.trim().to_string(),
        })
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(MODEL_FILE)
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.model_dir.join(TOKENIZER_FILE)
    }

    /// `<en>` style target-language tag.
    pub fn lang_tag(&self) -> String {
        format!("<{}>", self.lang)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.model_dir.is_dir() {
            return Err(PrismError::ModelInit(format!(
                "model directory {} does not exist",
                self.model_dir.display()
            )));
        }
        for path in [self.model_path(), self.tokenizer_path()] {
            require_file(&path)?;
        }
        Ok(())
    }
}

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PrismError::ModelInit(format!(
            "missing model asset {}",
            path.display()
        )))
    }
}

pub fn load_scorer(config: &ScorerConfig) -> Result<Box<dyn Scorer>> {
    config.validate()?;
    #[cfg(feature = "onnx")]
    {
        let model = PrismModel::load(config)?;
        Ok(Box::new(model))
    }
    #[cfg(not(feature = "onnx"))]
    {
        Err(PrismError::ModelInit(
            "built without the `onnx` feature; no scoring backend available".to_string(),
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/scorer/stub.rs"]
pub(crate) mod stub;

#[cfg(test)]
#[path = "../../tests/src_inline/scorer/mod.rs"]
mod tests;
