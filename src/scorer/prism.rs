use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::TensorRef;
use tokenizers::Tokenizer;

use crate::error::{PrismError, Result};
use crate::scorer::{ScoreError, Scorer, ScorerConfig};

const EOS_TOKEN: &str = "</s>";

/// PRISM scored by forced decoding through a seq2seq ONNX graph.
///
/// The graph takes `input_ids`, `attention_mask` and `decoder_input_ids`
/// (all `[1, len]` i64) and returns `logits` as `[1, target_len, vocab]`.
/// A direction score is the mean log-probability of the target tokens,
/// the leading language tag excluded; the segment score averages the
/// candidate|reference and reference|candidate directions.
pub struct PrismModel {
    session: Session,
    tokenizer: Tokenizer,
    lang_id: i64,
    eos_id: i64,
}

impl PrismModel {
    pub fn load(config: &ScorerConfig) -> Result<Self> {
        ort::init()
            .with_name("prism-corr")
            .commit()
            .map_err(|e| PrismError::ModelInit(format!("failed to initialize ONNX Runtime: {e}")))?;

        let model_path = config.model_path();
        let session = Session::builder()
            .map_err(|e| PrismError::ModelInit(format!("failed to create session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level1)
            .map_err(|e| PrismError::ModelInit(format!("failed to set optimization level: {e}")))?
            .with_intra_threads(1)
            .map_err(|e| PrismError::ModelInit(format!("failed to set thread count: {e}")))?
            .commit_from_file(&model_path)
            .map_err(|e| {
                PrismError::ModelInit(format!("failed to load {}: {e}", model_path.display()))
            })?;

        let tokenizer_path = config.tokenizer_path();
        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            PrismError::ModelInit(format!("failed to load {}: {e}", tokenizer_path.display()))
        })?;

        let lang_tag = config.lang_tag();
        let lang_id = tokenizer.token_to_id(&lang_tag).ok_or_else(|| {
            PrismError::ModelInit(format!("tokenizer has no language tag {lang_tag}"))
        })?;
        let eos_id = tokenizer
            .token_to_id(EOS_TOKEN)
            .ok_or_else(|| PrismError::ModelInit(format!("tokenizer has no {EOS_TOKEN} token")))?;

        tracing::info!(
            "loaded PRISM model from {} (lang {})",
            config.model_dir.display(),
            config.lang
        );

        Ok(PrismModel {
            session,
            tokenizer,
            lang_id: lang_id as i64,
            eos_id: eos_id as i64,
        })
    }

    fn encode(&self, text: &str) -> std::result::Result<Vec<i64>, ScoreError> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| ScoreError(format!("failed to tokenize: {e}")))?;
        Ok(encoding.get_ids().iter().map(|&id| id as i64).collect())
    }

    fn direction_score(
        &mut self,
        source: &str,
        target: &str,
    ) -> std::result::Result<f64, ScoreError> {
        let mut source_ids = self.encode(source)?;
        source_ids.push(self.eos_id);

        let mut target_ids = Vec::with_capacity(source_ids.len() + 2);
        target_ids.push(self.lang_id);
        target_ids.extend(self.encode(target)?);
        target_ids.push(self.eos_id);

        let decoder_ids = shift_right(&target_ids, self.eos_id);
        let mask = vec![1i64; source_ids.len()];

        let src_tensor = TensorRef::from_array_view(([1usize, source_ids.len()], &*source_ids))
            .map_err(ort_err)?;
        let mask_tensor =
            TensorRef::from_array_view(([1usize, mask.len()], &*mask)).map_err(ort_err)?;
        let dec_tensor = TensorRef::from_array_view(([1usize, decoder_ids.len()], &*decoder_ids))
            .map_err(ort_err)?;

        let outputs = self
            .session
            .run(ort::inputs![
                "input_ids" => src_tensor,
                "attention_mask" => mask_tensor,
                "decoder_input_ids" => dec_tensor
            ])
            .map_err(ort_err)?;

        let logits = outputs
            .get("logits")
            .ok_or_else(|| ScoreError("model produced no `logits` output".to_string()))?
            .try_extract_array::<f32>()
            .map_err(ort_err)?
            .into_dimensionality::<ndarray::Ix3>()
            .map_err(|e| ScoreError(format!("unexpected logits shape: {e}")))?;

        let steps = logits.shape()[1];
        if steps != target_ids.len() {
            return Err(ScoreError(format!(
                "logits cover {steps} positions, expected {}",
                target_ids.len()
            )));
        }

        let batch = logits.index_axis(ndarray::Axis(0), 0);
        let mut token_scores = Vec::with_capacity(steps);
        for (pos, &token) in target_ids.iter().enumerate() {
            let step: Vec<f32> = batch.index_axis(ndarray::Axis(0), pos).iter().copied().collect();
            token_scores.push(log_prob(&step, token as usize)?);
        }
        Ok(mean_skip_first(&token_scores))
    }
}

impl Scorer for PrismModel {
    fn score(&mut self, candidate: &str, reference: &str) -> std::result::Result<f64, ScoreError> {
        let cand_given_ref = self.direction_score(reference, candidate)?;
        let ref_given_cand = self.direction_score(candidate, reference)?;
        Ok(0.5 * (cand_given_ref + ref_given_cand))
    }
}

fn ort_err(e: impl std::fmt::Display) -> ScoreError {
    ScoreError(format!("ONNX Runtime: {e}"))
}

/// Teacher-forcing decoder input: `</s>` followed by the target minus its last token.
pub(crate) fn shift_right(target: &[i64], start: i64) -> Vec<i64> {
    let mut out = Vec::with_capacity(target.len());
    out.push(start);
    out.extend_from_slice(&target[..target.len().saturating_sub(1)]);
    out
}

pub(crate) fn log_prob(logits: &[f32], token: usize) -> std::result::Result<f64, ScoreError> {
    let Some(&picked) = logits.get(token) else {
        return Err(ScoreError(format!(
            "token id {token} outside vocabulary of {}",
            logits.len()
        )));
    };
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max) as f64;
    let sum: f64 = logits.iter().map(|&v| (v as f64 - max).exp()).sum();
    Ok(picked as f64 - max - sum.ln())
}

pub(crate) fn mean_skip_first(values: &[f64]) -> f64 {
    let rest = values.get(1..).unwrap_or(&[]);
    if rest.is_empty() {
        return 0.0;
    }
    rest.iter().sum::<f64>() / rest.len() as f64
}

#[cfg(test)]
#[path = "../../tests/src_inline/scorer/prism.rs"]
mod tests;
