use super::{ScoreError, Scorer};

/// Deterministic scorer: hands out `scores` in call order, failing on `fail_on_call`.
pub struct FixedScorer {
    pub scores: Vec<f64>,
    pub fail_on_call: Option<usize>,
    pub calls: Vec<(String, String)>,
}

impl FixedScorer {
    pub fn new(scores: Vec<f64>) -> Self {
        FixedScorer {
            scores,
            fail_on_call: None,
            calls: Vec::new(),
        }
    }

    pub fn failing_on(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }
}

impl Scorer for FixedScorer {
    fn score(&mut self, candidate: &str, reference: &str) -> Result<f64, ScoreError> {
        let call = self.calls.len();
        self.calls.push((candidate.to_string(), reference.to_string()));
        if self.fail_on_call == Some(call) {
            return Err(ScoreError(format!("stub failure on call {call}")));
        }
        self.scores
            .get(call)
            .copied()
            .ok_or_else(|| ScoreError(format!("no stub score for call {call}")))
    }
}
