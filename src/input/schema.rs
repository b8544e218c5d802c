use csv::StringRecord;

use crate::error::{PrismError, Result};

pub const REF_COLUMN: &str = "ref";
pub const CAND_COLUMN: &str = "cand";
pub const SCORE_COLUMN: &str = "prism_score";

/// Human-judgment axes, in the fixed order used for regression and plotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Understandable,
    Natural,
    MaintainsContext,
    Engaging,
    UsesKnowledge,
    Overall,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Understandable,
        Dimension::Natural,
        Dimension::MaintainsContext,
        Dimension::Engaging,
        Dimension::UsesKnowledge,
        Dimension::Overall,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Understandable => "understandable",
            Dimension::Natural => "natural",
            Dimension::MaintainsContext => "maintains_context",
            Dimension::Engaging => "engaging",
            Dimension::UsesKnowledge => "uses_knowledge",
            Dimension::Overall => "overall",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Column positions resolved once from the header row.
#[derive(Debug, Clone)]
pub struct Schema {
    pub header: Vec<String>,
    pub ref_idx: usize,
    pub cand_idx: usize,
    pub dimension_idx: [usize; 6],
}

impl Schema {
    pub fn from_header(header: &StringRecord) -> Result<Self> {
        let columns: Vec<String> = header.iter().map(|s| s.to_string()).collect();
        let find = |name: &str| columns.iter().position(|c| c == name);

        let mut missing = Vec::new();
        let ref_idx = find(REF_COLUMN);
        if ref_idx.is_none() {
            missing.push(REF_COLUMN);
        }
        let cand_idx = find(CAND_COLUMN);
        if cand_idx.is_none() {
            missing.push(CAND_COLUMN);
        }
        let mut dimension_idx = [0usize; 6];
        for dim in Dimension::ALL {
            match find(dim.name()) {
                Some(idx) => dimension_idx[dim.index()] = idx,
                None => missing.push(dim.name()),
            }
        }

        match (ref_idx, cand_idx) {
            (Some(ref_idx), Some(cand_idx)) if missing.is_empty() => Ok(Schema {
                header: columns,
                ref_idx,
                cand_idx,
                dimension_idx,
            }),
            _ => Err(PrismError::Schema(format!(
                "missing required column(s): {}",
                missing.join(", ")
            ))),
        }
    }

    pub fn column_of(&self, dim: Dimension) -> usize {
        self.dimension_idx[dim.index()]
    }

    /// Header of the scored output: original columns then `prism_score`.
    pub fn scored_header(&self) -> Vec<String> {
        let mut out = self.header.clone();
        out.push(SCORE_COLUMN.to_string());
        out
    }
}
