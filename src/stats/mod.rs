pub mod dist;

use serde::Serialize;

use crate::error::{PrismError, Result};
use dist::student_t_two_sided;

const TINY: f64 = 1.0e-20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    pub r_value: f64,
    pub r_squared: f64,
    pub p_value: f64,
    pub std_err: f64,
    pub intercept_std_err: f64,
}

impl RegressionResult {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Standard median: middle value, or mean of the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

struct Moments {
    n: f64,
    x_mean: f64,
    y_mean: f64,
    ssx: f64,
    ssy: f64,
    ssxy: f64,
}

fn moments(x: &[f64], y: &[f64]) -> Moments {
    let n = x.len() as f64;
    let x_mean = mean(x);
    let y_mean = mean(y);
    let mut ssx = 0.0;
    let mut ssy = 0.0;
    let mut ssxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        ssx += dx * dx;
        ssy += dy * dy;
        ssxy += dx * dy;
    }
    Moments {
        n,
        x_mean,
        y_mean,
        ssx: ssx / n,
        ssy: ssy / n,
        ssxy: ssxy / n,
    }
}

/// Pearson correlation; `None` when either side has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let m = moments(x, y);
    let denom = (m.ssx * m.ssy).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((m.ssxy / denom).clamp(-1.0, 1.0))
}

/// Ordinary least squares of `y` on `x`.
pub fn linregress(x: &[f64], y: &[f64]) -> Result<RegressionResult> {
    if x.len() != y.len() {
        return Err(PrismError::Statistics(format!(
            "length mismatch: x has {} values, y has {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(PrismError::Statistics(format!(
            "regression needs at least 2 points, got {}",
            x.len()
        )));
    }

    let m = moments(x, y);
    if m.ssx == 0.0 {
        return Err(PrismError::Statistics(
            "all x values are identical; slope is undefined".to_string(),
        ));
    }

    let r_den = (m.ssx * m.ssy).sqrt();
    let r = if r_den == 0.0 {
        0.0
    } else {
        (m.ssxy / r_den).clamp(-1.0, 1.0)
    };

    let slope = m.ssxy / m.ssx;
    let intercept = m.y_mean - slope * m.x_mean;

    let (p_value, std_err) = if x.len() == 2 {
        let p = if y[0] == y[1] { 1.0 } else { 0.0 };
        (p, 0.0)
    } else {
        let df = m.n - 2.0;
        let t = r * (df / ((1.0 - r + TINY) * (1.0 + r + TINY))).sqrt();
        let p = student_t_two_sided(t, df);
        let se = ((1.0 - r * r) * m.ssy / m.ssx / df).max(0.0).sqrt();
        (p, se)
    };
    let sum_x2 = x.iter().map(|v| v * v).sum::<f64>();
    let intercept_std_err = std_err * (sum_x2 / m.n).sqrt();

    Ok(RegressionResult {
        slope,
        intercept,
        r_value: r,
        r_squared: r * r,
        p_value,
        std_err,
        intercept_std_err,
    })
}

/// Pairwise Pearson matrix over columns; constant columns yield NaN.
pub fn correlation_matrix(columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let k = columns.len();
    let mut out = vec![vec![f64::NAN; k]; k];
    for i in 0..k {
        for j in i..k {
            let value = if i == j {
                if pearson(&columns[i], &columns[j]).is_some() {
                    1.0
                } else {
                    f64::NAN
                }
            } else {
                pearson(&columns[i], &columns[j]).unwrap_or(f64::NAN)
            };
            out[i][j] = value;
            out[j][i] = value;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/stats/mod.rs"]
mod tests;
