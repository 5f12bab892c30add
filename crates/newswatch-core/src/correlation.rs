//! Pairwise Pearson correlation of daily returns

use crate::error::{CoreError, Result};
use crate::model::PriceBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Symmetric correlation matrix, rows and columns in `symbols` order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub symbols: Vec<String>,
    pub values: Vec<Vec<f64>>,
    /// Number of return rows the coefficients were computed from
    pub observations: usize,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.symbols.iter().position(|s| s == a)?;
        let j = self.symbols.iter().position(|s| s == b)?;
        Some(self.values[i][j])
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Day-over-day fractional change; one element shorter than the input
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect()
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        return f64::NAN;
    }
    (cov / denominator).clamp(-1.0, 1.0)
}

/// Correlate the daily returns of several tickers.
///
/// Tickers with no bars are dropped. The remaining series are restricted to
/// the dates every one of them has, returns are computed over those dates and
/// the first (undefined) row is discarded. Needs two tickers and two return
/// rows.
pub fn correlate<S, B>(series: impl IntoIterator<Item = (S, B)>) -> Result<CorrelationMatrix>
where
    S: Into<String>,
    B: AsRef<[PriceBar]>,
{
    let series: Vec<(String, BTreeMap<NaiveDate, f64>)> = series
        .into_iter()
        .map(|(symbol, bars)| {
            let closes: BTreeMap<NaiveDate, f64> =
                bars.as_ref().iter().map(|bar| (bar.date, bar.close)).collect();
            (symbol.into(), closes)
        })
        .filter(|(_, closes)| !closes.is_empty())
        .collect();

    if series.len() < 2 {
        return Err(CoreError::InsufficientData(format!(
            "need at least two stocks with data for correlation, got {}",
            series.len()
        )));
    }

    let mut shared: BTreeSet<NaiveDate> = series[0].1.keys().copied().collect();
    for (_, closes) in &series[1..] {
        shared.retain(|date| closes.contains_key(date));
    }

    let returns: Vec<Vec<f64>> = series
        .iter()
        .map(|(_, closes)| {
            let aligned: Vec<f64> = shared.iter().map(|date| closes[date]).collect();
            daily_returns(&aligned)
        })
        .collect();

    let observations = returns.first().map_or(0, Vec::len);
    if observations < 2 {
        return Err(CoreError::InsufficientData(format!(
            "need at least two overlapping return rows, got {observations}"
        )));
    }

    let n = series.len();
    let mut values = vec![vec![1.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let r = pearson(&returns[i], &returns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        symbols: series.into_iter().map(|(symbol, _)| symbol).collect(),
        values,
        observations,
    })
}
