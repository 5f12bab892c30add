//! Top-gainer ranking

use crate::model::PriceBar;
use serde::{Deserialize, Serialize};

/// Most recent day-over-day move of one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gainer {
    pub symbol: String,
    pub latest_close: f64,
    pub previous_close: f64,
    pub change_pct: f64,
}

impl Gainer {
    /// Compute the move from the two most recent bars.
    ///
    /// Returns `None` with fewer than two bars or when the previous close
    /// cannot be divided by.
    pub fn from_bars(symbol: impl Into<String>, bars: &[PriceBar]) -> Option<Self> {
        let mut recent: Vec<&PriceBar> = bars.iter().collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));

        let (latest, previous) = match recent.as_slice() {
            [latest, previous, ..] => (*latest, *previous),
            _ => return None,
        };

        if !previous.close.is_finite() || previous.close <= 0.0 || !latest.close.is_finite() {
            return None;
        }

        Some(Self {
            symbol: symbol.into(),
            latest_close: latest.close,
            previous_close: previous.close,
            change_pct: (latest.close - previous.close) / previous.close * 100.0,
        })
    }
}

/// Rank tickers by most recent percent change, highest first.
///
/// Tickers without two usable bars are skipped. Ties keep input order.
pub fn rank_gainers<S, B>(histories: impl IntoIterator<Item = (S, B)>) -> Vec<Gainer>
where
    S: Into<String>,
    B: AsRef<[PriceBar]>,
{
    let mut gainers: Vec<Gainer> = histories
        .into_iter()
        .filter_map(|(symbol, bars)| {
            let symbol = symbol.into();
            let gainer = Gainer::from_bars(symbol.as_str(), bars.as_ref());
            if gainer.is_none() {
                tracing::debug!("Skipping {symbol}: fewer than two usable closes");
            }
            gainer
        })
        .collect();

    gainers.sort_by(|a, b| b.change_pct.total_cmp(&a.change_pct));
    gainers
}
