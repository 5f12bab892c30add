//! Date alignment of sentiment buckets with price bars

use crate::aggregate::DailySentimentBucket;
use crate::model::PriceBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One date present in both the sentiment bucket and the price history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
    pub close: f64,
}

/// Rows sorted ascending by date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlignedSeries {
    rows: Vec<AlignedRow>,
}

impl AlignedSeries {
    pub fn rows(&self) -> &[AlignedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Empty means "nothing to display", not a failure
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|row| row.date)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.close).collect()
    }
}

impl IntoIterator for AlignedSeries {
    type Item = AlignedRow;
    type IntoIter = std::vec::IntoIter<AlignedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Inner join of `bucket` and `bars` on date.
///
/// When several bars share a date the last one wins.
pub fn align(bucket: &DailySentimentBucket, bars: &[PriceBar]) -> AlignedSeries {
    let closes: BTreeMap<NaiveDate, f64> = bars.iter().map(|bar| (bar.date, bar.close)).collect();

    let rows = bucket
        .iter()
        .filter_map(|(date, counts)| {
            closes.get(date).map(|close| AlignedRow {
                date: *date,
                positive: counts.positive,
                negative: counts.negative,
                neutral: counts.neutral,
                close: *close,
            })
        })
        .collect();

    AlignedSeries { rows }
}
