//! Per-date aggregation of classified news

use crate::model::{ClassifiedItem, SentimentCounts, SentimentLabel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentiment counts keyed by publish date, iterated in ascending date order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySentimentBucket {
    days: BTreeMap<NaiveDate, SentimentCounts>,
}

impl DailySentimentBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bucket from classified items
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a ClassifiedItem>) -> Self {
        let mut bucket = Self::new();
        for item in items {
            bucket.record(item.date(), item.label);
        }
        bucket
    }

    /// Count one article with `label` published on `date`
    pub fn record(&mut self, date: NaiveDate, label: SentimentLabel) {
        self.days.entry(date).or_default().record(label);
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&SentimentCounts> {
        self.days.get(date)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.days.contains_key(date)
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.days.keys()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &SentimentCounts)> {
        self.days.iter()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Counts summed over every date
    pub fn totals(&self) -> SentimentCounts {
        self.days
            .values()
            .fold(SentimentCounts::default(), |mut acc, counts| {
                acc += *counts;
                acc
            })
    }
}

impl<'a> FromIterator<&'a ClassifiedItem> for DailySentimentBucket {
    fn from_iter<T: IntoIterator<Item = &'a ClassifiedItem>>(iter: T) -> Self {
        Self::from_items(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewsItem;
    use chrono::{TimeZone, Utc};

    fn classified(day: u32, hour: u32, polarity: f64) -> ClassifiedItem {
        let published = Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap();
        let label = crate::PolarityThresholds::symmetric(0.0).label(polarity);
        ClassifiedItem {
            item: NewsItem::new(published, "headline", "source", "https://example.com"),
            polarity,
            label,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_empty_input_gives_empty_bucket() {
        let items: Vec<ClassifiedItem> = Vec::new();
        let bucket = DailySentimentBucket::from_items(&items);
        assert!(bucket.is_empty());
        assert_eq!(bucket.totals().total(), 0);
    }

    #[test]
    fn test_one_of_each_label_on_a_day() {
        let items = vec![
            classified(2, 9, 0.3),
            classified(2, 12, -0.2),
            classified(2, 18, 0.0),
        ];
        let bucket = DailySentimentBucket::from_items(&items);

        assert_eq!(bucket.len(), 1);
        let counts = bucket.get(&day(2)).unwrap();
        assert_eq!(
            *counts,
            SentimentCounts {
                positive: 1,
                negative: 1,
                neutral: 1
            }
        );
    }

    #[test]
    fn test_counts_sum_to_items_per_day() {
        let items = vec![
            classified(3, 1, 0.5),
            classified(1, 2, 0.5),
            classified(3, 23, -0.5),
            classified(2, 0, 0.0),
            classified(3, 4, 0.0),
        ];
        let bucket: DailySentimentBucket = items.iter().collect();

        for (date, counts) in bucket.iter() {
            let expected = items.iter().filter(|i| i.date() == *date).count() as u32;
            assert_eq!(counts.total(), expected);
        }
        assert_eq!(bucket.totals().total(), items.len() as u32);

        let dates: Vec<_> = bucket.dates().copied().collect();
        assert_eq!(dates, vec![day(1), day(2), day(3)]);
        assert_eq!(bucket.first_date(), Some(day(1)));
        assert_eq!(bucket.last_date(), Some(day(3)));
    }

    #[test]
    fn test_aggregation_is_order_independent() {
        let mut items = vec![
            classified(1, 1, 0.5),
            classified(2, 2, -0.5),
            classified(1, 3, 0.0),
        ];
        let forward = DailySentimentBucket::from_items(&items);
        items.reverse();
        let backward = DailySentimentBucket::from_items(&items);
        assert_eq!(forward, backward);
    }
}
