//! Polarity scoring and label classification
//!
//! Scoring is delegated to a [`PolarityScorer`]; the pipeline only depends on
//! the score being in `[-1, 1]`. Classification into a [`SentimentLabel`] uses a
//! single convention everywhere: a symmetric neutral band around zero, with
//! strict comparisons on both sides.

use crate::model::{ClassifiedItem, NewsItem, SentimentLabel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Default half-width of the neutral band
pub const DEFAULT_NEUTRAL_BAND: f64 = 0.1;

/// Something that maps text to a polarity in `[-1, 1]`
pub trait PolarityScorer: Send + Sync {
    /// Score `text`; blank text must score `0.0`
    fn polarity(&self, text: &str) -> f64;
}

impl<F> PolarityScorer for F
where
    F: Fn(&str) -> f64 + Send + Sync,
{
    fn polarity(&self, text: &str) -> f64 {
        self(text)
    }
}

/// VADER compound score
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for VaderScorer {
    fn polarity(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let scores = self.analyzer.polarity_scores(text);
        scores
            .get("compound")
            .copied()
            .unwrap_or(0.0)
            .clamp(-1.0, 1.0)
    }
}

/// Word list scorer: the mean score of the lexicon words found in the text.
///
/// Useful offline and in tests where a fixed, predictable score matters more
/// than linguistic nuance.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: HashMap<String, f64>,
}

const MARKET_LEXICON: &[(&str, f64)] = &[
    ("beat", 0.4),
    ("beats", 0.4),
    ("boost", 0.4),
    ("gain", 0.4),
    ("gains", 0.4),
    ("growth", 0.3),
    ("profit", 0.4),
    ("rally", 0.5),
    ("record", 0.3),
    ("soar", 0.6),
    ("soars", 0.6),
    ("strong", 0.4),
    ("surge", 0.5),
    ("surges", 0.5),
    ("upgrade", 0.4),
    ("crash", -0.6),
    ("cut", -0.3),
    ("decline", -0.4),
    ("downgrade", -0.4),
    ("fall", -0.4),
    ("falls", -0.4),
    ("fraud", -0.7),
    ("lawsuit", -0.5),
    ("loss", -0.5),
    ("miss", -0.4),
    ("misses", -0.4),
    ("plunge", -0.6),
    ("probe", -0.4),
    ("recall", -0.4),
    ("weak", -0.4),
];

impl LexiconScorer {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let lexicon = entries
            .into_iter()
            .map(|(word, score)| (word.into().to_lowercase(), score.clamp(-1.0, 1.0)))
            .collect();
        Self { lexicon }
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new(MARKET_LEXICON.iter().copied())
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let scores: Vec<f64> = lowered
            .split(|c: char| !c.is_alphanumeric() && c != '-' && c != '\'')
            .filter(|token| !token.is_empty())
            .filter_map(|token| self.lexicon.get(token).copied())
            .collect();

        if scores.is_empty() {
            return 0.0;
        }
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

/// Neutral band boundaries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarityThresholds {
    /// Scores strictly above this are positive
    pub positive: f64,
    /// Scores strictly below this are negative
    pub negative: f64,
}

impl PolarityThresholds {
    /// Band of half-width `band` around zero; `0.0` means any non-zero score counts
    pub fn symmetric(band: f64) -> Self {
        let band = band.abs();
        Self {
            positive: band,
            negative: -band,
        }
    }

    pub fn label(&self, polarity: f64) -> SentimentLabel {
        if polarity > self.positive {
            SentimentLabel::Positive
        } else if polarity < self.negative {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl Default for PolarityThresholds {
    fn default() -> Self {
        Self::symmetric(DEFAULT_NEUTRAL_BAND)
    }
}

/// Scorer plus thresholds
pub struct SentimentClassifier {
    scorer: Box<dyn PolarityScorer>,
    thresholds: PolarityThresholds,
}

impl SentimentClassifier {
    pub fn new(scorer: impl PolarityScorer + 'static) -> Self {
        Self {
            scorer: Box::new(scorer),
            thresholds: PolarityThresholds::default(),
        }
    }

    /// Classifier backed by VADER
    pub fn vader() -> Self {
        Self::new(VaderScorer::new())
    }

    pub fn with_thresholds(mut self, thresholds: PolarityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn thresholds(&self) -> PolarityThresholds {
        self.thresholds
    }

    /// Score and label a piece of text
    pub fn classify(&self, text: &str) -> (f64, SentimentLabel) {
        let polarity = self.scorer.polarity(text);
        (polarity, self.thresholds.label(polarity))
    }

    /// Classify an item by its headline
    pub fn classify_item(&self, item: NewsItem) -> ClassifiedItem {
        let (polarity, label) = self.classify(&item.headline);
        ClassifiedItem {
            item,
            polarity,
            label,
        }
    }

    pub fn classify_all(&self, items: impl IntoIterator<Item = NewsItem>) -> Vec<ClassifiedItem> {
        items
            .into_iter()
            .map(|item| self.classify_item(item))
            .collect()
    }
}

impl std::fmt::Debug for SentimentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentClassifier")
            .field("thresholds", &self.thresholds)
            .finish_non_exhaustive()
    }
}
