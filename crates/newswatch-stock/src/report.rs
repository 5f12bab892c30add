//! Terminal rendering of reports
//!
//! Plain text for article listings, `comfy-table` tables for everything
//! tabular. Every function returns a `String`; printing is left to the caller.

use crate::dashboard::{Comparison, DashboardReport, GainerSection};
use crate::tracker::{NewsReport, PriceAlignment};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use newswatch_core::{
    AlignedSeries, ClassifiedItem, CorrelationMatrix, DailySentimentBucket, PriceBar,
    SentimentCounts, SentimentLabel,
};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn right(text: impl ToString) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn price(value: f64) -> String {
    format!("{value:.2}")
}

/// One article as a text block: dated headline, sentiment, teaser and link
pub fn render_article(article: &ClassifiedItem) -> String {
    let item = &article.item;
    format!(
        "{} - {} ({})\nSentiment: {}\n{}\nRead more: {}\n",
        item.date(),
        item.headline,
        item.source,
        article.label,
        item.description.as_deref().unwrap_or_default(),
        item.url
    )
}

/// All articles of a report, separated by blank lines
pub fn render_articles(articles: &[ClassifiedItem]) -> String {
    articles
        .iter()
        .map(render_article)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Article counts per label
pub fn render_summary(counts: &SentimentCounts) -> String {
    let mut out = String::from("Sentiment summary:\n");
    for label in SentimentLabel::ALL {
        let _ = writeln!(out, "  {label}: {}", counts.get(label));
    }
    out
}

/// Per-date label counts, oldest first
pub fn render_sentiment_over_time(bucket: &DailySentimentBucket) -> String {
    let mut table = table(vec!["Date", "Positive", "Negative", "Neutral"]);
    for (date, counts) in bucket.iter() {
        table.add_row(vec![
            Cell::new(date),
            right(counts.positive),
            right(counts.negative),
            right(counts.neutral),
        ]);
    }
    table.to_string()
}

/// The `feed` output: articles, summary and sentiment over time
pub fn render_news_report(report: &NewsReport) -> String {
    if report.is_empty() {
        return "No news to display.".to_string();
    }

    let mut out = format!("Latest news about {}:\n\n", report.company);
    out.push_str(&render_articles(&report.articles));
    out.push('\n');
    out.push_str(&render_summary(&report.totals));
    let _ = write!(
        out,
        "\nSentiment over time for {}:\n{}",
        report.company,
        render_sentiment_over_time(&report.by_date)
    );
    out
}

/// Dates with both news and a close, side by side
pub fn render_aligned(series: &AlignedSeries) -> String {
    let mut table = table(vec!["Date", "Positive", "Negative", "Neutral", "Close"]);
    for row in series.rows() {
        table.add_row(vec![
            Cell::new(row.date),
            right(row.positive),
            right(row.negative),
            right(row.neutral),
            right(price(row.close)),
        ]);
    }
    table.to_string()
}

/// The price half of the `track` output
pub fn render_alignment(alignment: &PriceAlignment) -> String {
    if alignment.is_empty() {
        return alignment.warnings.first().map_or_else(
            || "No matching dates between stock data and news.".to_string(),
            String::clone,
        );
    }
    format!(
        "{} price vs. news sentiment:\n{}",
        alignment.ticker,
        render_aligned(&alignment.series)
    )
}

/// Closing prices, oldest first
pub fn render_prices(bars: &[PriceBar]) -> String {
    let mut table = table(vec!["Date", "Close"]);
    for bar in bars {
        table.add_row(vec![Cell::new(bar.date), right(price(bar.close))]);
    }
    table.to_string()
}

/// Headline bullets with label, emoji and timestamp
pub fn render_headlines(headlines: &[ClassifiedItem]) -> String {
    if headlines.is_empty() {
        return "No recent news.\n".to_string();
    }

    let mut out = String::from("Top News with Sentiment\n");
    for headline in headlines {
        let item = &headline.item;
        let _ = writeln!(
            out,
            "- {} | {} {} | {}\n  {}",
            item.headline,
            headline.label,
            headline.label.emoji(),
            item.published_at.format("%Y-%m-%d %H:%M"),
            item.url
        );
    }
    out
}

/// Ranked gainers with their latest move
pub fn render_gainers(sections: &[GainerSection]) -> String {
    let mut table = table(vec!["#", "Symbol", "Previous", "Latest", "Change %"]);
    for (rank, section) in sections.iter().enumerate() {
        let gainer = &section.gainer;
        table.add_row(vec![
            right(rank + 1),
            Cell::new(&gainer.symbol),
            right(price(gainer.previous_close)),
            right(price(gainer.latest_close)),
            right(format!("{:+.2}", gainer.change_pct)),
        ]);
    }
    table.to_string()
}

fn render_section(section: &GainerSection) -> String {
    let gainer = &section.gainer;
    let arrow = if gainer.change_pct >= 0.0 { '↑' } else { '↓' };
    let mut out = format!("{}  ({:.2}% {arrow})\n", gainer.symbol, gainer.change_pct);
    out.push_str(&render_headlines(&section.headlines));
    if section.prices.is_empty() {
        let _ = writeln!(out, "No price data for {}", gainer.symbol);
    } else {
        out.push_str(&render_prices(&section.prices));
        out.push('\n');
    }
    out
}

/// Pairwise correlations, two decimals; undefined pairs show as `n/a`
pub fn render_correlation(matrix: &CorrelationMatrix) -> String {
    let mut header = vec![""];
    header.extend(matrix.symbols.iter().map(String::as_str));
    let mut table = table(header);

    for (symbol, row) in matrix.symbols.iter().zip(&matrix.values) {
        let mut cells = vec![Cell::new(symbol)];
        cells.extend(row.iter().map(|value| {
            if value.is_nan() {
                right("n/a")
            } else {
                right(format!("{value:.2}"))
            }
        }));
        table.add_row(cells);
    }
    table.to_string()
}

/// Closing prices of several tickers in one table, one column per ticker
pub fn render_price_comparison(prices: &[(String, Vec<PriceBar>)]) -> String {
    let by_symbol: Vec<BTreeMap<_, _>> = prices
        .iter()
        .map(|(_, bars)| bars.iter().map(|bar| (bar.date, bar.close)).collect())
        .collect();
    let dates: BTreeSet<_> = by_symbol.iter().flat_map(|closes| closes.keys().copied()).collect();

    let mut header = vec!["Date"];
    header.extend(prices.iter().map(|(symbol, _)| symbol.as_str()));
    let mut table = table(header);

    for date in dates {
        let mut cells = vec![Cell::new(date)];
        cells.extend(
            by_symbol
                .iter()
                .map(|closes| right(closes.get(&date).map_or_else(String::new, |c| price(*c)))),
        );
        table.add_row(cells);
    }
    table.to_string()
}

fn render_comparison(comparison: &Comparison) -> String {
    format!(
        "Price Correlation Matrix\n{}\n\nPrice Comparison\n{}",
        render_correlation(&comparison.matrix),
        render_price_comparison(&comparison.prices)
    )
}

/// The whole `hot` output
pub fn render_dashboard(report: &DashboardReport) -> String {
    let mut out = String::new();
    if !report.sections.is_empty() {
        let _ = writeln!(out, "Top gainers found: {}", report.sections.len());
        out.push_str(&render_gainers(&report.sections));
        out.push_str("\n\n");
    }

    for section in &report.sections {
        out.push_str(&render_section(section));
        out.push_str("\n---\n\n");
    }

    if let Some(comparison) = &report.comparison {
        out.push_str(&render_comparison(comparison));
        out.push('\n');
    }

    for warning in &report.warnings {
        let _ = writeln!(out, "Warning: {warning}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::DateRange;
    use chrono::{NaiveDate, TimeZone, Utc};
    use newswatch_core::{align, Gainer, NewsItem, PolarityThresholds};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn classified(headline: &str, polarity: f64) -> ClassifiedItem {
        let item = NewsItem::new(
            Utc.with_ymd_and_hms(2024, 1, 2, 14, 5, 0).unwrap(),
            headline,
            "Reuters",
            "https://example.com/a",
        )
        .with_description("Details inside");
        ClassifiedItem {
            item,
            polarity,
            label: PolarityThresholds::default().label(polarity),
        }
    }

    #[test]
    fn test_render_article() {
        let text = render_article(&classified("Tesla rallies", 0.4));
        assert_eq!(
            text,
            concat!(
                "2024-01-02 - Tesla rallies (Reuters)\n",
                "Sentiment: Positive\n",
                "Details inside\n",
                "Read more: https://example.com/a\n",
            )
        );
    }

    #[test]
    fn test_empty_news_report() {
        let report = NewsReport::empty("Tesla", DateRange::unbounded());
        assert_eq!(render_news_report(&report), "No news to display.");
    }

    #[test]
    fn test_news_report_sections() {
        let articles = vec![classified("up", 0.4), classified("down", -0.4)];
        let by_date = DailySentimentBucket::from_items(&articles);
        let report = NewsReport {
            company: "Tesla".to_string(),
            range: DateRange::unbounded(),
            totals: by_date.totals(),
            articles,
            by_date,
            warnings: Vec::new(),
        };

        let text = render_news_report(&report);
        assert!(text.starts_with("Latest news about Tesla:"));
        assert!(text.contains("Sentiment summary:\n  Positive: 1\n  Negative: 1\n  Neutral: 0\n"));
        assert!(text.contains("Sentiment over time for Tesla"));
        assert!(text.contains("2024-01-02"));
    }

    #[test]
    fn test_render_aligned() {
        let mut bucket = DailySentimentBucket::new();
        bucket.record(day(2), SentimentLabel::Positive);
        let series = align(&bucket, &[PriceBar::new(day(2), 150.0)]);

        let text = render_aligned(&series);
        assert!(text.contains("Close"));
        assert!(text.contains("150.00"));
    }

    #[test]
    fn test_empty_alignment_shows_warning() {
        let alignment = PriceAlignment {
            ticker: "TSLA".to_string(),
            bars: Vec::new(),
            series: AlignedSeries::default(),
            warnings: vec!["Could not fetch price data. Check the ticker symbol.".to_string()],
        };
        assert_eq!(
            render_alignment(&alignment),
            "Could not fetch price data. Check the ticker symbol."
        );
    }

    #[test]
    fn test_render_headlines() {
        assert_eq!(render_headlines(&[]), "No recent news.\n");

        let text = render_headlines(&[classified("Chip demand soars", 0.6)]);
        assert!(text.contains("Chip demand soars | Positive 😊 | 2024-01-02 14:05"));
    }

    #[test]
    fn test_render_correlation() {
        let matrix = CorrelationMatrix {
            symbols: vec!["A".to_string(), "B".to_string()],
            values: vec![vec![1.0, 0.123], vec![0.123, f64::NAN]],
            observations: 3,
        };
        let text = render_correlation(&matrix);
        assert!(text.contains("0.12"));
        assert!(text.contains("1.00"));
        assert!(text.contains("n/a"));
    }

    #[test]
    fn test_render_price_comparison_fills_gaps() {
        let prices = vec![
            ("A".to_string(), vec![PriceBar::new(day(2), 1.0), PriceBar::new(day(3), 2.0)]),
            ("B".to_string(), vec![PriceBar::new(day(3), 3.5)]),
        ];
        let text = render_price_comparison(&prices);
        assert!(text.contains("2024-01-02"));
        assert!(text.contains("3.50"));
    }

    #[test]
    fn test_render_dashboard() {
        let report = DashboardReport {
            range: DateRange::unbounded(),
            sections: vec![GainerSection {
                gainer: Gainer {
                    symbol: "AAA".to_string(),
                    latest_close: 110.0,
                    previous_close: 100.0,
                    change_pct: 10.0,
                },
                headlines: Vec::new(),
                prices: Vec::new(),
            }],
            comparison: None,
            warnings: vec!["ZZZ is not among the gainers; left out of the comparison.".to_string()],
        };

        let text = render_dashboard(&report);
        assert!(text.contains("Top gainers found: 1"));
        assert!(text.contains("AAA  (10.00% ↑)"));
        assert!(text.contains("+10.00"));
        assert!(text.contains("No price data for AAA"));
        assert!(text.contains("Warning: ZZZ"));
    }
}
