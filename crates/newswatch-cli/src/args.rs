//! Command-line arguments

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use newswatch_stock::dashboard::{DEFAULT_NEWS_LIMIT, TIME_FRAMES};
use newswatch_stock::dates::today;
use newswatch_stock::RetentionWindow;

#[derive(Parser, Debug)]
#[command(name = "newswatch")]
#[command(about = "Company news sentiment, price alignment and daily hot stocks")]
#[command(long_about = None)]
pub struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List recent news about a company with sentiment
    Feed(FeedArgs),
    /// Compare news sentiment with the stock's closing prices
    Track(TrackArgs),
    /// Rank popular tickers by today's move, with headlines and correlation
    Hot(HotArgs),
}

#[derive(Args, Debug)]
pub struct FeedArgs {
    /// Company name or stock ticker (e.g. Apple or AAPL); prompted for if omitted
    pub company: Option<String>,

    /// Start date YYYY-MM-DD (within the last 30 days)
    #[arg(long, value_parser = recent_date)]
    pub start: Option<NaiveDate>,

    /// End date YYYY-MM-DD
    #[arg(long, value_parser = recent_date)]
    pub end: Option<NaiveDate>,

    /// Ignore and do not write the response cache
    #[arg(long)]
    pub no_cache: bool,

    /// Discard the cached response for this query and fetch it again
    #[arg(long, conflicts_with = "no_cache")]
    pub refresh: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TrackArgs {
    /// Company name searched in the news; prompted for if omitted
    pub company: Option<String>,

    /// Ticker for price data; defaults to the company text
    #[arg(long)]
    pub ticker: Option<String>,

    /// Start date YYYY-MM-DD; defaults to a week ago
    #[arg(long, value_parser = recent_date)]
    pub start: Option<NaiveDate>,

    /// End date YYYY-MM-DD; defaults to today
    #[arg(long, value_parser = recent_date)]
    pub end: Option<NaiveDate>,

    /// Only show the news side
    #[arg(long)]
    pub no_prices: bool,

    /// Ignore and do not write the response cache
    #[arg(long)]
    pub no_cache: bool,

    /// Discard the cached response for this query and fetch it again
    #[arg(long, conflicts_with = "no_cache")]
    pub refresh: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct HotArgs {
    /// Days of headlines and price history (7, 14 or 30)
    #[arg(long, default_value_t = 14, value_parser = time_frame)]
    pub days: u32,

    /// Tickers to rank instead of the configured list
    #[arg(long, value_delimiter = ',')]
    pub tickers: Vec<String>,

    /// Gainers to correlate
    #[arg(long, value_delimiter = ',')]
    pub compare: Vec<String>,

    /// Headlines per gainer
    #[arg(long, default_value_t = DEFAULT_NEWS_LIMIT)]
    pub news_limit: usize,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

fn recent_date(input: &str) -> Result<NaiveDate, String> {
    RetentionWindow::default()
        .parse(input, today())
        .map_err(|e| e.to_string())
}

/// Price ticker for `track`: the explicit `--ticker` or else the company text,
/// trimmed and uppercased either way
pub fn ticker_symbol(ticker: Option<&str>, company: &str) -> String {
    ticker.unwrap_or(company).trim().to_uppercase()
}

fn time_frame(input: &str) -> Result<u32, String> {
    let days: u32 = input
        .parse()
        .map_err(|_| format!("'{input}' is not a number of days"))?;
    if TIME_FRAMES.contains(&days) {
        Ok(days)
    } else {
        Err(format!("time frame must be one of {TIME_FRAMES:?}, got {days}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_feed_args() {
        let start = today() - Duration::days(3);
        let cli = Cli::try_parse_from([
            "newswatch",
            "-vv",
            "feed",
            "Tesla Motors",
            "--start",
            &start.format("%Y-%m-%d").to_string(),
            "--no-cache",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Feed(args) => {
                assert_eq!(args.company.as_deref(), Some("Tesla Motors"));
                assert_eq!(args.start, Some(start));
                assert!(args.end.is_none());
                assert!(args.no_cache);
                assert!(!args.json);
            }
            other => panic!("Expected feed, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_old_and_malformed_dates() {
        let old = (today() - Duration::days(45)).format("%Y-%m-%d").to_string();
        let err = Cli::try_parse_from(["newswatch", "feed", "Tesla", "--start", &old]).unwrap_err();
        assert!(err.to_string().contains("Free plan only allows last 30 days"));

        let err = Cli::try_parse_from(["newswatch", "track", "Tesla", "--end", "01/02/2024"])
            .unwrap_err();
        assert!(err.to_string().contains("Use YYYY-MM-DD format"));
    }

    #[test]
    fn test_refresh_conflicts_with_no_cache() {
        let cli = Cli::try_parse_from(["newswatch", "track", "Tesla", "--refresh"]).unwrap();
        match cli.command {
            Command::Track(args) => {
                assert!(args.refresh);
                assert!(!args.no_cache);
            }
            other => panic!("Expected track, got {other:?}"),
        }

        assert!(
            Cli::try_parse_from(["newswatch", "feed", "Tesla", "--refresh", "--no-cache"])
                .is_err()
        );
    }

    #[test]
    fn test_ticker_symbol_normalises_both_sources() {
        assert_eq!(ticker_symbol(Some(" tsla "), "Tesla"), "TSLA");
        assert_eq!(ticker_symbol(None, " aapl "), "AAPL");
        assert_eq!(ticker_symbol(None, "Tesla Motors"), "TESLA MOTORS");
    }

    #[test]
    fn test_hot_args() {
        let cli = Cli::try_parse_from([
            "newswatch",
            "hot",
            "--days",
            "7",
            "--tickers",
            "AAPL,MSFT,TSLA",
            "--compare",
            "AAPL,TSLA",
        ])
        .unwrap();

        match cli.command {
            Command::Hot(args) => {
                assert_eq!(args.days, 7);
                assert_eq!(args.tickers, vec!["AAPL", "MSFT", "TSLA"]);
                assert_eq!(args.compare, vec!["AAPL", "TSLA"]);
                assert_eq!(args.news_limit, 5);
            }
            other => panic!("Expected hot, got {other:?}"),
        }
    }

    #[test]
    fn test_hot_time_frame_is_restricted() {
        assert!(Cli::try_parse_from(["newswatch", "hot", "--days", "10"]).is_err());
        let cli = Cli::try_parse_from(["newswatch", "hot", "--log-json"]).unwrap();
        assert!(cli.log_json);
        match cli.command {
            Command::Hot(args) => assert_eq!(args.days, 14),
            other => panic!("Expected hot, got {other:?}"),
        }
    }
}
