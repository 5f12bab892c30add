//! Command-line interface for newswatch
//!
//! # Usage
//!
//! ```bash
//! export NEWSAPI_API_KEY="..."
//! export FINNHUB_API_KEY="..."
//!
//! newswatch feed "Tesla" --start 2024-01-01
//! newswatch track Tesla --ticker TSLA --refresh
//! newswatch hot --days 7 --compare NVDA,AMD
//! ```

mod args;

use anyhow::{Context, bail};
use args::{Cli, Command, FeedArgs, HotArgs, TrackArgs, ticker_symbol};
use chrono::Duration;
use clap::Parser;
use newswatch_stock::api::{FinnhubClient, NewsApiClient, YahooFinanceClient};
use newswatch_stock::dates::today;
use newswatch_stock::{
    report, CachedPriceSource, DashboardOptions, DateRange, FeedConfig, HotStocks, NewsQuery,
    PriceSource, ResponseCache, SentimentTracker,
};
use newswatch_utils::{LogFormat, LogOptions, init_tracing_with};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::info;

/// Days shown by `track` when no dates are given
const TRACK_DEFAULT_DAYS: i64 = 7;

fn prompt_company() -> anyhow::Result<String> {
    let mut stdout = io::stdout();
    print!("Enter company name or stock ticker (e.g., Apple or AAPL): ");
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    let company = input.trim().to_string();
    if company.is_empty() {
        bail!("No company given");
    }
    Ok(company)
}

fn company_or_prompt(company: Option<String>) -> anyhow::Result<String> {
    match company.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()) {
        Some(company) => Ok(company),
        None => prompt_company(),
    }
}

async fn news_client(
    config: &FeedConfig,
    no_cache: bool,
    refresh: Option<NewsQuery>,
) -> anyhow::Result<NewsApiClient> {
    let client = NewsApiClient::from_config(config)?;
    if no_cache {
        return Ok(client);
    }
    let client =
        client.with_cache(ResponseCache::new(config.cache_dir.clone(), config.cache_ttl));
    if let Some(query) = refresh {
        client.forget(&query).await?;
    }
    Ok(client)
}

fn price_source(config: &FeedConfig) -> Arc<dyn PriceSource> {
    Arc::new(CachedPriceSource::new(
        Arc::new(YahooFinanceClient::new()),
        config.price_cache_ttl,
    ))
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("Warning: {warning}");
    }
}

async fn feed(config: Arc<FeedConfig>, args: FeedArgs) -> anyhow::Result<()> {
    let range = DateRange::new(args.start, args.end)?;
    range.check(&config.retention(), today())?;
    let company = company_or_prompt(args.company)?;

    let refresh = args.refresh.then(|| NewsQuery::new(company.as_str(), range));
    let news = Arc::new(news_client(&config, args.no_cache, refresh).await?);
    let tracker = SentimentTracker::new(news, price_source(&config), config);
    let news_report = tracker.news_report(&company, range).await;

    print_warnings(&news_report.warnings);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&news_report)?);
    } else {
        println!("{}", report::render_news_report(&news_report));
    }
    Ok(())
}

async fn track(config: Arc<FeedConfig>, args: TrackArgs) -> anyhow::Result<()> {
    let now = today();
    let end = args.end.unwrap_or(now);
    let start = args
        .start
        .unwrap_or_else(|| end - Duration::days(TRACK_DEFAULT_DAYS));
    let range = DateRange::new(Some(start), Some(end))?;
    range.check(&config.retention(), now)?;

    let company = company_or_prompt(args.company)?;
    let ticker = ticker_symbol(args.ticker.as_deref(), &company);

    let refresh = args.refresh.then(|| NewsQuery::new(company.as_str(), range));
    let news = Arc::new(news_client(&config, args.no_cache, refresh).await?);
    let tracker = SentimentTracker::new(news, price_source(&config), config);
    let news_report = tracker.news_report(&company, range).await;
    print_warnings(&news_report.warnings);

    let alignment = if args.no_prices || news_report.is_empty() {
        None
    } else {
        Some(tracker.align_prices(&ticker, &news_report).await)
    };

    if args.json {
        let output = serde_json::json!({
            "news": news_report,
            "prices": alignment,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", report::render_news_report(&news_report));
    if let Some(alignment) = alignment {
        println!();
        println!("{}", report::render_alignment(&alignment));
    }
    Ok(())
}

async fn hot(config: Arc<FeedConfig>, args: HotArgs) -> anyhow::Result<()> {
    let news = Arc::new(FinnhubClient::from_config(&config)?);
    let tickers = if args.tickers.is_empty() {
        config.tickers.clone()
    } else {
        args.tickers.iter().map(|t| t.trim().to_uppercase()).collect()
    };
    info!("Ranking {} tickers: {}", tickers.len(), tickers.join(", "));

    let options = DashboardOptions::new(tickers, today())
        .with_days(args.days)
        .with_compare(args.compare)
        .with_news_limit(args.news_limit);

    let dashboard = HotStocks::new(news, price_source(&config), config);
    let dashboard_report = dashboard.build(&options).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dashboard_report)?);
    } else {
        print!("{}", report::render_dashboard(&dashboard_report));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_tracing_with(&LogOptions::from_verbosity(cli.verbose).with_format(format))?;

    let config = Arc::new(FeedConfig::from_env().context("Invalid configuration")?);
    info!("Starting newswatch");

    match cli.command {
        Command::Feed(args) => feed(config, args).await,
        Command::Track(args) => track(config, args).await,
        Command::Hot(args) => hot(config, args).await,
    }
}
