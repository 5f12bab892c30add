//! API clients for news and price providers

pub mod finnhub;
pub mod newsapi;
pub mod yahoo;

pub use finnhub::{FinnhubClient, FinnhubNewsArticle};
pub use newsapi::{NewsApiArticle, NewsApiClient, NewsApiResponse};
pub use yahoo::YahooFinanceClient;
