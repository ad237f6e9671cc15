pub mod binance;
pub mod charts;
pub mod core;
pub mod csv_store;
pub mod mock;
pub mod observability;
pub mod persistence;
pub mod reddit;
pub mod twitter;

pub use binance::BinanceMarketDataService;
pub use persistence::{Database, SqlitePostRepository};
pub use reddit::RedditCollector;
pub use twitter::TwitterCollector;
