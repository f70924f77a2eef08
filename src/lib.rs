//! # Coin Market SDK
//!
//! Browse cryptocurrency markets from CoinGecko and keep track of the coins
//! a user has looked at.
//!
//! Two pieces do the work:
//!
//! - [`MarketDataFetcher`] loads the top 50 coins by market cap for a quote
//!   currency and exposes the list together with loading and error state.
//!   Switching the currency re-fetches; answers for a currency that is no
//!   longer selected are dropped.
//! - [`ViewedCoinsStore`] remembers up to 10 opened coins with a view count
//!   each, persisted to disk after every change.
//!
//! [`CoinDetailsService`] ties them together for a coin's details page.
//!
//! ## Usage
//!
//! ```no_run
//! use coin_market_sdk::{CoinDetailsService, Currency, MarketDataFetcher, Settings};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::from_env()?;
//! let provider = Arc::new(settings.coingecko_provider()?);
//! let store = Arc::new(settings.open_store());
//!
//! let fetcher = MarketDataFetcher::new(provider.clone(), settings.currency);
//! fetcher.refresh().await;
//! if let Some(error) = fetcher.state().error {
//!     eprintln!("{error}");
//! }
//!
//! let details = CoinDetailsService::new(provider, store.clone());
//! details.open("btc").await;
//! for coin in store.viewed() {
//!     println!("{} ({} views)", coin.name, coin.views);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod details;
pub mod display;
pub mod error;
pub mod fetcher;
pub mod metrics;
pub mod persistence;
pub mod provider;
pub mod providers;
pub mod routing;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::Settings;
pub use details::{CoinDetailsService, CoinPage};
pub use error::{ConfigError, FailureKind, ProviderError, StoreError};
pub use fetcher::MarketDataFetcher;
pub use metrics::FetchMetrics;
pub use persistence::{JsonFilePersistence, MemoryPersistence, ViewedPersistence};
pub use store::ViewedCoinsStore;
pub use types::{CoinDetails, CoinSnapshot, Currency, MarketDataState, ViewedCoin};
