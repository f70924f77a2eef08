//! Coin details page
//!
//! Resolves the ticker from the page URL, loads the coin's market details
//! and records the visit in the viewed-coins store.

use crate::{
    error::ProviderError,
    metrics::{FetchMetrics, MetricsCollector},
    provider::MarketDataProvider,
    routing::resolve_coin_id,
    store::ViewedCoinsStore,
    types::{CoinDetails, Currency},
};
use std::sync::Arc;
use std::time::Instant;

/// Outcome of opening a details page
#[derive(Debug, Clone, PartialEq)]
pub enum CoinPage {
    /// Coin was found and the view was recorded
    Loaded(CoinDetails),
    /// Lookup failed; carries the message to show
    Failed(String),
}

impl CoinPage {
    /// Details, if the page loaded
    pub fn details(&self) -> Option<&CoinDetails> {
        match self {
            CoinPage::Loaded(details) => Some(details),
            CoinPage::Failed(_) => None,
        }
    }

    /// Error message, if the page failed
    pub fn error(&self) -> Option<&str> {
        match self {
            CoinPage::Loaded(_) => None,
            CoinPage::Failed(message) => Some(message),
        }
    }
}

/// Loads details pages and feeds the viewed-coins store
pub struct CoinDetailsService {
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<ViewedCoinsStore>,
    metrics: Arc<MetricsCollector>,
}

impl CoinDetailsService {
    /// Creates a service that records views into `store`
    pub fn new(provider: Arc<dyn MarketDataProvider>, store: Arc<ViewedCoinsStore>) -> Self {
        let metrics = Arc::new(MetricsCollector::new(provider.provider_name()));
        Self {
            provider,
            store,
            metrics,
        }
    }

    /// Opens the details page for a URL ticker (e.g. "btc")
    ///
    /// Details are always priced in USD. A successful lookup records a view
    /// of the coin; the store's blocking write-through runs on the blocking
    /// thread pool.
    pub async fn open(&self, ticker: &str) -> CoinPage {
        match self.fetch(ticker).await {
            Ok(details) => {
                self.record_view(&details).await;
                CoinPage::Loaded(details)
            }
            Err(e) => CoinPage::Failed(e.details_message().to_string()),
        }
    }

    async fn record_view(&self, details: &CoinDetails) {
        let store = Arc::clone(&self.store);
        let coin = details.clone();
        let recorded = tokio::task::spawn_blocking(move || {
            store.record_view(&coin.id, &coin.name, &coin.symbol, &coin.image);
        })
        .await;

        if let Err(e) = recorded {
            tracing::error!(id = %details.id, error = %e, "Recording view failed");
        }
    }

    /// Looks up a coin by URL ticker without recording a view
    pub async fn fetch(&self, ticker: &str) -> Result<CoinDetails, ProviderError> {
        let coin_id = resolve_coin_id(ticker);
        let start = Instant::now();

        let result = self.provider.fetch_coin(Currency::Usd, &coin_id).await;
        self.metrics
            .record(start.elapsed(), result.as_ref().err().map(ProviderError::kind))
            .await;

        if let Err(e) = &result {
            tracing::warn!(ticker, coin_id = %coin_id, error = %e, "Failed to fetch coin details");
        }
        result
    }

    /// Gets latency and outcome metrics of details lookups
    pub async fn metrics(&self) -> FetchMetrics {
        self.metrics.snapshot().await
    }

    /// Shared viewed-coins store
    pub fn store(&self) -> &Arc<ViewedCoinsStore> {
        &self.store
    }
}
