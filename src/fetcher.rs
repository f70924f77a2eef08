//! Market list fetcher
//!
//! Holds the ranked market list for the currently selected currency along
//! with its loading and error state, and re-fetches whenever the currency
//! changes.

use crate::{
    display::filter_by_name,
    error::ProviderError,
    metrics::{FetchMetrics, MetricsCollector},
    provider::MarketDataProvider,
    providers::CoinGeckoProvider,
    types::{CoinSnapshot, Currency, MarketDataState},
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Market list fetcher
///
/// State is published through a `watch` channel so any number of consumers
/// can read the latest snapshot or wait for the next change.
///
/// Every fetch is tagged with a request generation. Only the response of the
/// latest generation may touch the state, so a slow answer for a currency the
/// user already switched away from is dropped instead of overwriting fresher
/// data.
///
/// # Example
/// ```no_run
/// use coin_market_sdk::{Currency, MarketDataFetcher};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = MarketDataFetcher::coingecko(Currency::Usd)?;
/// fetcher.refresh().await;
///
/// let state = fetcher.state();
/// if let Some(error) = &state.error {
///     eprintln!("{error}");
/// } else if let Some(priced_in) = state.coins_currency {
///     for coin in &state.coins {
///         println!("{}: {}", coin.name, priced_in.format_quote(coin.current_price));
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct MarketDataFetcher {
    provider: Arc<dyn MarketDataProvider>,
    state: watch::Sender<MarketDataState>,
    generation: AtomicU64,
    metrics: Arc<MetricsCollector>,
}

impl MarketDataFetcher {
    /// Creates an idle fetcher; nothing is requested until a fetch is started
    pub fn new(provider: Arc<dyn MarketDataProvider>, currency: Currency) -> Self {
        let metrics = Arc::new(MetricsCollector::new(provider.provider_name()));
        let (state, _) = watch::channel(MarketDataState {
            currency,
            ..MarketDataState::default()
        });

        Self {
            provider,
            state,
            generation: AtomicU64::new(0),
            metrics,
        }
    }

    /// Creates an idle fetcher backed by the public CoinGecko API
    pub fn coingecko(currency: Currency) -> Result<Self, ProviderError> {
        Ok(Self::new(Arc::new(CoinGeckoProvider::new()?), currency))
    }

    /// Creates a fetcher and immediately starts loading `currency`
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(provider: Arc<dyn MarketDataProvider>, currency: Currency) -> Arc<Self> {
        let fetcher = Arc::new(Self::new(provider, currency));
        fetcher.refresh_in_background();
        fetcher
    }

    /// Returns a snapshot of the current state
    pub fn state(&self) -> MarketDataState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes
    pub fn subscribe(&self) -> watch::Receiver<MarketDataState> {
        self.state.subscribe()
    }

    /// Currency of the latest started fetch
    pub fn currency(&self) -> Currency {
        self.state.borrow().currency
    }

    /// Returns the name of the current provider
    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Switches the currency, starting a background fetch if it changed
    ///
    /// # Returns
    /// The handle of the started fetch, or `None` when `currency` is already
    /// selected
    pub fn set_currency(self: &Arc<Self>, currency: Currency) -> Option<JoinHandle<()>> {
        if self.currency() == currency {
            return None;
        }

        tracing::info!(from = %self.currency(), to = %currency, "Currency changed");
        Some(self.start(currency))
    }

    /// Re-fetches the current currency in the background
    pub fn refresh_in_background(self: &Arc<Self>) -> JoinHandle<()> {
        self.start(self.currency())
    }

    /// Re-fetches the current currency and waits for it to settle
    pub async fn refresh(&self) {
        self.load(self.currency()).await;
    }

    /// Fetches the market list for `currency` and waits for it to settle
    ///
    /// If another fetch is started before this one settles, this one's
    /// result is discarded.
    pub async fn load(&self, currency: Currency) {
        let generation = self.begin(currency);
        self.settle(generation, currency).await;
    }

    /// Filters the loaded list by display name
    pub fn search(&self, query: &str) -> Vec<CoinSnapshot> {
        filter_by_name(&self.state.borrow().coins, query)
    }

    /// Gets request latency and outcome metrics of the provider
    pub async fn metrics(&self) -> FetchMetrics {
        self.metrics.snapshot().await
    }

    fn start(self: &Arc<Self>, currency: Currency) -> JoinHandle<()> {
        // Mark loading before spawning so readers never see the old currency
        // as settled after this call returns
        let generation = self.begin(currency);
        let fetcher = Arc::clone(self);
        tokio::spawn(async move { fetcher.settle(generation, currency).await })
    }

    /// Takes a new request generation and flips the state to loading
    fn begin(&self, currency: Currency) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.currency = currency;
            state.loading = true;
            state.error = None;
        });

        tracing::debug!(generation, currency = %currency, "Fetching market list");
        generation
    }

    /// Performs the request and applies its outcome if still current
    async fn settle(&self, generation: u64, currency: Currency) {
        let start = Instant::now();
        let result = self.provider.fetch_markets(currency).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        self.metrics
            .record(start.elapsed(), result.as_ref().err().map(ProviderError::kind))
            .await;

        match &result {
            Ok(coins) => tracing::debug!(
                generation,
                count = coins.len(),
                provider = self.provider.provider_name(),
                latency_ms,
                "Fetched market list"
            ),
            Err(e) => tracing::warn!(
                generation,
                currency = %currency,
                error = %e,
                latency_ms,
                "Failed to fetch market list"
            ),
        }

        let applied = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }

            match result {
                Ok(coins) => {
                    state.coins = coins;
                    state.coins_currency = Some(currency);
                    state.last_updated = Some(chrono::Utc::now());
                }
                Err(e) => {
                    // Prices of another currency must not pass for this one
                    if state.coins_currency != Some(currency) {
                        state.coins.clear();
                        state.coins_currency = None;
                    }
                    state.error = Some(e.market_message().to_string());
                }
            }
            state.loading = false;
            true
        });

        if !applied {
            tracing::debug!(generation, currency = %currency, "Discarding superseded response");
        }
    }
}
