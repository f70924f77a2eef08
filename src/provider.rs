//! Provider abstraction for fetching market data from external APIs

use crate::{
    error::ProviderError,
    types::{CoinDetails, CoinSnapshot, Currency},
};
use async_trait::async_trait;

/// Trait for market data providers
///
/// The fetcher and the details page only talk to this trait, so tests can
/// swap in [`mock::MockProvider`] instead of hitting the network.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches the ranked market list priced in `currency`
    ///
    /// # Arguments
    /// * `currency` - Quote currency sent as `vs_currency`
    ///
    /// # Returns
    /// Up to one page of coins ordered by descending market cap. An empty
    /// list is a valid answer.
    async fn fetch_markets(&self, currency: Currency) -> Result<Vec<CoinSnapshot>, ProviderError>;

    /// Fetches full market details for a single coin
    ///
    /// # Arguments
    /// * `currency` - Quote currency sent as `vs_currency`
    /// * `coin_id` - Canonical coin identifier (e.g. "bitcoin")
    ///
    /// # Returns
    /// The coin's details, or `ProviderError::NotFound` when the API returns
    /// no entry for the identifier
    async fn fetch_coin(
        &self,
        currency: Currency,
        coin_id: &str,
    ) -> Result<CoinDetails, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}
