//! CoinGecko market data provider implementation

use crate::{
    constants::{
        COINGECKO_API_URL, COINGECKO_MARKETS_ENDPOINT, MARKETS_ORDER, MARKETS_PAGE,
        MARKETS_PER_PAGE, REQUEST_TIMEOUT_SECS, USER_AGENT,
    },
    error::ProviderError,
    provider::MarketDataProvider,
    types::{CoinDetails, CoinSnapshot, Currency},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// CoinGecko market data provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider against the public API
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(COINGECKO_API_URL, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Creates a provider against a custom base URL (mirror or test server)
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the markets endpoint URL
    fn markets_url(&self) -> String {
        format!("{}{}", self.base_url, COINGECKO_MARKETS_ENDPOINT)
    }

    /// Sends a GET to the markets endpoint and decodes the JSON array
    async fn get_markets<T: DeserializeOwned>(
        &self,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ProviderError> {
        let url = self.markets_url();
        tracing::debug!(url = %url, ?query, "Fetching markets from CoinGecko");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded);
        }

        // Check for other errors
        if !status.is_success() {
            return Err(ProviderError::api(
                status.as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }

        let response_text = response.text().await.map_err(map_send_error)?;

        serde_json::from_str(&response_text).map_err(|e| {
            ProviderError::InvalidResponse(format!(
                "Failed to parse CoinGecko response: {}. Response: {}",
                e, response_text
            ))
        })
    }
}

/// Keeps timeouts distinguishable from other transport failures
fn map_send_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::NetworkError(error)
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new().expect("Failed to create CoinGecko provider")
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn fetch_markets(&self, currency: Currency) -> Result<Vec<CoinSnapshot>, ProviderError> {
        let query = [
            ("vs_currency", currency.code().to_string()),
            ("order", MARKETS_ORDER.to_string()),
            ("per_page", MARKETS_PER_PAGE.to_string()),
            ("page", MARKETS_PAGE.to_string()),
            ("sparkline", "false".to_string()),
        ];

        let coins: Vec<CoinSnapshot> = self.get_markets(&query).await?;

        tracing::debug!(
            count = coins.len(),
            currency = %currency,
            "Successfully fetched markets from CoinGecko"
        );

        Ok(coins)
    }

    async fn fetch_coin(
        &self,
        currency: Currency,
        coin_id: &str,
    ) -> Result<CoinDetails, ProviderError> {
        let query = [
            ("vs_currency", currency.code().to_string()),
            ("ids", coin_id.to_string()),
        ];

        let coins: Vec<CoinDetails> = self.get_markets(&query).await?;

        coins
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::not_found(coin_id))
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn provider(server: &MockServer) -> CoinGeckoProvider {
        CoinGeckoProvider::with_base_url(&server.uri(), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_markets_sends_ranking_query() {
        let server = MockServer::start().await;
        let body = serde_json::json!([
            { "id": "bitcoin", "symbol": "btc", "name": "Bitcoin", "current_price": 50000, "market_cap": 1 }
        ]);
        Mock::given(method("GET"))
            .and(path("/coins/markets"))
            .and(query_param("vs_currency", "usd"))
            .and(query_param("order", "market_cap_desc"))
            .and(query_param("per_page", "50"))
            .and(query_param("page", "1"))
            .and(query_param("sparkline", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let coins = provider(&server).fetch_markets(Currency::Usd).await.unwrap();

        assert_eq!(coins.len(), 1);
        assert_eq!(coins[0].id, "bitcoin");
        assert_eq!(coins[0].current_price, Some(50000.0));
    }

    #[tokio::test]
    async fn test_fetch_markets_tolerates_unpriced_coin() {
        let server = MockServer::start().await;
        let body = serde_json::json!([
            { "id": "bitcoin", "symbol": "btc", "name": "Bitcoin", "current_price": 50000 },
            { "id": "fresh-listing", "symbol": "frsh", "name": "Fresh", "current_price": null }
        ]);
        Mock::given(path("/coins/markets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let coins = provider(&server).fetch_markets(Currency::Gbp).await.unwrap();

        assert_eq!(coins.len(), 2);
        assert_eq!(coins[1].current_price, None);
    }

    #[tokio::test]
    async fn test_fetch_markets_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(path("/coins/markets"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = provider(&server)
            .fetch_markets(Currency::Eur)
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::RateLimitExceeded));
    }

    #[tokio::test]
    async fn test_fetch_markets_server_error() {
        let server = MockServer::start().await;
        Mock::given(path("/coins/markets"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .fetch_markets(Currency::Usd)
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::ApiError { status: 500, .. }));
        assert_eq!(err.kind(), FailureKind::Transport);
    }

    #[tokio::test]
    async fn test_fetch_markets_invalid_body() {
        let server = MockServer::start().await;
        Mock::given(path("/coins/markets"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .fetch_markets(Currency::Usd)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Unexpected);
    }

    #[tokio::test]
    async fn test_fetch_coin_by_id() {
        let server = MockServer::start().await;
        let body = serde_json::json!([{
            "id": "solana", "symbol": "sol", "name": "Solana", "current_price": 150.5,
            "market_cap": 70000000000.0, "total_volume": 2000000000.0,
            "high_24h": 155.0, "low_24h": 148.0,
            "image": "https://assets.coingecko.com/coins/images/4128/large/solana.png",
            "price_change_percentage_24h": 2.1
        }]);
        Mock::given(path("/coins/markets"))
            .and(query_param("vs_currency", "usd"))
            .and(query_param("ids", "solana"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let coin = provider(&server)
            .fetch_coin(Currency::Usd, "solana")
            .await
            .unwrap();

        assert_eq!(coin.name, "Solana");
        assert_eq!(coin.high_24h, Some(155.0));
    }

    #[tokio::test]
    async fn test_fetch_coin_empty_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(path("/coins/markets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let err = provider(&server)
            .fetch_coin(Currency::Usd, "not-a-coin")
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::NotFound(ref id) if id == "not-a-coin"));
    }
}
