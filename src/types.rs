//! Types for the coin market SDK

use crate::error::UnsupportedCurrency;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quote currencies the market list can be priced in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// US Dollar
    #[default]
    Usd,
    /// Euro
    Eur,
    /// Pound Sterling
    Gbp,
    /// Indian Rupee
    Inr,
}

impl Currency {
    /// Get the code sent as `vs_currency`
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
            Currency::Gbp => "gbp",
            Currency::Inr => "inr",
        }
    }

    /// Get the display symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Inr => "₹",
        }
    }

    /// Get all supported currencies
    pub fn all() -> &'static [Currency] {
        &[Currency::Usd, Currency::Eur, Currency::Gbp, Currency::Inr]
    }

    /// Formats a price as shown in the search results, e.g. `50000.00 USD`
    pub fn format_price(&self, price: f64) -> String {
        format!("{:.2} {}", price, self.code().to_uppercase())
    }

    /// Like [`Currency::format_price`], with `n/a` for a missing quote
    pub fn format_quote(&self, price: Option<f64>) -> String {
        match price {
            Some(price) => self.format_price(price),
            None => format!("n/a {}", self.code().to_uppercase()),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = UnsupportedCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        Currency::all()
            .iter()
            .find(|c| c.code() == code)
            .copied()
            .ok_or_else(|| UnsupportedCurrency(s.to_string()))
    }
}

/// A ranked market entry as returned by `/coins/markets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSnapshot {
    /// Canonical coin identifier (e.g. "bitcoin")
    pub id: String,
    /// Ticker (e.g. "btc")
    pub symbol: String,
    /// Display name
    pub name: String,
    /// Price in the requested currency, `None` when the API has no quote
    #[serde(default)]
    pub current_price: Option<f64>,
}

/// Full market entry used by the coin details page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetails {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub total_volume: Option<f64>,
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    /// Logo URL
    pub image: String,
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl CoinDetails {
    /// True when the 24h change is negative
    pub fn is_down_24h(&self) -> bool {
        self.price_change_percentage_24h
            .map(|change| change < 0.0)
            .unwrap_or(false)
    }
}

/// A coin the user has opened, as kept by the viewed-coins store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewedCoin {
    /// Canonical coin identifier, the dedup key
    pub id: String,
    pub name: String,
    pub symbol: String,
    /// Logo URL
    pub image: String,
    /// Number of times the details page was opened
    pub views: u32,
}

impl ViewedCoin {
    /// Creates an entry for a first-time view
    pub fn first_view(id: &str, name: &str, symbol: &str, image: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            image: image.to_string(),
            views: 1,
        }
    }
}

/// Observable state of the market list
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarketDataState {
    /// Currency the list is (being) fetched in
    pub currency: Currency,
    /// Last successfully fetched list, empty until the first success
    pub coins: Vec<CoinSnapshot>,
    /// Currency `coins` is priced in; `None` while `coins` is empty
    pub coins_currency: Option<Currency>,
    /// True from the start of a fetch until it settles
    pub loading: bool,
    /// Message for the last failed fetch, cleared when a new fetch starts
    pub error: Option<String>,
    /// When `coins` was last replaced
    pub last_updated: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parse() {
        assert_eq!("usd".parse::<Currency>(), Ok(Currency::Usd));
        assert_eq!(" INR ".parse::<Currency>(), Ok(Currency::Inr));
        assert!("doge".parse::<Currency>().is_err());
        assert_eq!(Currency::default(), Currency::Usd);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(Currency::Usd.format_price(50000.0), "50000.00 USD");
        assert_eq!(Currency::Eur.format_price(0.123), "0.12 EUR");
        assert_eq!(Currency::Inr.format_quote(None), "n/a INR");
        assert_eq!(Currency::Gbp.format_quote(Some(2.5)), "2.50 GBP");
    }

    #[test]
    fn test_null_price_decodes() {
        let raw = r#"[
            { "id": "bitcoin", "symbol": "btc", "name": "Bitcoin", "current_price": 50000 },
            { "id": "fresh-coin", "symbol": "new", "name": "Fresh", "current_price": null },
            { "id": "bare-coin", "symbol": "bare", "name": "Bare" }
        ]"#;
        let coins: Vec<CoinSnapshot> = serde_json::from_str(raw).unwrap();
        assert_eq!(coins[0].current_price, Some(50000.0));
        assert_eq!(coins[1].current_price, None);
        assert_eq!(coins[2].current_price, None);
    }

    #[test]
    fn test_viewed_coin_json_shape() {
        let coin = ViewedCoin::first_view("bitcoin", "Bitcoin", "btc", "https://img/btc.png");
        let value = serde_json::to_value(&coin).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "bitcoin",
                "name": "Bitcoin",
                "symbol": "btc",
                "image": "https://img/btc.png",
                "views": 1
            })
        );
    }

    #[test]
    fn test_details_ignore_unknown_fields() {
        let raw = r#"{
            "id": "bitcoin", "symbol": "btc", "name": "Bitcoin",
            "current_price": 50000, "market_cap": 1.0e12, "total_volume": 3.0e10,
            "high_24h": 51000, "low_24h": 49000, "image": "https://img/btc.png",
            "price_change_percentage_24h": -1.5, "ath": 69000,
            "last_updated": "2024-03-01T12:00:00.000Z"
        }"#;
        let details: CoinDetails = serde_json::from_str(raw).unwrap();
        assert_eq!(details.id, "bitcoin");
        assert!(details.is_down_24h());
        assert!(details.last_updated.is_some());
    }
}
