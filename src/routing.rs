//! Ticker to coin identifier resolution and the featured coin list

/// Tickers with a known canonical CoinGecko identifier
const TICKER_TO_ID: &[(&str, &str)] = &[
    ("btc", "bitcoin"),
    ("eth", "ethereum"),
    ("bnb", "binancecoin"),
    ("sol", "solana"),
    ("xrp", "ripple"),
];

/// A coin promoted on the landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturedCoin {
    pub name: &'static str,
    pub symbol: &'static str,
    /// Key of the bundled logo
    pub image: &'static str,
}

impl FeaturedCoin {
    /// URL path segment of the coin's details page
    pub fn page_segment(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Coins shown in the "what everyone is reading" section
pub const FEATURED_COINS: &[FeaturedCoin] = &[
    FeaturedCoin { name: "Bitcoin", symbol: "BTC", image: "bitcoin" },
    FeaturedCoin { name: "Ethereum", symbol: "ETH", image: "ethereum" },
    FeaturedCoin { name: "Binance Coin", symbol: "BNB", image: "binance" },
    FeaturedCoin { name: "Solana", symbol: "SOL", image: "solana" },
    FeaturedCoin { name: "XRP", symbol: "XRP", image: "xrp" },
];

/// Maps a URL ticker segment to the identifier the pricing API expects
///
/// Unknown tickers are passed through lower-cased.
pub fn resolve_coin_id(ticker: &str) -> String {
    let ticker = ticker.trim().to_lowercase();
    TICKER_TO_ID
        .iter()
        .find(|(known, _)| *known == ticker)
        .map(|(_, id)| id.to_string())
        .unwrap_or(ticker)
}
