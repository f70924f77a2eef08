//! Constants for the coin market SDK
//!
//! Defaults for everything the SDK talks to live here. Values that a
//! deployment may want to override (API base URL, data directory, default
//! currency, request timeout) are also read by [`crate::config::Settings`].

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko endpoint for ranked market snapshots
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// Ordering requested from the markets endpoint
pub const MARKETS_ORDER: &str = "market_cap_desc";

/// Number of coins requested per page
pub const MARKETS_PER_PAGE: u32 = 50;

/// Only the first page is ever requested
pub const MARKETS_PAGE: u32 = 1;

/// HTTP request timeout when fetching market data (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "coin-market-sdk/0.1.0";

/// Maximum number of entries kept by the viewed-coins store
pub const MAX_VIEWED_COINS: usize = 10;

/// Storage key the viewed-coins list is persisted under
pub const VIEWED_STORE_KEY: &str = "crypto-store";

/// Default directory for persisted state
pub const DEFAULT_DATA_DIR: &str = "./.coin-market";

/// Shown when the API answers 429
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests. Please wait a moment.";

/// Shown for HTTP and network failures of the market list
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch data. Please try again later.";

/// Shown for failures that are neither HTTP nor network related
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Shown when a details lookup returns no coin
pub const NOT_FOUND_MESSAGE: &str = "Crypto not found";

/// Shown for any other failure of a details lookup
pub const DETAILS_FAILED_MESSAGE: &str = "Failed to fetch crypto details.";
