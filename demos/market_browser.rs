use coin_market_sdk::{
    display::rank_for_display, routing::FEATURED_COINS, CoinDetailsService, Currency,
    MarketDataFetcher, Settings,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let query = args.next().unwrap_or_default();
    let ticker = args.next().unwrap_or_else(|| "btc".to_string());

    let settings = Settings::from_env()?;
    let provider = Arc::new(settings.coingecko_provider()?);
    let store = Arc::new(settings.open_store());

    println!("Coin Market Browser ({})", settings.currency.code().to_uppercase());
    println!("==================================");

    let fetcher = MarketDataFetcher::new(provider.clone(), settings.currency);
    fetcher.refresh().await;

    let state = fetcher.state();
    match (&state.error, state.coins_currency) {
        (Some(error), _) => println!("{error}"),
        (None, None) => println!("No data available."),
        (None, Some(priced_in)) => {
            let hits = fetcher.search(&query);
            if hits.is_empty() {
                println!("No Results Found");
            }
            for coin in hits {
                println!(
                    "{:<24} {:>20}",
                    format!("{} ({})", coin.name, coin.symbol.to_uppercase()),
                    priced_in.format_quote(coin.current_price)
                );
            }
        }
    }

    println!("\nWhat everyone is reading:");
    for coin in FEATURED_COINS {
        println!("  {:<14} /crypto/{}", coin.name, coin.page_segment());
    }

    println!("\nOpening /crypto/{ticker} ...");
    let details = CoinDetailsService::new(provider, store.clone());
    let page = details.open(&ticker).await;
    match (page.details(), page.error()) {
        (Some(coin), _) => {
            println!(
                "{} ({}) {}  24h: {:.2}%",
                coin.name,
                coin.symbol.to_uppercase(),
                Currency::Usd.format_quote(coin.current_price),
                coin.price_change_percentage_24h.unwrap_or_default()
            );
            if let (Some(high), Some(low)) = (coin.high_24h, coin.low_24h) {
                println!("High (24h): ${high:.2}  Low (24h): ${low:.2}");
            }
        }
        (None, Some(error)) => println!("{error}"),
        (None, None) => println!("No data available."),
    }

    println!("\nRecently viewed:");
    for coin in rank_for_display(&store.viewed()) {
        println!("  {:<14} {} views", coin.name, coin.views);
    }

    let metrics = fetcher.metrics().await;
    println!(
        "\nProvider {}: p50={:.0}ms success_rate={:.1}%",
        metrics.provider_name,
        metrics.latency_p50_ms,
        metrics.success_rate * 100.0
    );
    let details_metrics = details.metrics().await;
    println!(
        "Details lookups: {} total, {} failed",
        details_metrics.total_requests, details_metrics.failed_requests
    );

    Ok(())
}
