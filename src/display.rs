//! Ordering and filtering of lists for presentation

use crate::{
    constants::MAX_VIEWED_COINS,
    types::{CoinSnapshot, ViewedCoin},
};

/// Orders the recently viewed list for display
///
/// Short lists keep the store's insertion order. Once the list is full it
/// is ranked by view count, highest first; ties keep insertion order.
pub fn rank_for_display(viewed: &[ViewedCoin]) -> Vec<ViewedCoin> {
    if viewed.len() < MAX_VIEWED_COINS {
        return viewed.to_vec();
    }

    let mut ranked = viewed.to_vec();
    ranked.sort_by(|a, b| b.views.cmp(&a.views));
    ranked.truncate(MAX_VIEWED_COINS);
    ranked
}

/// Keeps coins whose display name contains `query`, ignoring case
pub fn filter_by_name(coins: &[CoinSnapshot], query: &str) -> Vec<CoinSnapshot> {
    let query = query.to_lowercase();
    coins
        .iter()
        .filter(|coin| coin.name.to_lowercase().contains(&query))
        .cloned()
        .collect()
}
