use crate::domain::profile::UniverseFilters;
use crate::market::fundamentals::Fundamental;
use crate::pipeline::error::RecommendError;
use std::collections::HashSet;

pub const MSG_NO_QUALITY_STOCKS: &str = "no stocks passed fundamental filter";
pub const MSG_TOO_FEW_STOCKS: &str = "insufficient diversifiable stocks";

/// Minimum number of tickers needed for a diversified portfolio.
pub const MIN_ELIGIBLE_TICKERS: usize = 2;

/// Applies the fundamental quality screen and the user's preference
/// filters, then intersects with the tickers that actually have price
/// history. Output preserves fundamentals-table order.
pub fn screen_universe(
    fundamentals: &[Fundamental],
    price_tickers: &[String],
    filters: &UniverseFilters,
) -> Result<Vec<String>, RecommendError> {
    let quality: Vec<&Fundamental> = fundamentals
        .iter()
        .filter(|f| f.passes_quality_screen())
        .collect();
    tracing::debug!(count = quality.len(), "stocks past fundamental screen");

    if quality.is_empty() {
        return Err(RecommendError::FilterExhausted(
            MSG_NO_QUALITY_STOCKS.to_string(),
        ));
    }

    let compliant: Vec<&Fundamental> = if filters.compliant_only {
        quality.into_iter().filter(|f| f.principle_compliant).collect()
    } else {
        quality
    };
    tracing::debug!(count = compliant.len(), "stocks past compliance filter");

    let sector_matched: Vec<&Fundamental> = if filters.sectors.is_empty() {
        compliant
    } else {
        compliant
            .into_iter()
            .filter(|f| filters.sectors.iter().any(|s| *s == f.sector))
            .collect()
    };
    tracing::debug!(count = sector_matched.len(), "stocks past sector filter");

    let priced: HashSet<&str> = price_tickers.iter().map(|s| s.as_str()).collect();
    let eligible: Vec<String> = sector_matched
        .iter()
        .filter(|f| priced.contains(f.ticker.as_str()))
        .map(|f| f.ticker.clone())
        .collect();

    if eligible.len() < MIN_ELIGIBLE_TICKERS {
        return Err(RecommendError::FilterExhausted(
            MSG_TOO_FEW_STOCKS.to_string(),
        ));
    }

    tracing::info!(tickers = ?eligible, "eligible universe selected");
    Ok(eligible)
}
