pub mod allocate;
pub mod error;
pub mod optimizer;
pub mod screen;

use crate::domain::profile::{self, RiskProfile};
use crate::domain::request::PortfolioRequest;
use crate::ingest::provider::MarketDataProvider;
use crate::market::universe;
use crate::pipeline::allocate::{AllocationLine, FinancialSummary};
use crate::pipeline::error::RecommendError;
use crate::pipeline::optimizer::PortfolioMetrics;
use chrono::NaiveDate;

/// Fully computed recommendation, raw numbers only. Formatting happens
/// at response assembly.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub as_of_date: NaiveDate,
    pub profile: RiskProfile,
    pub metrics: PortfolioMetrics,
    pub lines: Vec<AllocationLine>,
    pub summary: FinancialSummary,
}

/// Runs the whole pipeline for one request: profile analysis, market
/// data fetch, universe screening, mean-variance optimization and lot
/// allocation. Every expected failure comes back as a typed
/// [`RecommendError`]; nothing here panics on bad market data.
pub async fn recommend(
    provider: &dyn MarketDataProvider,
    request: &PortfolioRequest,
) -> Result<Recommendation, RecommendError> {
    let profile = profile::analyze(request);
    tracing::info!(
        risk_score = profile.risk_score,
        strategy = profile.strategy.name(),
        objective = ?profile.target,
        "analyzed investor profile"
    );

    let tickers = universe::tickers();
    let response = match provider.fetch_market_data(&tickers).await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(provider = provider.provider_name(), error = %err, "market data fetch failed");
            return Err(RecommendError::DataUnavailable);
        }
    };

    let (fundamentals, raw_prices) = match crate::ingest::build_market_tables(response) {
        Ok(tables) => tables,
        Err(err) => {
            tracing::error!(error = %err, "market data response was unusable");
            return Err(RecommendError::DataUnavailable);
        }
    };

    let (fundamentals, prices) = crate::ingest::synchronize(fundamentals, raw_prices);
    if fundamentals.len() < screen::MIN_ELIGIBLE_TICKERS || prices.is_empty() {
        tracing::error!(
            fundamentals = fundamentals.len(),
            dense_rows = prices.n_rows(),
            "too little synchronized market data"
        );
        return Err(RecommendError::DataUnavailable);
    }
    tracing::info!(
        tickers = fundamentals.len(),
        dense_rows = prices.n_rows(),
        "market data synchronized"
    );

    let eligible = screen::screen_universe(&fundamentals, &prices.tickers, &profile.filters)?;

    let eligible_prices = prices.select(&eligible);
    let portfolio = optimizer::optimize(&eligible_prices, profile.target)?;

    let (lines, summary) = allocate::allocate_lots(
        &portfolio.weights,
        &eligible_prices.last_prices(),
        request.initial_capital,
        &fundamentals,
    );
    tracing::info!(
        positions = lines.len(),
        total_invested = summary.total_invested,
        "allocation complete"
    );

    let as_of_date = eligible_prices
        .last_date()
        .ok_or(RecommendError::DataUnavailable)?;

    Ok(Recommendation {
        as_of_date,
        profile,
        metrics: portfolio.metrics,
        lines,
        summary,
    })
}
