use crate::domain::request::PortfolioRequest;
use crate::pipeline::Recommendation;
use serde::{Deserialize, Serialize};

const PORTFOLIO_NAME: &str = "Arta Optimal Portfolio (Live Data)";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub input_summary: InputSummary,
    pub portfolio_recommendation: PortfolioRecommendation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSummary {
    pub initial_capital: String,
    pub investment_goal: String,
    pub time_horizon: String,
    pub risk_score: i32,
    pub determined_strategy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioRecommendation {
    pub portfolio_name: String,
    pub data_as_of_date: String,
    pub portfolio_metrics: MetricsView,
    pub allocation_details: Vec<AllocationView>,
    pub financial_summary: SummaryView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsView {
    pub expected_annual_return: String,
    pub annual_volatility_risk: String,
    pub sharpe_ratio: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationView {
    pub ticker: String,
    pub company_name: String,
    pub sector: String,
    pub target_weight_percentage: String,
    pub invested_capital: String,
    pub lots: u64,
    pub price_per_share: String,
    pub actual_weight_percentage: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryView {
    pub total_capital_invested: String,
    pub unallocated_cash_due_to_lot_rounding: String,
    pub percentage_of_capital_invested: String,
}

/// Renders the numeric pipeline output into the response payload. This
/// is the only place amounts and ratios become display strings.
pub fn build_response(
    request: &PortfolioRequest,
    recommendation: &Recommendation,
) -> RecommendationResponse {
    let metrics = &recommendation.metrics;
    let summary = &recommendation.summary;

    let allocation_details = recommendation
        .lines
        .iter()
        .map(|line| AllocationView {
            ticker: line.ticker.clone(),
            company_name: line.company_name.clone(),
            sector: line.sector.clone(),
            target_weight_percentage: format_pct(line.target_weight),
            invested_capital: format_idr(line.invested),
            lots: line.lots,
            price_per_share: format_idr(line.price_per_share),
            actual_weight_percentage: format_pct(line.actual_weight),
        })
        .collect();

    RecommendationResponse {
        input_summary: InputSummary {
            initial_capital: format_idr(request.initial_capital),
            investment_goal: request.investment_goal.clone(),
            time_horizon: request.time_horizon.clone(),
            risk_score: recommendation.profile.risk_score,
            determined_strategy: recommendation.profile.strategy.name().to_string(),
        },
        portfolio_recommendation: PortfolioRecommendation {
            portfolio_name: PORTFOLIO_NAME.to_string(),
            data_as_of_date: recommendation.as_of_date.format("%Y-%m-%d").to_string(),
            portfolio_metrics: MetricsView {
                expected_annual_return: format_pct(metrics.expected_return),
                annual_volatility_risk: format_pct(metrics.volatility),
                sharpe_ratio: format!("{:.2}", metrics.sharpe_ratio),
            },
            allocation_details,
            financial_summary: SummaryView {
                total_capital_invested: format_idr(summary.total_invested),
                unallocated_cash_due_to_lot_rounding: format_idr(summary.unallocated_cash),
                percentage_of_capital_invested: summary
                    .invested_fraction
                    .map(format_pct)
                    .unwrap_or_else(|| "N/A".to_string()),
            },
        },
    }
}

/// Rounded rupiah amount with thousands separators, e.g. "Rp 9,500,000".
pub fn format_idr(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded < 0 {
        format!("Rp -{grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

/// Fraction as a percentage with two decimals, e.g. 0.1234 -> "12.34%".
pub fn format_pct(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}
