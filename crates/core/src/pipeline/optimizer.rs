use crate::analytics::{covariance, returns, RISK_FREE_RATE, TRADING_DAYS_PER_YEAR};
use crate::domain::profile::OptimizationTarget;
use crate::market::prices::DensePrices;
use crate::pipeline::error::RecommendError;
use ndarray::{Array1, Array2};

pub const MSG_INSUFFICIENT_HISTORY: &str = "insufficient historical data";

/// Minimum dense price rows required before estimating anything.
pub const MIN_HISTORY_ROWS: usize = 60;

/// Holdings below this fraction are treated as numerical noise.
const WEIGHT_CUTOFF: f64 = 1e-4;

const MAX_ITERATIONS: usize = 2000;
const LEARNING_RATE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioMetrics {
    pub expected_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
}

#[derive(Debug, Clone)]
pub struct OptimizedPortfolio {
    /// Cleaned target weights in price-column order; zeroed entries stay
    /// in place so callers can keep a stable ticker ordering.
    pub weights: Vec<(String, f64)>,
    pub metrics: PortfolioMetrics,
}

/// Runs the mean-variance optimization over the eligible price history.
pub fn optimize(
    prices: &DensePrices,
    target: OptimizationTarget,
) -> Result<OptimizedPortfolio, RecommendError> {
    if prices.n_rows() < MIN_HISTORY_ROWS {
        return Err(RecommendError::InsufficientHistory(
            MSG_INSUFFICIENT_HISTORY.to_string(),
        ));
    }

    let daily = returns::daily_returns(&prices.values);
    let mu = returns::capm_expected_returns(&daily, RISK_FREE_RATE, TRADING_DAYS_PER_YEAR);
    let cov = covariance::ledoit_wolf(&daily, TRADING_DAYS_PER_YEAR);

    let raw = solve_weights(&mu, &cov, target)
        .map_err(|reason| RecommendError::OptimizationFailure(format!("optimization failed: {reason}")))?;

    let cleaned = clean_weights(&prices.tickers, &raw, WEIGHT_CUTOFF);
    let final_weights: Array1<f64> = cleaned.iter().map(|(_, w)| *w).collect();
    let metrics = portfolio_performance(&final_weights, &mu, &cov, RISK_FREE_RATE);

    tracing::info!(
        expected_return = metrics.expected_return,
        volatility = metrics.volatility,
        sharpe = metrics.sharpe_ratio,
        "optimization complete"
    );

    Ok(OptimizedPortfolio {
        weights: cleaned,
        metrics,
    })
}

/// Long-only mean-variance solve by projected gradient iteration on the
/// simplex (weights >= 0, sum = 1). Deterministic for fixed inputs.
pub fn solve_weights(
    mu: &Array1<f64>,
    cov: &Array2<f64>,
    target: OptimizationTarget,
) -> Result<Array1<f64>, String> {
    let n = mu.len();
    if n < 2 {
        return Err("at least two assets are required".to_string());
    }
    if mu.iter().any(|v| !v.is_finite()) {
        return Err("expected returns contain non-finite values".to_string());
    }
    if cov.iter().any(|v| !v.is_finite()) {
        return Err("covariance matrix contains non-finite values".to_string());
    }

    let mut w = Array1::from_elem(n, 1.0 / n as f64);

    for _ in 0..MAX_ITERATIONS {
        let sigma_w = cov.dot(&w);

        match target {
            OptimizationTarget::MinVolatility => {
                let grad = &sigma_w * 2.0;
                w = &w - &(&grad * LEARNING_RATE);
            }
            OptimizationTarget::MaxSharpe => {
                let variance = w.dot(&sigma_w);
                if variance <= 1e-16 {
                    break;
                }
                let vol = variance.sqrt();
                let excess = w.dot(mu) - RISK_FREE_RATE;
                let grad_vol = &sigma_w / vol;
                let grad = (mu * vol - &grad_vol * excess) / variance;
                w = &w + &(&grad * LEARNING_RATE);
            }
        }

        if !project_long_only(&mut w) {
            return Err("weights collapsed during projection".to_string());
        }
    }

    if w.iter().any(|v| !v.is_finite()) {
        return Err("solver produced non-finite weights".to_string());
    }

    Ok(w)
}

/// Clamps negatives to zero and renormalizes onto the unit simplex.
/// Returns false when no mass remains.
fn project_long_only(w: &mut Array1<f64>) -> bool {
    for v in w.iter_mut() {
        if !v.is_finite() || *v < 0.0 {
            *v = 0.0;
        }
    }
    let sum = w.sum();
    if sum <= f64::EPSILON {
        return false;
    }
    *w /= sum;
    true
}

/// Zeroes holdings below `cutoff` and renormalizes the rest to sum 1.
pub fn clean_weights(tickers: &[String], weights: &Array1<f64>, cutoff: f64) -> Vec<(String, f64)> {
    let kept: f64 = weights.iter().filter(|v| **v >= cutoff).sum();
    tickers
        .iter()
        .zip(weights.iter())
        .map(|(ticker, &w)| {
            let cleaned = if w < cutoff || kept <= 0.0 { 0.0 } else { w / kept };
            (ticker.clone(), cleaned)
        })
        .collect()
}

pub fn portfolio_performance(
    weights: &Array1<f64>,
    mu: &Array1<f64>,
    cov: &Array2<f64>,
    risk_free_rate: f64,
) -> PortfolioMetrics {
    let expected_return = weights.dot(mu);
    let variance = weights.dot(&cov.dot(weights));
    let volatility = variance.max(0.0).sqrt();
    let sharpe_ratio = if volatility > 0.0 {
        (expected_return - risk_free_rate) / volatility
    } else {
        0.0
    };

    PortfolioMetrics {
        expected_return,
        volatility,
        sharpe_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn assert_valid_simplex(w: &Array1<f64>) {
        assert!(w.iter().all(|v| *v >= 0.0));
        assert!((w.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn min_volatility_prefers_the_quiet_asset() {
        let mu = array![0.10, 0.10];
        let cov = array![[0.02, 0.0], [0.0, 0.40]];
        let w = solve_weights(&mu, &cov, OptimizationTarget::MinVolatility).unwrap();
        assert_valid_simplex(&w);
        assert!(w[0] > w[1]);
        assert!(w[0] > 0.8);
    }

    #[test]
    fn max_sharpe_prefers_the_rewarding_asset() {
        let mu = array![0.25, 0.05];
        let cov = array![[0.04, 0.01], [0.01, 0.04]];
        let w = solve_weights(&mu, &cov, OptimizationTarget::MaxSharpe).unwrap();
        assert_valid_simplex(&w);
        assert!(w[0] > w[1]);
    }

    #[test]
    fn solver_is_deterministic() {
        let mu = array![0.18, 0.12, 0.07];
        let cov = array![
            [0.05, 0.01, 0.004],
            [0.01, 0.03, 0.008],
            [0.004, 0.008, 0.02]
        ];
        let a = solve_weights(&mu, &cov, OptimizationTarget::MaxSharpe).unwrap();
        let b = solve_weights(&mu, &cov, OptimizationTarget::MaxSharpe).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_non_finite_inputs() {
        let mu = array![f64::NAN, 0.1];
        let cov = array![[0.1, 0.0], [0.0, 0.1]];
        let err = solve_weights(&mu, &cov, OptimizationTarget::MaxSharpe).unwrap_err();
        assert!(err.contains("non-finite"));

        let mu = array![0.1, 0.1];
        let cov = array![[f64::INFINITY, 0.0], [0.0, 0.1]];
        assert!(solve_weights(&mu, &cov, OptimizationTarget::MinVolatility).is_err());
    }

    #[test]
    fn rejects_single_asset() {
        let mu = array![0.1];
        let cov = array![[0.1]];
        assert!(solve_weights(&mu, &cov, OptimizationTarget::MaxSharpe).is_err());
    }

    #[test]
    fn clean_weights_drops_dust_and_renormalizes() {
        let tickers = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let raw = array![0.6, 0.4 - 5e-5, 5e-5];
        let cleaned = clean_weights(&tickers, &raw, 1e-4);

        assert_eq!(cleaned[2].1, 0.0);
        let total: f64 = cleaned.iter().map(|(_, w)| *w).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(cleaned[0].1 > cleaned[1].1);
    }

    #[test]
    fn performance_matches_hand_computation() {
        let w = array![0.5, 0.5];
        let mu = array![0.10, 0.20];
        let cov = array![[0.04, 0.0], [0.0, 0.04]];
        let m = portfolio_performance(&w, &mu, &cov, 0.02);

        assert!((m.expected_return - 0.15).abs() < 1e-12);
        assert!((m.volatility - (0.02f64).sqrt()).abs() < 1e-12);
        assert!((m.sharpe_ratio - (0.13 / (0.02f64).sqrt())).abs() < 1e-12);
    }

    #[test]
    fn zero_volatility_guards_the_sharpe_ratio() {
        let w = array![1.0, 0.0];
        let mu = array![0.10, 0.20];
        let cov = array![[0.0, 0.0], [0.0, 0.0]];
        let m = portfolio_performance(&w, &mu, &cov, 0.02);
        assert_eq!(m.sharpe_ratio, 0.0);
    }
}
