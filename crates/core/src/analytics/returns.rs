use ndarray::{Array1, Array2};

/// Simple daily returns, one row fewer than the price matrix.
pub fn daily_returns(prices: &Array2<f64>) -> Array2<f64> {
    let (t, n) = prices.dim();
    if t < 2 {
        return Array2::zeros((0, n));
    }

    let mut out = Array2::zeros((t - 1, n));
    for i in 0..t - 1 {
        for j in 0..n {
            out[[i, j]] = prices[[i + 1, j]] / prices[[i, j]] - 1.0;
        }
    }
    out
}

/// CAPM expected annual returns.
///
/// The market proxy is the equal-weighted mean of the asset returns; each
/// asset's beta is its sample covariance with the proxy over the proxy
/// variance, and mu = rf + beta * (annualized market mean - rf).
pub fn capm_expected_returns(
    returns: &Array2<f64>,
    risk_free_rate: f64,
    periods_per_year: f64,
) -> Array1<f64> {
    let (t, n) = returns.dim();
    if t < 2 || n == 0 {
        return Array1::from_elem(n, risk_free_rate);
    }

    let market: Array1<f64> = (0..t)
        .map(|i| returns.row(i).mean().unwrap_or(0.0))
        .collect();
    let market_mean = market.mean().unwrap_or(0.0);

    let mut market_var = 0.0;
    for v in market.iter() {
        market_var += (v - market_mean).powi(2);
    }
    market_var /= (t - 1) as f64;

    let annual_market = market_mean * periods_per_year;

    let mut mu = Array1::zeros(n);
    for j in 0..n {
        let col = returns.column(j);
        let col_mean = col.mean().unwrap_or(0.0);

        let mut cov = 0.0;
        for i in 0..t {
            cov += (col[i] - col_mean) * (market[i] - market_mean);
        }
        cov /= (t - 1) as f64;

        let beta = if market_var > 0.0 { cov / market_var } else { 0.0 };
        mu[j] = risk_free_rate + beta * (annual_market - risk_free_rate);
    }

    mu
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn daily_returns_match_hand_computation() {
        let prices = array![[100.0, 200.0], [110.0, 190.0], [99.0, 209.0]];
        let r = daily_returns(&prices);
        assert_eq!(r.dim(), (2, 2));
        assert!((r[[0, 0]] - 0.10).abs() < 1e-12);
        assert!((r[[0, 1]] + 0.05).abs() < 1e-12);
        assert!((r[[1, 0]] + 0.10).abs() < 1e-12);
        assert!((r[[1, 1]] - 0.10).abs() < 1e-12);
    }

    #[test]
    fn identical_assets_get_the_annualized_market_return() {
        // Two identical columns: betas are exactly 1, so mu equals the
        // annualized market mean for both.
        let mut prices = Array2::zeros((40, 2));
        let mut p = 100.0;
        for i in 0..40 {
            prices[[i, 0]] = p;
            prices[[i, 1]] = p;
            p *= 1.0 + 0.002 + 0.01 * ((i as f64) * 0.7).sin();
        }

        let r = daily_returns(&prices);
        let mu = capm_expected_returns(&r, 0.02, 252.0);
        let market_annual = r.column(0).mean().unwrap() * 252.0;

        assert!((mu[0] - mu[1]).abs() < 1e-12);
        assert!((mu[0] - market_annual).abs() < 1e-9);
    }

    #[test]
    fn higher_beta_earns_more_when_market_beats_the_risk_free_rate() {
        // Asset 1 moves twice as much as asset 0 each day.
        let mut prices = Array2::zeros((60, 2));
        let (mut a, mut b) = (100.0, 100.0);
        for i in 0..60 {
            prices[[i, 0]] = a;
            prices[[i, 1]] = b;
            let r = 0.001 + 0.008 * ((i as f64) * 0.9).sin();
            a *= 1.0 + r;
            b *= 1.0 + 2.0 * r;
        }

        let r = daily_returns(&prices);
        let mu = capm_expected_returns(&r, 0.02, 252.0);
        assert!(mu[1] > mu[0]);
    }
}
