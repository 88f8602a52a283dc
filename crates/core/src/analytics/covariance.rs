use ndarray::Array2;

/// Ledoit-Wolf shrinkage covariance, annualized.
///
/// The sample covariance of the daily returns is shrunk toward the
/// constant-variance target (trace(S)/n on the diagonal, zero elsewhere)
/// with the standard plug-in shrinkage constant, clipped to [0, 1]. With
/// few assets and short windows the raw sample estimate is too noisy for
/// the optimizer; the shrunk matrix keeps its trace and stays well
/// conditioned.
pub fn ledoit_wolf(returns: &Array2<f64>, periods_per_year: f64) -> Array2<f64> {
    let (t, n) = returns.dim();
    if t < 2 || n == 0 {
        return Array2::zeros((n, n));
    }

    let mut x = returns.clone();
    for j in 0..n {
        let mean = x.column(j).mean().unwrap_or(0.0);
        for i in 0..t {
            x[[i, j]] -= mean;
        }
    }

    let sample = x.t().dot(&x) / t as f64;
    let mu = sample.diag().sum() / n as f64;

    // Squared distance between the sample and the target.
    let mut d2 = 0.0;
    for i in 0..n {
        for j in 0..n {
            let target = if i == j { mu } else { 0.0 };
            d2 += (sample[[i, j]] - target).powi(2);
        }
    }
    d2 /= n as f64;

    // Estimation-error term: dispersion of the per-observation outer
    // products around the sample covariance.
    let mut beta_sum = 0.0;
    for k in 0..t {
        let row = x.row(k);
        for i in 0..n {
            for j in 0..n {
                beta_sum += (row[i] * row[j] - sample[[i, j]]).powi(2);
            }
        }
    }
    let b2 = (beta_sum / ((t * t) as f64) / n as f64).min(d2);

    let shrinkage = if d2 > 0.0 { (b2 / d2).clamp(0.0, 1.0) } else { 1.0 };

    let mut shrunk = &sample * (1.0 - shrinkage);
    for i in 0..n {
        shrunk[[i, i]] += shrinkage * mu;
    }

    shrunk * periods_per_year
}
