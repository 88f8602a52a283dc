use crate::market::fundamentals::Fundamental;
use std::collections::BTreeMap;

/// Minimum tradable unit on the exchange: one lot = 100 shares.
pub const LOT_SIZE: f64 = 100.0;

/// One purchased position, all values in raw numeric form.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationLine {
    pub ticker: String,
    pub company_name: String,
    pub sector: String,
    pub target_weight: f64,
    pub invested: f64,
    pub lots: u64,
    pub price_per_share: f64,
    pub actual_weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinancialSummary {
    pub total_invested: f64,
    pub unallocated_cash: f64,
    /// None when there was no capital to invest.
    pub invested_fraction: Option<f64>,
}

/// Converts target weights into whole-lot purchases under the capital
/// constraint. Floor rounding guarantees no line overspends its target
/// and the total never exceeds the capital.
pub fn allocate_lots(
    weights: &[(String, f64)],
    last_prices: &BTreeMap<String, f64>,
    capital: f64,
    fundamentals: &[Fundamental],
) -> (Vec<AllocationLine>, FinancialSummary) {
    let mut lines = Vec::new();

    for (ticker, weight) in weights {
        if *weight <= 0.0 {
            continue;
        }

        let price = match last_prices.get(ticker) {
            Some(p) if p.is_finite() && *p > 0.0 => *p,
            _ => {
                tracing::warn!(%ticker, "no valid last price; skipping allocation");
                continue;
            }
        };

        let lots = ((capital * weight) / (LOT_SIZE * price)).floor();
        if lots < 1.0 {
            continue;
        }

        let invested = lots * LOT_SIZE * price;
        let (company_name, sector) = fundamentals
            .iter()
            .find(|f| f.ticker == *ticker)
            .map(|f| (f.company_name.clone(), f.sector.clone()))
            .unwrap_or_else(|| ("N/A".to_string(), "N/A".to_string()));

        lines.push(AllocationLine {
            ticker: ticker.clone(),
            company_name,
            sector,
            target_weight: *weight,
            invested,
            lots: lots as u64,
            price_per_share: price,
            actual_weight: 0.0,
        });
    }

    let total_invested: f64 = lines.iter().map(|l| l.invested).sum();
    for line in lines.iter_mut() {
        line.actual_weight = if total_invested > 0.0 {
            line.invested / total_invested
        } else {
            0.0
        };
    }

    let summary = FinancialSummary {
        total_invested,
        unallocated_cash: capital - total_invested,
        invested_fraction: if capital > 0.0 {
            Some(total_invested / capital)
        } else {
            None
        },
    };

    (lines, summary)
}
