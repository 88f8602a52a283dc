pub mod provider;
pub mod types;

use crate::market::fundamentals::Fundamental;
use crate::market::prices::{DensePrices, RawPriceTable};
use crate::market::universe;
use crate::ingest::types::MarketDataResponse;
use anyhow::Result;
use std::collections::HashSet;

/// Converts a provider response into domain tables. Records without a
/// positive market cap are skipped, matching the upstream feed which
/// reports zero for instruments it cannot value.
pub fn build_market_tables(resp: MarketDataResponse) -> Result<(Vec<Fundamental>, RawPriceTable)> {
    provider::validate_response(&resp)?;

    let mut fundamentals = Vec::with_capacity(resp.fundamentals.len());
    for record in resp.fundamentals {
        let market_cap = match record.market_cap {
            Some(cap) if cap > 0.0 => cap,
            _ => {
                tracing::warn!(ticker = %record.ticker, "missing market cap; skipping instrument");
                continue;
            }
        };

        let ticker = record.ticker;
        fundamentals.push(Fundamental {
            company_name: record.company_name.unwrap_or_else(|| ticker.clone()),
            sector: record.sector.unwrap_or_else(|| "N/A".to_string()),
            principle_compliant: universe::is_principle_compliant(&ticker),
            market_cap,
            pe_ratio: record.pe_ratio,
            roe: record.roe,
            debt_to_equity: record.debt_to_equity,
            ticker,
        });
    }

    let tickers: Vec<String> = resp.prices.series.keys().cloned().collect();
    let rows: Vec<Vec<Option<f64>>> = (0..resp.prices.dates.len())
        .map(|i| tickers.iter().map(|t| resp.prices.series[t][i]).collect())
        .collect();

    Ok((
        fundamentals,
        RawPriceTable {
            dates: resp.prices.dates,
            tickers,
            rows,
        },
    ))
}

/// Aligns the two tables: prunes sparse price columns, keeps only tickers
/// present in both tables, and drops any remaining gap rows so the result
/// is fully dense. Fundamentals keep their original order.
pub fn synchronize(
    fundamentals: Vec<Fundamental>,
    prices: RawPriceTable,
) -> (Vec<Fundamental>, DensePrices) {
    let pruned = prices.drop_sparse_columns();

    let priced: HashSet<&str> = pruned.tickers.iter().map(|s| s.as_str()).collect();
    let fundamentals: Vec<Fundamental> = fundamentals
        .into_iter()
        .filter(|f| priced.contains(f.ticker.as_str()))
        .collect();

    let known: HashSet<&str> = fundamentals.iter().map(|f| f.ticker.as_str()).collect();
    let dense = pruned.restrict(&known).to_dense();

    (fundamentals, dense)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::{FundamentalRecord, PriceSeries};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn record(ticker: &str, market_cap: Option<f64>) -> FundamentalRecord {
        FundamentalRecord {
            ticker: ticker.to_string(),
            company_name: None,
            sector: None,
            market_cap,
            pe_ratio: Some(15.0),
            roe: Some(0.2),
            debt_to_equity: Some(0.5),
        }
    }

    fn response() -> MarketDataResponse {
        let dates: Vec<NaiveDate> = (1..=10)
            .map(|d| NaiveDate::from_ymd_opt(2026, 2, d).unwrap())
            .collect();
        let mut series = BTreeMap::new();
        series.insert("ANTM.JK".to_string(), vec![Some(1500.0); 10]);
        series.insert("BBCA.JK".to_string(), vec![Some(9500.0); 10]);
        // Too sparse to survive column pruning.
        series.insert("GOTO.JK".to_string(), vec![None; 10]);

        MarketDataResponse {
            fundamentals: vec![
                record("BBCA.JK", Some(1.2e15)),
                record("ANTM.JK", Some(6.0e13)),
                record("GOTO.JK", Some(8.0e13)),
                record("ZERO.JK", Some(0.0)),
                record("NONE.JK", None),
            ],
            prices: PriceSeries { dates, series },
        }
    }

    #[test]
    fn skips_records_without_market_cap() {
        let (fundamentals, _) = build_market_tables(response()).unwrap();
        let tickers: Vec<&str> = fundamentals.iter().map(|f| f.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["BBCA.JK", "ANTM.JK", "GOTO.JK"]);
    }

    #[test]
    fn defaults_name_and_sector() {
        let (fundamentals, _) = build_market_tables(response()).unwrap();
        assert_eq!(fundamentals[0].company_name, "BBCA.JK");
        assert_eq!(fundamentals[0].sector, "N/A");
    }

    #[test]
    fn joins_compliance_flags_from_static_universe() {
        let (fundamentals, _) = build_market_tables(response()).unwrap();
        let antm = fundamentals.iter().find(|f| f.ticker == "ANTM.JK").unwrap();
        let bbca = fundamentals.iter().find(|f| f.ticker == "BBCA.JK").unwrap();
        assert!(antm.principle_compliant);
        assert!(!bbca.principle_compliant);
    }

    #[test]
    fn synchronize_intersects_tables_and_densifies() {
        let (fundamentals, prices) = build_market_tables(response()).unwrap();
        let (fundamentals, dense) = synchronize(fundamentals, prices);

        let tickers: Vec<&str> = fundamentals.iter().map(|f| f.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["BBCA.JK", "ANTM.JK"]);
        assert_eq!(dense.tickers, vec!["ANTM.JK", "BBCA.JK"]);
        assert_eq!(dense.n_rows(), 10);
    }
}
