use chrono::NaiveDate;
use ndarray::Array2;
use std::collections::{BTreeMap, HashSet};

/// Columns missing at least this fraction of values are dropped outright.
pub const MAX_MISSING_FRACTION: f64 = 0.1;

/// Daily close prices as fetched: one column per ticker, gaps allowed.
#[derive(Debug, Clone)]
pub struct RawPriceTable {
    pub dates: Vec<NaiveDate>,
    pub tickers: Vec<String>,
    /// Row-major, `rows[i][j]` is the close of `tickers[j]` on `dates[i]`.
    pub rows: Vec<Vec<Option<f64>>>,
}

impl RawPriceTable {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.tickers.is_empty()
    }

    /// Drops columns whose missing fraction is not below
    /// [`MAX_MISSING_FRACTION`]. Non-finite values count as missing.
    pub fn drop_sparse_columns(&self) -> RawPriceTable {
        let n_rows = self.dates.len();
        let keep: Vec<usize> = (0..self.tickers.len())
            .filter(|&j| {
                if n_rows == 0 {
                    return false;
                }
                let missing = self
                    .rows
                    .iter()
                    .filter(|row| !matches!(row[j], Some(v) if v.is_finite()))
                    .count();
                (missing as f64) / (n_rows as f64) < MAX_MISSING_FRACTION
            })
            .collect();

        self.take_columns(&keep)
    }

    /// Restricts the table to `tickers`, preserving column order.
    pub fn restrict(&self, tickers: &HashSet<&str>) -> RawPriceTable {
        let keep: Vec<usize> = (0..self.tickers.len())
            .filter(|&j| tickers.contains(self.tickers[j].as_str()))
            .collect();
        self.take_columns(&keep)
    }

    /// Drops every row that still has a gap, yielding a fully dense table.
    pub fn to_dense(&self) -> DensePrices {
        let keep_rows: Vec<usize> = (0..self.dates.len())
            .filter(|&i| {
                self.rows[i]
                    .iter()
                    .all(|cell| matches!(cell, Some(v) if v.is_finite()))
            })
            .collect();

        let n = self.tickers.len();
        let mut values = Array2::zeros((keep_rows.len(), n));
        let mut dates = Vec::with_capacity(keep_rows.len());
        for (out_i, &i) in keep_rows.iter().enumerate() {
            dates.push(self.dates[i]);
            for j in 0..n {
                // Guarded by the filter above.
                values[[out_i, j]] = self.rows[i][j].unwrap_or(f64::NAN);
            }
        }

        DensePrices {
            dates,
            tickers: self.tickers.clone(),
            values,
        }
    }

    fn take_columns(&self, keep: &[usize]) -> RawPriceTable {
        RawPriceTable {
            dates: self.dates.clone(),
            tickers: keep.iter().map(|&j| self.tickers[j].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&j| row[j]).collect())
                .collect(),
        }
    }
}

/// Dense close-price matrix, no gaps.
#[derive(Debug, Clone)]
pub struct DensePrices {
    pub dates: Vec<NaiveDate>,
    pub tickers: Vec<String>,
    pub values: Array2<f64>,
}

impl DensePrices {
    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn n_assets(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.tickers.is_empty()
    }

    /// Selects the given tickers, in the given order. Tickers without a
    /// column are ignored.
    pub fn select(&self, tickers: &[String]) -> DensePrices {
        let indices: Vec<usize> = tickers
            .iter()
            .filter_map(|t| self.tickers.iter().position(|c| c == t))
            .collect();

        let mut values = Array2::zeros((self.n_rows(), indices.len()));
        for (out_j, &j) in indices.iter().enumerate() {
            for i in 0..self.n_rows() {
                values[[i, out_j]] = self.values[[i, j]];
            }
        }

        DensePrices {
            dates: self.dates.clone(),
            tickers: indices.iter().map(|&j| self.tickers[j].clone()).collect(),
            values,
        }
    }

    /// Last available close per ticker.
    pub fn last_prices(&self) -> BTreeMap<String, f64> {
        let mut out = BTreeMap::new();
        if let Some(last) = self.n_rows().checked_sub(1) {
            for (j, ticker) in self.tickers.iter().enumerate() {
                out.insert(ticker.clone(), self.values[[last, j]]);
            }
        }
        out
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}
