use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketDataResponse {
    pub fundamentals: Vec<FundamentalRecord>,
    pub prices: PriceSeries,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundamentalRecord {
    pub ticker: String,
    pub company_name: Option<String>,
    pub sector: Option<String>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub roe: Option<f64>,
    pub debt_to_equity: Option<f64>,
}

/// Daily closes keyed by ticker; `null` marks a missing close.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    pub dates: Vec<NaiveDate>,
    pub series: BTreeMap<String, Vec<Option<f64>>>,
}
