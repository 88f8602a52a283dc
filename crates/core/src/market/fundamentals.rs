use serde::{Deserialize, Serialize};

// Quality screen thresholds. Market cap is in IDR.
pub const MIN_MARKET_CAP: f64 = 5e12;
pub const MAX_PE_RATIO: f64 = 30.0;
pub const MIN_ROE: f64 = 0.08;
pub const MAX_DEBT_TO_EQUITY: f64 = 2.0;

// Sentinel defaults for missing ratios. Chosen so that a missing value
// fails the corresponding screen bound (P/E, ROE) or passes it (DER).
const DEFAULT_PE_RATIO: f64 = 999.0;
const DEFAULT_ROE: f64 = -1.0;
const DEFAULT_DEBT_TO_EQUITY: f64 = 0.0;

/// One row of the fundamentals table, in provider order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fundamental {
    pub ticker: String,
    pub company_name: String,
    pub sector: String,
    pub principle_compliant: bool,
    pub market_cap: f64,
    pub pe_ratio: Option<f64>,
    pub roe: Option<f64>,
    pub debt_to_equity: Option<f64>,
}

impl Fundamental {
    pub fn imputed_pe_ratio(&self) -> f64 {
        self.pe_ratio.unwrap_or(DEFAULT_PE_RATIO)
    }

    pub fn imputed_roe(&self) -> f64 {
        self.roe.unwrap_or(DEFAULT_ROE)
    }

    pub fn imputed_debt_to_equity(&self) -> f64 {
        self.debt_to_equity.unwrap_or(DEFAULT_DEBT_TO_EQUITY)
    }

    /// Fundamental eligibility predicate, evaluated on imputed values.
    pub fn passes_quality_screen(&self) -> bool {
        let pe = self.imputed_pe_ratio();
        self.market_cap > MIN_MARKET_CAP
            && pe > 0.0
            && pe < MAX_PE_RATIO
            && self.imputed_roe() > MIN_ROE
            && self.imputed_debt_to_equity() < MAX_DEBT_TO_EQUITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Fundamental {
        Fundamental {
            ticker: "BBCA.JK".to_string(),
            company_name: "Bank Central Asia".to_string(),
            sector: "Financial Services".to_string(),
            principle_compliant: false,
            market_cap: 1.2e15,
            pe_ratio: Some(22.0),
            roe: Some(0.18),
            debt_to_equity: Some(0.9),
        }
    }

    #[test]
    fn imputes_missing_ratios_with_sentinels() {
        let f = Fundamental {
            pe_ratio: None,
            roe: None,
            debt_to_equity: None,
            ..row()
        };
        assert_eq!(f.imputed_pe_ratio(), 999.0);
        assert_eq!(f.imputed_roe(), -1.0);
        assert_eq!(f.imputed_debt_to_equity(), 0.0);
    }

    #[test]
    fn quality_screen_accepts_healthy_row() {
        assert!(row().passes_quality_screen());
    }

    #[test]
    fn quality_screen_rejects_each_bound() {
        let small_cap = Fundamental { market_cap: 4.9e12, ..row() };
        assert!(!small_cap.passes_quality_screen());

        let expensive = Fundamental { pe_ratio: Some(30.0), ..row() };
        assert!(!expensive.passes_quality_screen());

        let negative_pe = Fundamental { pe_ratio: Some(-5.0), ..row() };
        assert!(!negative_pe.passes_quality_screen());

        let weak_roe = Fundamental { roe: Some(0.08), ..row() };
        assert!(!weak_roe.passes_quality_screen());

        let leveraged = Fundamental { debt_to_equity: Some(2.0), ..row() };
        assert!(!leveraged.passes_quality_screen());
    }

    #[test]
    fn missing_pe_or_roe_fails_screen_but_missing_der_passes() {
        let no_pe = Fundamental { pe_ratio: None, ..row() };
        assert!(!no_pe.passes_quality_screen());

        let no_roe = Fundamental { roe: None, ..row() };
        assert!(!no_roe.passes_quality_screen());

        let no_der = Fundamental { debt_to_equity: None, ..row() };
        assert!(no_der.passes_quality_screen());
    }
}
