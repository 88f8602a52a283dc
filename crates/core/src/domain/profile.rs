use crate::domain::request::PortfolioRequest;
use serde::Serialize;

/// Compliance tag recognized in `preferences.principles`.
pub const PRINCIPLE_COMPLIANCE_TAG: &str = "Syariah";
/// ESG tag recognized in `preferences.principles`. Carried through the
/// profile but not consumed by any downstream stage yet.
pub const PRINCIPLE_ESG_TAG: &str = "ESG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimeHorizon {
    Short,
    Medium,
    Long,
    VeryLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InvestmentStrategy {
    CapitalPreservation,
    Income,
    Balanced,
    BalancedGrowth,
    Growth,
    AggressiveGrowth,
}

impl InvestmentStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CapitalPreservation => "Capital Preservation",
            Self::Income => "Income",
            Self::Balanced => "Balanced",
            Self::BalancedGrowth => "Balanced Growth",
            Self::Growth => "Growth",
            Self::AggressiveGrowth => "Aggressive Growth",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OptimizationTarget {
    MinVolatility,
    MaxSharpe,
}

/// Preference filters passed through to universe screening.
#[derive(Debug, Clone, Serialize)]
pub struct UniverseFilters {
    pub sectors: Vec<String>,
    pub compliant_only: bool,
    pub esg_focus: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskProfile {
    pub risk_score: i32,
    pub horizon: TimeHorizon,
    pub strategy: InvestmentStrategy,
    pub target: OptimizationTarget,
    pub filters: UniverseFilters,
}

/// Derives the investor profile from questionnaire answers. Total, never
/// fails: unrecognized answers score as the lowest listed option for that
/// question and unrecognized horizons fall back to Medium.
pub fn analyze(request: &PortfolioRequest) -> RiskProfile {
    let answers = &request.risk_answers;
    let risk_score = q1_points(&answers.q1) + q2_points(&answers.q2) + q3_points(&answers.q3);
    let horizon = parse_horizon(&request.time_horizon);
    let strategy = select_strategy(horizon, risk_score);

    let principles = &request.preferences.principles;
    let filters = UniverseFilters {
        sectors: request.preferences.sectors.clone(),
        compliant_only: principles.iter().any(|p| p == PRINCIPLE_COMPLIANCE_TAG),
        esg_focus: principles.iter().any(|p| p == PRINCIPLE_ESG_TAG),
    };

    RiskProfile {
        risk_score,
        horizon,
        strategy,
        target: optimization_target(strategy),
        filters,
    }
}

fn q1_points(answer: &str) -> i32 {
    match answer {
        "A" => 10,
        "B" => 20,
        "C" => 30,
        "D" => 40,
        _ => 10,
    }
}

fn q2_points(answer: &str) -> i32 {
    match answer {
        "A" => 5,
        "B" => 15,
        "C" => 25,
        _ => 5,
    }
}

fn q3_points(answer: &str) -> i32 {
    match answer {
        "A" => 20,
        "B" => 10,
        "C" => 25,
        _ => 10,
    }
}

fn parse_horizon(label: &str) -> TimeHorizon {
    match label {
        "Kurang dari 3 tahun" => TimeHorizon::Short,
        "Antara 3 - 7 tahun" => TimeHorizon::Medium,
        "Antara 8 - 15 tahun" => TimeHorizon::Long,
        "Lebih dari 15 tahun" => TimeHorizon::VeryLong,
        _ => TimeHorizon::Medium,
    }
}

fn select_strategy(horizon: TimeHorizon, score: i32) -> InvestmentStrategy {
    match horizon {
        TimeHorizon::Long | TimeHorizon::VeryLong => {
            if score > 70 {
                InvestmentStrategy::AggressiveGrowth
            } else if score > 40 {
                InvestmentStrategy::Growth
            } else {
                InvestmentStrategy::BalancedGrowth
            }
        }
        TimeHorizon::Medium => {
            if score > 70 {
                InvestmentStrategy::BalancedGrowth
            } else if score > 40 {
                InvestmentStrategy::Balanced
            } else {
                InvestmentStrategy::Income
            }
        }
        TimeHorizon::Short => {
            if score > 40 {
                InvestmentStrategy::Income
            } else {
                InvestmentStrategy::CapitalPreservation
            }
        }
    }
}

fn optimization_target(strategy: InvestmentStrategy) -> OptimizationTarget {
    match strategy {
        InvestmentStrategy::CapitalPreservation => OptimizationTarget::MinVolatility,
        _ => OptimizationTarget::MaxSharpe,
    }
}
