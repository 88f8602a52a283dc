use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioRequest {
    pub initial_capital: f64,
    pub investment_goal: String,
    pub time_horizon: String,
    pub risk_answers: RiskAnswers,
    pub preferences: Preferences,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAnswers {
    pub q1: String,
    pub q2: String,
    pub q3: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    pub sectors: Vec<String>,
    pub principles: Vec<String>,
}
