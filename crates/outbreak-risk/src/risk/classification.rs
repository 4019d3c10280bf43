use serde::{Deserialize, Serialize};

/// Scores strictly above this are high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.55;
/// Scores at or above this (and not high) are medium risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.45;

/// Action band for a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW RISK",
            RiskLevel::Medium => "MEDIUM RISK",
            RiskLevel::High => "HIGH RISK",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            RiskLevel::Low => "Continue routine surveillance",
            RiskLevel::Medium => "Monitor situation closely",
            RiskLevel::High => "Immediate intervention required",
        }
    }
}
