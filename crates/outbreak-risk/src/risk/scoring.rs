use serde::Serialize;
use tracing::trace;

use super::domain::{clamp_unit, RiskFactor, RiskFactorSet, WeightProfile};

/// Share of the blended score taken from current conditions.
pub const CURRENT_CONDITIONS_SHARE: f64 = 0.7;
/// Share of the blended score anchored to the region's historical base risk.
pub const BASE_RISK_SHARE: f64 = 0.3;

/// One weighting step of a score computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorContribution {
    pub factor: RiskFactor,
    pub value: f64,
    /// Value after inversion for risk-inverted factors.
    pub effective_value: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Full audit trail of a score, from contributions to the clamped result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub components: Vec<FactorContribution>,
    pub total_weight: f64,
    pub raw_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_risk_score: Option<f64>,
    pub risk_score: f64,
}

/// Hook invoked while a score is computed. Both methods default to no-ops.
pub trait ScoreObserver {
    fn on_contribution(&self, _contribution: &FactorContribution) {}
    fn on_score(&self, _breakdown: &ScoreBreakdown) {}
}

/// Emits every weighting step as a `trace` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ScoreObserver for TracingObserver {
    fn on_contribution(&self, step: &FactorContribution) {
        trace!(
            factor = %step.factor,
            value = step.value,
            weight = step.weight,
            contribution = step.contribution,
            "weighted risk factor"
        );
    }

    fn on_score(&self, breakdown: &ScoreBreakdown) {
        trace!(
            raw = breakdown.raw_score,
            base = ?breakdown.base_risk_score,
            score = breakdown.risk_score,
            "risk score computed"
        );
    }
}

struct SilentObserver;

impl ScoreObserver for SilentObserver {}

/// Stateless scorer bound to a weight profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEngine {
    weights: WeightProfile,
}

impl ScoreEngine {
    pub fn new(weights: WeightProfile) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &WeightProfile {
        &self.weights
    }

    pub fn score(&self, factors: &RiskFactorSet, base_risk_score: Option<f64>) -> f64 {
        self.breakdown(factors, base_risk_score).risk_score
    }

    pub fn breakdown(&self, factors: &RiskFactorSet, base_risk_score: Option<f64>) -> ScoreBreakdown {
        self.breakdown_observed(factors, base_risk_score, &SilentObserver)
    }

    pub fn breakdown_observed(
        &self,
        factors: &RiskFactorSet,
        base_risk_score: Option<f64>,
        observer: &dyn ScoreObserver,
    ) -> ScoreBreakdown {
        let mut components = Vec::with_capacity(RiskFactor::ALL.len());
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;

        for (factor, weight) in self.weights.iter() {
            let value = factors.get(factor);
            let effective_value = if factor.is_inverted() {
                1.0 - value
            } else {
                value
            };
            let step = FactorContribution {
                factor,
                value,
                effective_value,
                weight,
                contribution: weight * effective_value,
            };
            observer.on_contribution(&step);

            weighted_sum += step.contribution;
            total_weight += weight;
            components.push(step);
        }

        let raw_score = if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        };

        let base_risk_score = base_risk_score.map(clamp_unit);
        let blended = match base_risk_score {
            Some(base) => CURRENT_CONDITIONS_SHARE * raw_score + BASE_RISK_SHARE * base,
            None => raw_score,
        };

        let breakdown = ScoreBreakdown {
            components,
            total_weight,
            raw_score,
            base_risk_score,
            risk_score: clamp_unit(blended),
        };
        observer.on_score(&breakdown);
        breakdown
    }
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::new(WeightProfile::standard())
    }
}

/// Composite risk score in [0, 1].
pub fn compute_score(
    factors: &RiskFactorSet,
    weights: &WeightProfile,
    base_risk_score: Option<f64>,
) -> f64 {
    ScoreEngine::new(*weights).score(factors, base_risk_score)
}
