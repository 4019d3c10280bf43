use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{RiskFactorSet, WeightProfile};
use super::interventions::{
    apply_interventions, apply_seasonal_events, ActiveIntervention, Month, SeasonalEvent,
    FIRST_MONTH, LAST_MONTH,
};
use super::regions::Region;
use super::scoring::ScoreEngine;

/// Number of monthly slots in every projection.
pub const PROJECTION_HORIZON: usize = 12;

/// How the before/after series are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    /// Score once with and once without interventions; broadcast both.
    #[default]
    Constant,
    /// Re-score every month with seasonal effects and scheduled activations.
    Temporal,
}

impl ProjectionMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "constant" => Some(Self::Constant),
            "temporal" => Some(Self::Temporal),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ProjectionMode::Constant => "constant",
            ProjectionMode::Temporal => "temporal",
        }
    }
}

/// Paired monthly risk trajectories without and with interventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProjection {
    pub base_risk: Vec<f64>,
    pub intervention_risk: Vec<f64>,
}

/// Both trajectories at a single month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRisk {
    pub month: Month,
    pub base_risk: f64,
    pub intervention_risk: f64,
}

impl RiskProjection {
    pub fn at_month(&self, month: Month) -> Option<MonthlyRisk> {
        let index = usize::from(month).checked_sub(1)?;
        Some(MonthlyRisk {
            month,
            base_risk: *self.base_risk.get(index)?,
            intervention_risk: *self.intervention_risk.get(index)?,
        })
    }

    /// Percentage drop from the base trajectory at `month`, never negative.
    pub fn risk_reduction_pct(&self, month: Month) -> f64 {
        match self.at_month(month) {
            Some(point) if point.base_risk > 0.0 => {
                let reduction = (point.base_risk - point.intervention_risk) / point.base_risk;
                (reduction * 100.0).max(0.0)
            }
            _ => 0.0,
        }
    }

    pub fn months(&self) -> impl Iterator<Item = MonthlyRisk> + '_ {
        (FIRST_MONTH..=LAST_MONTH).filter_map(move |month| self.at_month(month))
    }
}

/// Runs the scorer over a region's factors to build a [`RiskProjection`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionEngine {
    scorer: ScoreEngine,
    mode: ProjectionMode,
}

impl ProjectionEngine {
    pub fn new(weights: WeightProfile, mode: ProjectionMode) -> Self {
        Self {
            scorer: ScoreEngine::new(weights),
            mode,
        }
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn scorer(&self) -> &ScoreEngine {
        &self.scorer
    }

    pub fn with_mode(self, mode: ProjectionMode) -> Self {
        Self { mode, ..self }
    }

    pub fn project(
        &self,
        region: &Region,
        factors: &RiskFactorSet,
        seasonal_events: &[SeasonalEvent],
        interventions: &[ActiveIntervention],
    ) -> RiskProjection {
        let projection = match self.mode {
            ProjectionMode::Constant => self.constant(region, factors, interventions),
            ProjectionMode::Temporal => {
                self.temporal(region, factors, seasonal_events, interventions)
            }
        };

        debug!(
            region = %region.identifier,
            mode = self.mode.name(),
            interventions = interventions.len(),
            "risk projection computed"
        );
        projection
    }

    fn constant(
        &self,
        region: &Region,
        factors: &RiskFactorSet,
        interventions: &[ActiveIntervention],
    ) -> RiskProjection {
        let base = Some(region.base_risk_score);
        let current = self.scorer.score(factors, base);
        let mitigated = apply_interventions(factors, interventions, None);
        let with_interventions = self.scorer.score(&mitigated, base);

        RiskProjection {
            base_risk: vec![current; PROJECTION_HORIZON],
            intervention_risk: vec![with_interventions; PROJECTION_HORIZON],
        }
    }

    fn temporal(
        &self,
        region: &Region,
        factors: &RiskFactorSet,
        seasonal_events: &[SeasonalEvent],
        interventions: &[ActiveIntervention],
    ) -> RiskProjection {
        let base = Some(region.base_risk_score);
        let mut base_risk = Vec::with_capacity(PROJECTION_HORIZON);
        let mut intervention_risk = Vec::with_capacity(PROJECTION_HORIZON);

        for month in FIRST_MONTH..=LAST_MONTH {
            let seasonal = apply_seasonal_events(factors, seasonal_events, month);
            base_risk.push(self.scorer.score(&seasonal, base));

            let mitigated = apply_interventions(&seasonal, interventions, Some(month));
            intervention_risk.push(self.scorer.score(&mitigated, base));
        }

        RiskProjection {
            base_risk,
            intervention_risk,
        }
    }
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new(WeightProfile::standard(), ProjectionMode::Constant)
    }
}

/// Constant-mode projection with the standard weights.
pub fn compute_projection(
    region: &Region,
    factors: &RiskFactorSet,
    seasonal_events: &[SeasonalEvent],
    interventions: &[ActiveIntervention],
) -> RiskProjection {
    ProjectionEngine::default().project(region, factors, seasonal_events, interventions)
}
