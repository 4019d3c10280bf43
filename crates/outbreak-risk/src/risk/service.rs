use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::areas::standard_areas;
use super::classification::RiskLevel;
use super::domain::{
    CatalogError, FactorValues, RiskFactorSet, ValidationError, WeightProfile, WeightWarning,
};
use super::interventions::{
    is_horizon_month, ActiveIntervention, Intervention, InterventionCatalog, Month, SeasonalEvent,
    FIRST_MONTH, LAST_MONTH,
};
use super::parameters::{AreaSeed, ParameterStore, RegionParameterBook, RegionParameters, StoreError};
use super::projection::{ProjectionEngine, ProjectionMode, RiskProjection};
use super::regions::{Region, RegionCatalog};
use super::scoring::{ScoreEngine, TracingObserver};

/// Body of a score request. Ranges are checked before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub parameters: FactorValues,
    #[serde(default)]
    pub base_risk_score: Option<f64>,
    #[serde(default)]
    pub weights: Option<WeightProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub risk_score: f64,
    pub level: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_warning: Option<String>,
}

/// Intervention picked from the catalog, optionally scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionSelection {
    pub id: String,
    #[serde(default)]
    pub applied_at: Option<Month>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRequest {
    pub region_identifier: String,
    /// Falls back to the saved factor set for the region.
    #[serde(default)]
    pub parameters: Option<FactorValues>,
    #[serde(default)]
    pub interventions: Vec<InterventionSelection>,
    #[serde(default)]
    pub mode: Option<ProjectionMode>,
    /// Month the headline figures are read from.
    #[serde(default)]
    pub month: Option<Month>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    pub identifier: String,
    pub name: String,
    pub base_risk_score: f64,
}

/// Headline figures plus the full projection for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionReport {
    pub region: RegionSummary,
    pub mode: ProjectionMode,
    pub month: Month,
    pub current_score: f64,
    pub level: RiskLevel,
    pub post_intervention_risk: f64,
    pub risk_reduction: f64,
    pub interventions: Vec<ActiveIntervention>,
    pub projection: RiskProjection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionParametersUpdate {
    pub state: String,
    #[serde(default)]
    pub district: String,
    pub parameters: FactorValues,
}

/// Error raised by the risk service.
#[derive(Debug, thiserror::Error)]
pub enum RiskServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Service composing the region catalog, intervention catalog, parameter
/// book and engines.
pub struct RiskService<C, S> {
    catalog: Arc<C>,
    interventions: InterventionCatalog,
    book: RegionParameterBook<S>,
    engine: ProjectionEngine,
}

impl<C, S> RiskService<C, S>
where
    C: RegionCatalog + 'static,
    S: ParameterStore + 'static,
{
    /// Opens the parameter book, seeding every listed state and district plus
    /// a state-level entry for each catalog region not already covered.
    pub fn new(
        catalog: Arc<C>,
        store: Arc<S>,
        weights: WeightProfile,
        mode: ProjectionMode,
    ) -> Result<Self, RiskServiceError> {
        if let Some(warning) = weights.check() {
            warn!(%warning, "configured weight profile does not sum to 1.0");
        }

        let mut seeds = standard_areas();
        for region in catalog.all() {
            if !seeds.iter().any(|seed| seed.state == region.name) {
                seeds.push(AreaSeed::state(&region.name));
            }
        }
        let book = RegionParameterBook::open(store, &seeds)?;

        Ok(Self {
            catalog,
            interventions: InterventionCatalog::standard(),
            book,
            engine: ProjectionEngine::new(weights, mode),
        })
    }

    pub fn with_interventions(mut self, interventions: InterventionCatalog) -> Self {
        self.interventions = interventions;
        self
    }

    pub fn weights(&self) -> &WeightProfile {
        self.engine.scorer().weights()
    }

    pub fn calculate(&self, request: ScoreRequest) -> Result<ScoreResponse, RiskServiceError> {
        let mut error = ValidationError::new();
        let factors = match request.parameters.validate() {
            Ok(factors) => Some(factors),
            Err(issues) => {
                error.merge(issues);
                None
            }
        };
        if let Some(base) = request.base_risk_score {
            if !(0.0..=1.0).contains(&base) {
                error.push("baseRiskScore", format!("must be between 0 and 1, got {base}"));
            }
        }
        if let Some(weights) = &request.weights {
            if let Err(issues) = weights.validate() {
                error.merge(issues);
            }
        }
        error.into_result()?;
        let factors = factors.unwrap_or_default();

        let weights = request.weights.unwrap_or(*self.weights());
        let warning = weights.check();
        if let Some(warning) = &warning {
            warn!(%warning, "scoring with a weight profile that does not sum to 1.0");
        }

        let breakdown = ScoreEngine::new(weights).breakdown_observed(
            &factors,
            request.base_risk_score,
            &TracingObserver,
        );
        debug!(score = breakdown.risk_score, "risk score calculated");

        Ok(ScoreResponse {
            risk_score: breakdown.risk_score,
            level: RiskLevel::from_score(breakdown.risk_score),
            weight_warning: warning.as_ref().map(WeightWarning::to_string),
        })
    }

    pub fn regions(&self) -> Vec<Region> {
        self.catalog.all()
    }

    pub fn region(&self, identifier: &str) -> Result<Region, RiskServiceError> {
        Ok(self.catalog.get_by_identifier(identifier)?)
    }

    pub fn interventions(&self) -> &[Intervention] {
        self.interventions.interventions()
    }

    pub fn seasonal_events(&self) -> &[SeasonalEvent] {
        self.interventions.seasonal_events()
    }

    pub fn project(&self, request: ProjectionRequest) -> Result<ProjectionReport, RiskServiceError> {
        let month = request.month.unwrap_or(FIRST_MONTH);
        if !is_horizon_month(month) {
            return Err(ValidationError::single(
                "month",
                format!("must be between {FIRST_MONTH} and {LAST_MONTH}, got {month}"),
            )
            .into());
        }

        let region = self.catalog.get_by_identifier(&request.region_identifier)?;
        let factors = match request.parameters {
            Some(values) => values.validate()?,
            None => self.book.parameters_for(&region.name, "")?,
        };

        let mut schedule_error = ValidationError::new();
        for (index, selection) in request.interventions.iter().enumerate() {
            if let Some(applied_at) = selection.applied_at {
                if !is_horizon_month(applied_at) {
                    schedule_error.push(
                        format!("interventions[{index}].appliedAt"),
                        format!(
                            "must be between {FIRST_MONTH} and {LAST_MONTH}, got {applied_at}"
                        ),
                    );
                }
            }
        }
        schedule_error.into_result()?;

        let mut active = Vec::with_capacity(request.interventions.len());
        for selection in &request.interventions {
            let intervention = self.interventions.intervention(&selection.id)?;
            active.push(intervention.activate(selection.applied_at.unwrap_or(FIRST_MONTH)));
        }

        let engine = match request.mode {
            Some(mode) => self.engine.with_mode(mode),
            None => self.engine,
        };
        let projection = engine.project(&region, &factors, self.seasonal_events(), &active);
        Ok(build_report(&region, engine.mode(), month, active, projection))
    }

    pub fn region_parameters(
        &self,
        state: &str,
        district: &str,
    ) -> Result<RiskFactorSet, RiskServiceError> {
        Ok(self.book.parameters_for(state, district)?)
    }

    pub fn update_region_parameters(
        &self,
        update: RegionParametersUpdate,
    ) -> Result<RegionParameters, RiskServiceError> {
        if update.state.trim().is_empty() {
            return Err(ValidationError::single("state", "must not be empty").into());
        }
        let parameters = update.parameters.validate()?;
        Ok(self
            .book
            .update(&update.state, &update.district, parameters)?)
    }

    pub fn export_region_parameters(&self) -> Result<String, RiskServiceError> {
        Ok(self.book.export_json()?)
    }

    pub fn import_region_parameters(&self, raw: &str) -> Result<usize, RiskServiceError> {
        Ok(self.book.import_json(raw)?)
    }
}

fn build_report(
    region: &Region,
    mode: ProjectionMode,
    month: Month,
    interventions: Vec<ActiveIntervention>,
    projection: RiskProjection,
) -> ProjectionReport {
    let (current_score, post_intervention_risk) = projection
        .at_month(month)
        .map(|point| (point.base_risk, point.intervention_risk))
        .unwrap_or_default();

    ProjectionReport {
        region: RegionSummary {
            identifier: region.identifier.clone(),
            name: region.name.clone(),
            base_risk_score: region.base_risk_score,
        },
        mode,
        month,
        current_score,
        level: RiskLevel::from_score(current_score),
        post_intervention_risk,
        risk_reduction: projection.risk_reduction_pct(month),
        interventions,
        projection,
    }
}
