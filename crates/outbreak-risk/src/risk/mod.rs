//! Outbreak-risk scoring, intervention effects and monthly projections.
//!
//! The engines are pure functions over copied inputs: [`compute_score`]
//! weights the six factors, [`apply_interventions`] shifts them, and
//! [`ProjectionEngine`] packages both into before/after series. Reference
//! data (regions, interventions, seasonal events, saved factor sets) is
//! supplied by the catalogs and the parameter book.

pub mod areas;
pub mod classification;
pub mod domain;
pub mod interventions;
pub mod legacy;
pub mod parameters;
pub mod projection;
pub mod regions;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use areas::{districts_of, standard_areas, STATE_DISTRICTS};
pub use classification::RiskLevel;
pub use domain::{
    clamp_unit, CatalogError, FactorValues, RiskFactor, RiskFactorSet, ValidationError,
    WeightProfile, WeightWarning,
};
pub use interventions::{
    apply_interventions, apply_seasonal_events, is_horizon_month, ActiveIntervention, FactorImpact,
    Intervention, InterventionCatalog, InterventionState, Month, SeasonalEvent,
};
pub use legacy::{LegacyFactorSet, LegacyWeights};
pub use parameters::{
    AreaSeed, InMemoryParameterStore, ParameterStore, RegionParameterBook, RegionParameters,
    StoreError,
};
pub use projection::{
    compute_projection, MonthlyRisk, ProjectionEngine, ProjectionMode, RiskProjection,
    PROJECTION_HORIZON,
};
pub use regions::{CatalogLoadError, Region, RegionCatalog, StaticRegionCatalog};
pub use router::risk_router;
pub use scoring::{
    compute_score, FactorContribution, ScoreBreakdown, ScoreEngine, ScoreObserver,
    TracingObserver,
};
pub use service::{
    InterventionSelection, ProjectionReport, ProjectionRequest, RegionParametersUpdate,
    RiskService, RiskServiceError, ScoreRequest, ScoreResponse,
};
