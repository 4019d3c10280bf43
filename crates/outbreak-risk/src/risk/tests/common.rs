use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::risk::domain::{RiskFactor, RiskFactorSet, WeightProfile};
use crate::risk::interventions::{ActiveIntervention, InterventionCatalog};
use crate::risk::parameters::{InMemoryParameterStore, ParameterStore, StoreError};
use crate::risk::projection::ProjectionMode;
use crate::risk::regions::{Region, StaticRegionCatalog};
use crate::risk::service::RiskService;

pub(super) const TOLERANCE: f64 = 1e-9;

pub(super) fn scenario_factors() -> RiskFactorSet {
    RiskFactorSet::neutral()
        .with(RiskFactor::BatDensity, 0.6)
        .with(RiskFactor::PigFarmingIntensity, 0.4)
        .with(RiskFactor::FruitConsumptionPractices, 0.7)
        .with(RiskFactor::HumanPopulationDensity, 0.5)
        .with(RiskFactor::HealthcareInfrastructure, 0.5)
        .with(RiskFactor::EnvironmentalDegradation, 0.3)
}

pub(super) fn scenario_payload() -> Value {
    serde_json::json!({
        "batDensity": 0.6,
        "pigFarmingIntensity": 0.4,
        "fruitConsumptionPractices": 0.7,
        "humanPopulationDensity": 0.5,
        "healthcareInfrastructure": 0.5,
        "environmentalDegradation": 0.3,
    })
}

pub(super) fn all_zero() -> RiskFactorSet {
    let mut set = RiskFactorSet::neutral();
    for factor in RiskFactor::ALL {
        set.set(factor, 0.0);
    }
    set
}

pub(super) fn standard_weights() -> WeightProfile {
    WeightProfile::standard()
}

pub(super) fn scheduled(id: &str, applied_at: u8) -> ActiveIntervention {
    InterventionCatalog::standard()
        .intervention(id)
        .expect("standard intervention present")
        .activate(applied_at)
}

pub(super) fn pig_biosecurity() -> ActiveIntervention {
    scheduled("pig-quarantine", 1)
}

pub(super) fn test_region(base_risk_score: f64) -> Region {
    Region::new(
        "test-region",
        "Test Region",
        base_risk_score,
        [0.0, 0.0],
        vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]],
    )
}

pub(super) type TestService = RiskService<StaticRegionCatalog, InMemoryParameterStore>;

pub(super) fn build_service() -> (Arc<TestService>, Arc<InMemoryParameterStore>) {
    let store = Arc::new(InMemoryParameterStore::default());
    let service = RiskService::new(
        Arc::new(StaticRegionCatalog::standard()),
        store.clone(),
        WeightProfile::standard(),
        ProjectionMode::Constant,
    )
    .expect("service builds");
    (Arc::new(service), store)
}

/// Serves an empty book but refuses every write.
#[derive(Default)]
pub(super) struct ReadOnlyStore;

impl ParameterStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(Some("[]".to_string()))
    }

    fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store is read-only".to_string()))
    }
}

pub(super) async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}
