//! Per-area factor sets persisted through a key-value store.
//!
//! Planners tune factors for a state (district left empty) or for a single
//! district. Lookups fall back from district to state to neutral defaults.
//! The whole book is serialized as one JSON document under
//! [`REGION_DATA_KEY`], so any store offering `get`/`set` on strings works.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{FactorValues, RiskFactor, RiskFactorSet, ValidationError};

pub const REGION_DATA_KEY: &str = "normsRegionData";

/// String key-value persistence.
pub trait ParameterStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("parameter store unavailable: {0}")]
    Unavailable(String),
    #[error("unable to encode region parameters: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Process-local store, used by the service and in tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryParameterStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryParameterStore {
    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store mutex poisoned".to_string()))
    }
}

impl ParameterStore for InMemoryParameterStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries()?.insert(key.to_string(), value);
        Ok(())
    }
}

/// Factor set saved for a state or district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionParameters {
    pub state: String,
    #[serde(default)]
    pub district: String,
    pub parameters: RiskFactorSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RegionParameters {
    fn matches(&self, state: &str, district: &str) -> bool {
        self.state == state && self.district == district
    }
}

/// A state and the districts to seed alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaSeed {
    pub state: String,
    pub districts: Vec<String>,
}

impl AreaSeed {
    pub fn state(state: &str) -> Self {
        Self {
            state: state.to_string(),
            districts: Vec::new(),
        }
    }

    pub fn with_districts(state: &str, districts: &[&str]) -> Self {
        Self {
            state: state.to_string(),
            districts: districts.iter().map(|district| district.to_string()).collect(),
        }
    }
}

#[derive(Deserialize)]
struct ImportedEntry {
    state: String,
    #[serde(default)]
    district: String,
    parameters: FactorValues,
}

pub struct RegionParameterBook<S> {
    store: Arc<S>,
    entries: Mutex<Vec<RegionParameters>>,
}

impl<S> RegionParameterBook<S>
where
    S: ParameterStore,
{
    /// Load the book from `store`, seeding it from `areas` when the stored
    /// document is missing or unreadable.
    pub fn open(store: Arc<S>, areas: &[AreaSeed]) -> Result<Self, StoreError> {
        let entries = match store.get(REGION_DATA_KEY)? {
            Some(raw) => match serde_json::from_str::<Vec<RegionParameters>>(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(error = %err, "stored region parameters unreadable; regenerating");
                    let seeded = seed_entries(areas);
                    store.set(REGION_DATA_KEY, serde_json::to_string(&seeded)?)?;
                    seeded
                }
            },
            None => {
                let seeded = seed_entries(areas);
                store.set(REGION_DATA_KEY, serde_json::to_string(&seeded)?)?;
                seeded
            }
        };

        debug!(entries = entries.len(), "region parameter book opened");
        Ok(Self {
            store,
            entries: Mutex::new(entries),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<RegionParameters>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("region parameter book poisoned".to_string()))
    }

    fn persist(&self, entries: &[RegionParameters]) -> Result<(), StoreError> {
        self.store
            .set(REGION_DATA_KEY, serde_json::to_string(entries)?)
    }

    pub fn entries(&self) -> Result<Vec<RegionParameters>, StoreError> {
        Ok(self.lock()?.clone())
    }

    /// District entry, else the state entry, else neutral defaults.
    pub fn parameters_for(&self, state: &str, district: &str) -> Result<RiskFactorSet, StoreError> {
        let entries = self.lock()?;
        let exact = entries.iter().find(|entry| entry.matches(state, district));
        let fallback = || {
            if district.is_empty() {
                None
            } else {
                entries.iter().find(|entry| entry.matches(state, ""))
            }
        };

        Ok(exact
            .or_else(fallback)
            .map(|entry| entry.parameters)
            .unwrap_or_default())
    }

    pub fn update(
        &self,
        state: &str,
        district: &str,
        parameters: RiskFactorSet,
    ) -> Result<RegionParameters, StoreError> {
        let mut entries = self.lock()?;
        let updated = RegionParameters {
            state: state.to_string(),
            district: district.to_string(),
            parameters,
            updated_at: Some(Utc::now()),
        };

        match entries
            .iter_mut()
            .find(|entry| entry.matches(state, district))
        {
            Some(entry) => *entry = updated.clone(),
            None => entries.push(updated.clone()),
        }

        self.persist(&entries)?;
        Ok(updated)
    }

    pub fn export_json(&self) -> Result<String, StoreError> {
        let entries = self.lock()?;
        Ok(serde_json::to_string_pretty(&*entries)?)
    }

    /// Replace the whole book. Out-of-range values reject the import and
    /// leave the book untouched.
    pub fn import_json(&self, raw: &str) -> Result<usize, StoreError> {
        let imported: Vec<ImportedEntry> = serde_json::from_str(raw)
            .map_err(|err| ValidationError::single(REGION_DATA_KEY, err.to_string()))?;

        let mut error = ValidationError::new();
        let mut replacement = Vec::with_capacity(imported.len());
        for (index, entry) in imported.into_iter().enumerate() {
            match entry.parameters.validate() {
                Ok(parameters) => replacement.push(RegionParameters {
                    state: entry.state,
                    district: entry.district,
                    parameters,
                    updated_at: None,
                }),
                Err(issues) => {
                    for (field, message) in issues.issues() {
                        error.push(format!("[{index}].{field}"), message.clone());
                    }
                }
            }
        }
        error.into_result()?;

        let mut entries = self.lock()?;
        self.persist(&replacement)?;
        *entries = replacement;
        Ok(entries.len())
    }
}

fn seed_entries(areas: &[AreaSeed]) -> Vec<RegionParameters> {
    let mut entries = Vec::new();
    for area in areas {
        entries.push(RegionParameters {
            state: area.state.clone(),
            district: String::new(),
            parameters: seed_factor_set(&area.state, ""),
            updated_at: None,
        });
        for district in &area.districts {
            entries.push(RegionParameters {
                state: area.state.clone(),
                district: district.clone(),
                parameters: seed_factor_set(&area.state, district),
                updated_at: None,
            });
        }
    }
    entries
}

fn seed_range(factor: RiskFactor) -> (f64, f64) {
    match factor {
        RiskFactor::BatDensity => (0.2, 0.8),
        RiskFactor::PigFarmingIntensity => (0.2, 0.8),
        RiskFactor::FruitConsumptionPractices => (0.3, 0.9),
        RiskFactor::HumanPopulationDensity => (0.3, 0.9),
        RiskFactor::HealthcareInfrastructure => (0.2, 0.8),
        RiskFactor::EnvironmentalDegradation => (0.2, 0.7),
    }
}

/// Stable pseudo-random starting value for a factor, scaled into the
/// factor's plausible range.
pub fn seed_factor(state: &str, district: &str, factor: RiskFactor) -> f64 {
    let mut hash: i32 = 0;
    let units = state
        .encode_utf16()
        .chain(district.encode_utf16())
        .chain(factor.key().encode_utf16());
    for unit in units {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }

    let normalized = i64::from(hash).abs() as f64 / f64::from(i32::MAX);
    let (min, max) = seed_range(factor);
    min + normalized * (max - min)
}

pub fn seed_factor_set(state: &str, district: &str) -> RiskFactorSet {
    let mut set = RiskFactorSet::neutral();
    for factor in RiskFactor::ALL {
        set.set(factor, seed_factor(state, district, factor));
    }
    set
}
