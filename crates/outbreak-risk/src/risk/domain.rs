use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Allowed deviation of a weight profile's sum from 1.0 before it is flagged.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// One of the six epidemiological drivers feeding the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskFactor {
    BatDensity,
    PigFarmingIntensity,
    FruitConsumptionPractices,
    HumanPopulationDensity,
    HealthcareInfrastructure,
    EnvironmentalDegradation,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 6] = [
        RiskFactor::BatDensity,
        RiskFactor::PigFarmingIntensity,
        RiskFactor::FruitConsumptionPractices,
        RiskFactor::HumanPopulationDensity,
        RiskFactor::HealthcareInfrastructure,
        RiskFactor::EnvironmentalDegradation,
    ];

    /// Wire key used in JSON payloads and intervention definitions.
    pub fn key(self) -> &'static str {
        match self {
            RiskFactor::BatDensity => "batDensity",
            RiskFactor::PigFarmingIntensity => "pigFarmingIntensity",
            RiskFactor::FruitConsumptionPractices => "fruitConsumptionPractices",
            RiskFactor::HumanPopulationDensity => "humanPopulationDensity",
            RiskFactor::HealthcareInfrastructure => "healthcareInfrastructure",
            RiskFactor::EnvironmentalDegradation => "environmentalDegradation",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskFactor::BatDensity => "Bat density",
            RiskFactor::PigFarmingIntensity => "Pig farming intensity",
            RiskFactor::FruitConsumptionPractices => "Fruit consumption practices",
            RiskFactor::HumanPopulationDensity => "Human population density",
            RiskFactor::HealthcareInfrastructure => "Healthcare infrastructure",
            RiskFactor::EnvironmentalDegradation => "Environmental degradation",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|factor| factor.key() == key)
    }

    /// Higher values mean better access to care, so the factor lowers risk.
    pub fn is_inverted(self) -> bool {
        matches!(self, RiskFactor::HealthcareInfrastructure)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Clamp into [0, 1]. NaN collapses to 0 so it can never leak into a score.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Unchecked factor readings as they arrive over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorValues {
    pub bat_density: f64,
    pub pig_farming_intensity: f64,
    pub fruit_consumption_practices: f64,
    pub human_population_density: f64,
    pub healthcare_infrastructure: f64,
    pub environmental_degradation: f64,
}

impl FactorValues {
    pub fn get(&self, factor: RiskFactor) -> f64 {
        match factor {
            RiskFactor::BatDensity => self.bat_density,
            RiskFactor::PigFarmingIntensity => self.pig_farming_intensity,
            RiskFactor::FruitConsumptionPractices => self.fruit_consumption_practices,
            RiskFactor::HumanPopulationDensity => self.human_population_density,
            RiskFactor::HealthcareInfrastructure => self.healthcare_infrastructure,
            RiskFactor::EnvironmentalDegradation => self.environmental_degradation,
        }
    }

    /// Strict boundary check: every reading must already lie in [0, 1].
    pub fn validate(&self) -> Result<RiskFactorSet, ValidationError> {
        let mut error = ValidationError::new();
        for factor in RiskFactor::ALL {
            let value = self.get(factor);
            if !(0.0..=1.0).contains(&value) {
                error.push(
                    format!("parameters.{}", factor.key()),
                    format!("must be between 0 and 1, got {value}"),
                );
            }
        }
        error.into_result()?;
        Ok(RiskFactorSet::from(*self))
    }
}

/// Six factor values, each held in [0, 1] at all times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "FactorValues", into = "FactorValues")]
pub struct RiskFactorSet {
    values: [f64; 6],
}

impl RiskFactorSet {
    pub const NEUTRAL: f64 = 0.5;

    pub fn neutral() -> Self {
        Self {
            values: [Self::NEUTRAL; 6],
        }
    }

    pub fn get(&self, factor: RiskFactor) -> f64 {
        self.values[factor.index()]
    }

    pub fn set(&mut self, factor: RiskFactor, value: f64) {
        self.values[factor.index()] = clamp_unit(value);
    }

    /// Shift a factor by `delta`, clamping the result.
    pub fn adjust(&mut self, factor: RiskFactor, delta: f64) {
        let current = self.get(factor);
        self.set(factor, current + delta);
    }

    pub fn with(mut self, factor: RiskFactor, value: f64) -> Self {
        self.set(factor, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (RiskFactor, f64)> + '_ {
        RiskFactor::ALL
            .into_iter()
            .map(move |factor| (factor, self.get(factor)))
    }

    pub fn to_values(&self) -> FactorValues {
        FactorValues::from(*self)
    }
}

impl Default for RiskFactorSet {
    fn default() -> Self {
        Self::neutral()
    }
}

impl From<FactorValues> for RiskFactorSet {
    fn from(values: FactorValues) -> Self {
        let mut set = Self::neutral();
        for factor in RiskFactor::ALL {
            set.set(factor, values.get(factor));
        }
        set
    }
}

impl From<RiskFactorSet> for FactorValues {
    fn from(set: RiskFactorSet) -> Self {
        FactorValues {
            bat_density: set.get(RiskFactor::BatDensity),
            pig_farming_intensity: set.get(RiskFactor::PigFarmingIntensity),
            fruit_consumption_practices: set.get(RiskFactor::FruitConsumptionPractices),
            human_population_density: set.get(RiskFactor::HumanPopulationDensity),
            healthcare_infrastructure: set.get(RiskFactor::HealthcareInfrastructure),
            environmental_degradation: set.get(RiskFactor::EnvironmentalDegradation),
        }
    }
}

/// Relative importance of each factor. The engine normalizes by the sum, so
/// profiles that miss 1.0 still score; [`WeightProfile::check`] flags them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightProfile {
    pub bat_density: f64,
    pub pig_farming_intensity: f64,
    pub fruit_consumption_practices: f64,
    pub human_population_density: f64,
    pub healthcare_infrastructure: f64,
    pub environmental_degradation: f64,
}

impl WeightProfile {
    pub fn standard() -> Self {
        Self {
            bat_density: 0.25,
            pig_farming_intensity: 0.20,
            fruit_consumption_practices: 0.15,
            human_population_density: 0.15,
            healthcare_infrastructure: 0.15,
            environmental_degradation: 0.10,
        }
    }

    /// Leans harder on the reservoir and spillover drivers.
    pub fn alternate() -> Self {
        Self {
            bat_density: 0.30,
            pig_farming_intensity: 0.25,
            fruit_consumption_practices: 0.15,
            human_population_density: 0.15,
            healthcare_infrastructure: 0.10,
            environmental_degradation: 0.05,
        }
    }

    pub fn named(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" | "default" => Some(Self::standard()),
            "alternate" => Some(Self::alternate()),
            _ => None,
        }
    }

    pub fn get(&self, factor: RiskFactor) -> f64 {
        match factor {
            RiskFactor::BatDensity => self.bat_density,
            RiskFactor::PigFarmingIntensity => self.pig_farming_intensity,
            RiskFactor::FruitConsumptionPractices => self.fruit_consumption_practices,
            RiskFactor::HumanPopulationDensity => self.human_population_density,
            RiskFactor::HealthcareInfrastructure => self.healthcare_infrastructure,
            RiskFactor::EnvironmentalDegradation => self.environmental_degradation,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (RiskFactor, f64)> + '_ {
        RiskFactor::ALL
            .into_iter()
            .map(move |factor| (factor, self.get(factor)))
    }

    pub fn total(&self) -> f64 {
        self.iter().map(|(_, weight)| weight).sum()
    }

    /// Advisory only: scoring proceeds regardless of the outcome.
    pub fn check(&self) -> Option<WeightWarning> {
        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            Some(WeightWarning { total })
        } else {
            None
        }
    }

    /// Boundary check for caller-supplied profiles.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut error = ValidationError::new();
        for (factor, weight) in self.iter() {
            if !weight.is_finite() || weight < 0.0 {
                error.push(
                    format!("weights.{}", factor.key()),
                    format!("must be a non-negative number, got {weight}"),
                );
            }
        }
        error.into_result()
    }
}

impl Default for WeightProfile {
    fn default() -> Self {
        Self::standard()
    }
}

/// Weight profile whose sum strays from 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightWarning {
    pub total: f64,
}

impl fmt::Display for WeightWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "weights sum to {:.2}; expected 1.00 ± {WEIGHT_SUM_TOLERANCE:.2}",
            self.total
        )
    }
}

/// Field-level diagnostics for rejected input.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("invalid input: {}", describe_issues(.issues))]
pub struct ValidationError {
    issues: BTreeMap<String, String>,
}

fn describe_issues(issues: &BTreeMap<String, String>) -> String {
    issues
        .iter()
        .map(|(field, message)| format!("{field} {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut error = Self::new();
        error.push(field, message);
        error
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.issues.insert(field.into(), message.into());
    }

    pub fn merge(&mut self, other: ValidationError) {
        self.issues.extend(other.issues);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &BTreeMap<String, String> {
        &self.issues
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Identifier lookups against reference data that came up empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("region '{0}' not found")]
    RegionNotFound(String),
    #[error("intervention '{0}' not found")]
    InterventionNotFound(String),
}
