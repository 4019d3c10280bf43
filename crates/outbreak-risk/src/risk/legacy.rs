//! Translation from the earlier five-factor parameter shape.
//!
//! The five-factor model had no population-density driver and folded
//! land-use pressure into an urban/wild overlap score. Translated sets keep
//! population density neutral and weight it at zero, so they score exactly
//! as they did under the old formula.

use serde::{Deserialize, Serialize};

use super::domain::{RiskFactor, RiskFactorSet, WeightProfile};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyFactorSet {
    pub bat_density: f64,
    pub pig_density: f64,
    pub fruit_exposure: f64,
    /// Despite the name this is healthcare quality; it is inverted when scored.
    pub inverse_healthcare: f64,
    pub urban_wild_overlap: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyWeights {
    pub bat_density: f64,
    pub pig_density: f64,
    pub fruit_exposure: f64,
    pub inverse_healthcare: f64,
    pub urban_wild_overlap: f64,
}

impl Default for LegacyWeights {
    fn default() -> Self {
        Self {
            bat_density: 0.3,
            pig_density: 0.2,
            fruit_exposure: 0.2,
            inverse_healthcare: 0.2,
            urban_wild_overlap: 0.1,
        }
    }
}

impl From<LegacyFactorSet> for RiskFactorSet {
    fn from(legacy: LegacyFactorSet) -> Self {
        RiskFactorSet::neutral()
            .with(RiskFactor::BatDensity, legacy.bat_density)
            .with(RiskFactor::PigFarmingIntensity, legacy.pig_density)
            .with(RiskFactor::FruitConsumptionPractices, legacy.fruit_exposure)
            .with(RiskFactor::HealthcareInfrastructure, legacy.inverse_healthcare)
            .with(RiskFactor::EnvironmentalDegradation, legacy.urban_wild_overlap)
    }
}

impl From<LegacyWeights> for WeightProfile {
    fn from(legacy: LegacyWeights) -> Self {
        WeightProfile {
            bat_density: legacy.bat_density,
            pig_farming_intensity: legacy.pig_density,
            fruit_consumption_practices: legacy.fruit_exposure,
            human_population_density: 0.0,
            healthcare_infrastructure: legacy.inverse_healthcare,
            environmental_degradation: legacy.urban_wild_overlap,
        }
    }
}

impl From<RiskFactorSet> for LegacyFactorSet {
    fn from(set: RiskFactorSet) -> Self {
        LegacyFactorSet {
            bat_density: set.get(RiskFactor::BatDensity),
            pig_density: set.get(RiskFactor::PigFarmingIntensity),
            fruit_exposure: set.get(RiskFactor::FruitConsumptionPractices),
            inverse_healthcare: set.get(RiskFactor::HealthcareInfrastructure),
            urban_wild_overlap: set.get(RiskFactor::EnvironmentalDegradation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::scoring::compute_score;

    fn legacy_formula(set: &LegacyFactorSet, weights: &LegacyWeights, base: f64) -> f64 {
        let weighted = weights.bat_density * set.bat_density
            + weights.pig_density * set.pig_density
            + weights.fruit_exposure * set.fruit_exposure
            + weights.inverse_healthcare * (1.0 - set.inverse_healthcare)
            + weights.urban_wild_overlap * set.urban_wild_overlap;
        let total = weights.bat_density
            + weights.pig_density
            + weights.fruit_exposure
            + weights.inverse_healthcare
            + weights.urban_wild_overlap;
        (0.7 * weighted / total + 0.3 * base).clamp(0.0, 1.0)
    }

    #[test]
    fn translated_sets_score_like_the_five_factor_formula() {
        let legacy = LegacyFactorSet {
            bat_density: 0.8,
            pig_density: 0.35,
            fruit_exposure: 0.6,
            inverse_healthcare: 0.25,
            urban_wild_overlap: 0.4,
        };
        let weights = LegacyWeights::default();

        let score = compute_score(
            &RiskFactorSet::from(legacy),
            &WeightProfile::from(weights),
            Some(0.72),
        );
        assert!((score - legacy_formula(&legacy, &weights, 0.72)).abs() < 1e-12);
    }

    #[test]
    fn population_density_stays_neutral() {
        let legacy = LegacyFactorSet {
            bat_density: 0.1,
            pig_density: 0.1,
            fruit_exposure: 0.1,
            inverse_healthcare: 0.9,
            urban_wild_overlap: 0.1,
        };
        let set = RiskFactorSet::from(legacy);
        assert_eq!(set.get(RiskFactor::HumanPopulationDensity), RiskFactorSet::NEUTRAL);
        assert_eq!(LegacyFactorSet::from(set), legacy);
    }
}
