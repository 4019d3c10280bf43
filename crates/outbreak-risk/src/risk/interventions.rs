use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{CatalogError, RiskFactor, RiskFactorSet};

/// Month of the projection horizon, 1 through 12.
pub type Month = u8;

pub const FIRST_MONTH: Month = 1;
pub const LAST_MONTH: Month = 12;

fn first_month() -> Month {
    FIRST_MONTH
}

pub fn is_horizon_month(month: Month) -> bool {
    (FIRST_MONTH..=LAST_MONTH).contains(&month)
}

fn deserialize_month<'de, D>(deserializer: D) -> Result<Month, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let month = Month::deserialize(deserializer)?;
    if is_horizon_month(month) {
        Ok(month)
    } else {
        Err(serde::de::Error::custom(format!(
            "appliedAt must be between {FIRST_MONTH} and {LAST_MONTH}, got {month}"
        )))
    }
}

/// Additive effect on a single factor. The target is kept as the raw key so
/// imported definitions naming an unknown factor still load and are skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorImpact {
    pub parameter: String,
    pub effect: f64,
}

impl FactorImpact {
    pub fn new(factor: RiskFactor, effect: f64) -> Self {
        Self {
            parameter: factor.key().to_string(),
            effect,
        }
    }

    pub fn factor(&self) -> Option<RiskFactor> {
        RiskFactor::from_key(&self.parameter)
    }
}

/// Named mitigation action.
///
/// `impact.effect` is a signed delta added directly to risk-positive factors,
/// so risk-reducing interventions carry a negative effect. For healthcare
/// infrastructure the absolute value is added: an intervention can only
/// improve care.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    pub id: String,
    pub name: String,
    pub description: String,
    pub impact: FactorImpact,
}

impl Intervention {
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        factor: RiskFactor,
        effect: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            impact: FactorImpact::new(factor, effect),
        }
    }

    /// Schedule the intervention from `applied_at` onward.
    pub fn activate(&self, applied_at: Month) -> ActiveIntervention {
        ActiveIntervention {
            intervention: self.clone(),
            applied_at: applied_at.clamp(FIRST_MONTH, LAST_MONTH),
        }
    }

    /// Active for the whole horizon.
    pub fn always_active(&self) -> ActiveIntervention {
        self.activate(FIRST_MONTH)
    }
}

/// Where a scheduled intervention sits relative to simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionState {
    Pending,
    Active,
}

/// Intervention together with the month it takes effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveIntervention {
    #[serde(flatten)]
    pub intervention: Intervention,
    #[serde(default = "first_month", deserialize_with = "deserialize_month")]
    pub applied_at: Month,
}

impl ActiveIntervention {
    /// Once active an intervention never lapses.
    pub fn state_at(&self, month: Month) -> InterventionState {
        if self.applied_at <= month {
            InterventionState::Active
        } else {
            InterventionState::Pending
        }
    }

    pub fn is_active_at(&self, month: Month) -> bool {
        self.state_at(month) == InterventionState::Active
    }
}

/// Time-bound effect recurring in specific months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalEvent {
    pub id: String,
    pub name: String,
    pub months: Vec<Month>,
    pub affects: FactorImpact,
}

impl SeasonalEvent {
    pub fn new(id: &str, name: &str, months: &[Month], factor: RiskFactor, effect: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            months: months.to_vec(),
            affects: FactorImpact::new(factor, effect),
        }
    }

    pub fn is_active_in(&self, month: Month) -> bool {
        self.months.contains(&month)
    }
}

/// Apply intervention effects in order, returning a new factor set.
///
/// With `current_time` set, interventions scheduled after it are skipped.
/// Interventions naming an unknown factor are ignored.
pub fn apply_interventions(
    factors: &RiskFactorSet,
    interventions: &[ActiveIntervention],
    current_time: Option<Month>,
) -> RiskFactorSet {
    let mut modified = *factors;

    for scheduled in interventions {
        if let Some(month) = current_time {
            if !scheduled.is_active_at(month) {
                continue;
            }
        }

        let impact = &scheduled.intervention.impact;
        let Some(factor) = impact.factor() else {
            warn!(
                intervention = %scheduled.intervention.id,
                parameter = %impact.parameter,
                "intervention targets unknown risk factor; skipping"
            );
            continue;
        };

        let delta = if factor.is_inverted() {
            impact.effect.abs()
        } else {
            impact.effect
        };
        modified.adjust(factor, delta);
    }

    modified
}

/// Apply the seasonal events active in `month`. Effects are added as signed
/// deltas to every factor, healthcare included.
pub fn apply_seasonal_events(
    factors: &RiskFactorSet,
    events: &[SeasonalEvent],
    month: Month,
) -> RiskFactorSet {
    let mut modified = *factors;

    for event in events.iter().filter(|event| event.is_active_in(month)) {
        match event.affects.factor() {
            Some(factor) => modified.adjust(factor, event.affects.effect),
            None => warn!(
                event = %event.id,
                parameter = %event.affects.parameter,
                "seasonal event targets unknown risk factor; skipping"
            ),
        }
    }

    modified
}

/// Reference interventions and seasonal events offered to planners.
#[derive(Debug, Clone, PartialEq)]
pub struct InterventionCatalog {
    interventions: Vec<Intervention>,
    seasonal_events: Vec<SeasonalEvent>,
}

impl InterventionCatalog {
    pub fn new(interventions: Vec<Intervention>, seasonal_events: Vec<SeasonalEvent>) -> Self {
        Self {
            interventions,
            seasonal_events,
        }
    }

    pub fn standard() -> Self {
        let interventions = vec![
            Intervention::new(
                "fruit-netting",
                "Fruit Netting Implementation",
                "Covering fruit trees with nets to prevent bat access",
                RiskFactor::FruitConsumptionPractices,
                -0.15,
            ),
            Intervention::new(
                "pig-quarantine",
                "Pig Farm Biosecurity",
                "Enhanced biosecurity measures on pig farms",
                RiskFactor::PigFarmingIntensity,
                -0.2,
            ),
            Intervention::new(
                "health-camps",
                "Health Camp Setup",
                "Establishing temporary healthcare facilities",
                RiskFactor::HealthcareInfrastructure,
                0.2,
            ),
            Intervention::new(
                "bat-habitat",
                "Bat Habitat Management",
                "Creating alternative habitats away from human settlements",
                RiskFactor::BatDensity,
                -0.15,
            ),
            Intervention::new(
                "public-awareness",
                "Public Awareness Campaigns",
                "Education about avoiding high-risk behaviors",
                RiskFactor::HumanPopulationDensity,
                -0.1,
            ),
            Intervention::new(
                "forest-conservation",
                "Forest Conservation",
                "Preventing deforestation and habitat fragmentation",
                RiskFactor::EnvironmentalDegradation,
                -0.2,
            ),
        ];

        let seasonal_events = vec![
            SeasonalEvent::new(
                "fruit-season",
                "January: Fruit Season",
                &[1, 2],
                RiskFactor::FruitConsumptionPractices,
                0.2,
            ),
            SeasonalEvent::new(
                "monsoon",
                "June-August: Monsoon",
                &[6, 7, 8],
                RiskFactor::BatDensity,
                0.15,
            ),
            SeasonalEvent::new(
                "bat-migration",
                "October: Bat Migration",
                &[10],
                RiskFactor::BatDensity,
                0.25,
            ),
            SeasonalEvent::new(
                "harvest-festival",
                "November: Harvest Festival",
                &[11],
                RiskFactor::HumanPopulationDensity,
                0.1,
            ),
            SeasonalEvent::new(
                "deforestation-season",
                "March-April: Deforestation Activity",
                &[3, 4],
                RiskFactor::EnvironmentalDegradation,
                0.15,
            ),
        ];

        Self::new(interventions, seasonal_events)
    }

    pub fn interventions(&self) -> &[Intervention] {
        &self.interventions
    }

    pub fn seasonal_events(&self) -> &[SeasonalEvent] {
        &self.seasonal_events
    }

    pub fn intervention(&self, id: &str) -> Result<&Intervention, CatalogError> {
        self.interventions
            .iter()
            .find(|intervention| intervention.id == id)
            .ok_or_else(|| CatalogError::InterventionNotFound(id.to_string()))
    }
}

impl Default for InterventionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
