use metrics_exporter_prometheus::PrometheusHandle;
use outbreak_risk::config::ScoringConfig;
use outbreak_risk::error::AppError;
use outbreak_risk::risk::{
    InMemoryParameterStore, InterventionSelection, Month, RiskService, StaticRegionCatalog,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) type ApiRiskService = RiskService<StaticRegionCatalog, InMemoryParameterStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn load_catalog(config: &ScoringConfig) -> Result<StaticRegionCatalog, AppError> {
    match &config.region_catalog {
        Some(path) => {
            let catalog = StaticRegionCatalog::from_path(path)?;
            info!(path = %path.display(), "loaded region catalog from file");
            Ok(catalog)
        }
        None => Ok(StaticRegionCatalog::standard()),
    }
}

/// Builds the service over a fresh in-memory parameter store.
pub(crate) fn build_risk_service(config: &ScoringConfig) -> Result<ApiRiskService, AppError> {
    let catalog = Arc::new(load_catalog(config)?);
    let store = Arc::new(InMemoryParameterStore::default());
    Ok(RiskService::new(
        catalog,
        store,
        config.weights,
        config.projection_mode,
    )?)
}

pub(crate) fn parse_unit(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as a number ({err})"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("'{raw}' must be between 0 and 1"))
    }
}

pub(crate) fn parse_month(raw: &str) -> Result<Month, String> {
    let month: Month = raw
        .trim()
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as a month ({err})"))?;
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(format!("month '{raw}' must be between 1 and 12"))
    }
}

/// Accepts `id` or `id@month`.
pub(crate) fn parse_selection(raw: &str) -> Result<InterventionSelection, String> {
    let (id, applied_at) = match raw.split_once('@') {
        Some((id, month)) => (id, Some(parse_month(month)?)),
        None => (raw, None),
    };
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("'{raw}' does not name an intervention"));
    }
    Ok(InterventionSelection {
        id: id.to_string(),
        applied_at,
    })
}
