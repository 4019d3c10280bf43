use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::CatalogError;
use super::parameters::{ParameterStore, StoreError};
use super::regions::RegionCatalog;
use super::service::{
    ProjectionRequest, RegionParametersUpdate, RiskService, RiskServiceError, ScoreRequest,
};

/// Router builder exposing the scoring, projection and reference-data endpoints.
pub fn risk_router<C, S>(service: Arc<RiskService<C, S>>) -> Router
where
    C: RegionCatalog + 'static,
    S: ParameterStore + 'static,
{
    Router::new()
        .route("/api/regions", get(regions_handler::<C, S>))
        .route("/api/regions/:identifier", get(region_handler::<C, S>))
        .route("/api/calculate-risk", post(calculate_handler::<C, S>))
        .route("/api/interventions", get(interventions_handler::<C, S>))
        .route("/api/seasonal-events", get(seasonal_events_handler::<C, S>))
        .route("/api/projection", post(projection_handler::<C, S>))
        .route(
            "/api/region-parameters",
            get(region_parameters_handler::<C, S>).put(update_region_parameters_handler::<C, S>),
        )
        .route(
            "/api/region-parameters/export",
            get(export_region_parameters_handler::<C, S>),
        )
        .route(
            "/api/region-parameters/import",
            post(import_region_parameters_handler::<C, S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegionParametersQuery {
    state: String,
    #[serde(default)]
    district: String,
}

pub(crate) async fn regions_handler<C, S>(
    State(service): State<Arc<RiskService<C, S>>>,
) -> Response
where
    C: RegionCatalog + 'static,
    S: ParameterStore + 'static,
{
    (StatusCode::OK, Json(service.regions())).into_response()
}

pub(crate) async fn region_handler<C, S>(
    State(service): State<Arc<RiskService<C, S>>>,
    Path(identifier): Path<String>,
) -> Response
where
    C: RegionCatalog + 'static,
    S: ParameterStore + 'static,
{
    match service.region(&identifier) {
        Ok(region) => (StatusCode::OK, Json(region)).into_response(),
        Err(err) => error_response(err, "Failed to fetch region"),
    }
}

pub(crate) async fn calculate_handler<C, S>(
    State(service): State<Arc<RiskService<C, S>>>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Response
where
    C: RegionCatalog + 'static,
    S: ParameterStore + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection, "Invalid risk parameters"),
    };

    match service.calculate(request) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => error_response(err, "Invalid risk parameters"),
    }
}

pub(crate) async fn interventions_handler<C, S>(
    State(service): State<Arc<RiskService<C, S>>>,
) -> Response
where
    C: RegionCatalog + 'static,
    S: ParameterStore + 'static,
{
    (StatusCode::OK, Json(service.interventions())).into_response()
}

pub(crate) async fn seasonal_events_handler<C, S>(
    State(service): State<Arc<RiskService<C, S>>>,
) -> Response
where
    C: RegionCatalog + 'static,
    S: ParameterStore + 'static,
{
    (StatusCode::OK, Json(service.seasonal_events())).into_response()
}

pub(crate) async fn projection_handler<C, S>(
    State(service): State<Arc<RiskService<C, S>>>,
    payload: Result<Json<ProjectionRequest>, JsonRejection>,
) -> Response
where
    C: RegionCatalog + 'static,
    S: ParameterStore + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection, "Invalid projection request"),
    };

    match service.project(request) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err, "Invalid projection request"),
    }
}

pub(crate) async fn region_parameters_handler<C, S>(
    State(service): State<Arc<RiskService<C, S>>>,
    query: Result<Query<RegionParametersQuery>, QueryRejection>,
) -> Response
where
    C: RegionCatalog + 'static,
    S: ParameterStore + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            let payload = json!({
                "message": "Invalid region parameter query",
                "errors": { "query": rejection.body_text() },
            });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match service.region_parameters(&query.state, &query.district) {
        Ok(parameters) => {
            let payload = json!({
                "state": query.state,
                "district": query.district,
                "parameters": parameters,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err, "Failed to fetch region parameters"),
    }
}

pub(crate) async fn update_region_parameters_handler<C, S>(
    State(service): State<Arc<RiskService<C, S>>>,
    payload: Result<Json<RegionParametersUpdate>, JsonRejection>,
) -> Response
where
    C: RegionCatalog + 'static,
    S: ParameterStore + 'static,
{
    let Json(update) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection, "Invalid parameter set data"),
    };

    match service.update_region_parameters(update) {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(err) => error_response(err, "Invalid parameter set data"),
    }
}

pub(crate) async fn export_region_parameters_handler<C, S>(
    State(service): State<Arc<RiskService<C, S>>>,
) -> Response
where
    C: RegionCatalog + 'static,
    S: ParameterStore + 'static,
{
    match service.export_region_parameters() {
        Ok(body) => (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(err) => error_response(err, "Failed to export region parameters"),
    }
}

pub(crate) async fn import_region_parameters_handler<C, S>(
    State(service): State<Arc<RiskService<C, S>>>,
    body: String,
) -> Response
where
    C: RegionCatalog + 'static,
    S: ParameterStore + 'static,
{
    match service.import_region_parameters(&body) {
        Ok(imported) => (StatusCode::OK, Json(json!({ "imported": imported }))).into_response(),
        Err(err) => error_response(err, "Invalid region parameter data"),
    }
}

fn rejection_response(rejection: JsonRejection, message: &str) -> Response {
    let payload = json!({
        "message": message,
        "errors": { "body": rejection.body_text() },
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

/// Maps service errors onto status codes. `message` labels client errors.
pub(crate) fn error_response(err: RiskServiceError, message: &str) -> Response {
    match err {
        RiskServiceError::Validation(error)
        | RiskServiceError::Store(StoreError::Invalid(error)) => {
            let payload = json!({
                "message": message,
                "errors": error.issues(),
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        RiskServiceError::Catalog(CatalogError::RegionNotFound(identifier)) => {
            let payload = json!({
                "message": "Region not found",
                "identifier": identifier,
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        RiskServiceError::Catalog(CatalogError::InterventionNotFound(identifier)) => {
            let payload = json!({
                "message": "Intervention not found",
                "identifier": identifier,
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        RiskServiceError::Store(other) => {
            tracing::error!(error = %other, "region parameter store failure");
            let payload = json!({ "message": "Internal server error" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
