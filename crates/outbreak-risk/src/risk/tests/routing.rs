use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::risk::areas::STATE_DISTRICTS;
use crate::risk::domain::WeightProfile;
use crate::risk::parameters::{seed_factor_set, ParameterStore};
use crate::risk::projection::ProjectionMode;
use crate::risk::regions::StaticRegionCatalog;
use crate::risk::router::risk_router;
use crate::risk::service::RiskService;

fn app() -> Router {
    let (service, _) = build_service();
    risk_router(service)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

/// Listed states and districts plus the two catalog regions outside India.
fn seeded_entry_count() -> usize {
    STATE_DISTRICTS
        .iter()
        .map(|(_, districts)| districts.len() + 1)
        .sum::<usize>()
        + 2
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn calculate_risk_scores_valid_parameters() {
    let response = app()
        .oneshot(json_request(
            Method::POST,
            "/api/calculate-risk",
            json!({ "parameters": scenario_payload() }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let score = body["riskScore"].as_f64().expect("score present");
    assert!((score - 0.515).abs() < TOLERANCE);
    assert_eq!(body["level"], "medium");
    assert!(body.get("weightWarning").is_none());
}

#[tokio::test]
async fn calculate_risk_reports_unbalanced_weights() {
    let weights = json!({
        "batDensity": 0.5,
        "pigFarmingIntensity": 0.5,
        "fruitConsumptionPractices": 0.5,
        "humanPopulationDensity": 0.5,
        "healthcareInfrastructure": 0.5,
        "environmentalDegradation": 0.5,
    });
    let response = app()
        .oneshot(json_request(
            Method::POST,
            "/api/calculate-risk",
            json!({ "parameters": scenario_payload(), "weights": weights }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body["weightWarning"].is_string());
}

#[tokio::test]
async fn calculate_risk_rejects_out_of_range_factors() {
    let mut parameters = scenario_payload();
    parameters["batDensity"] = json!(1.2);
    let response = app()
        .oneshot(json_request(
            Method::POST,
            "/api/calculate-risk",
            json!({ "parameters": parameters, "baseRiskScore": -0.1 }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Invalid risk parameters");
    assert!(body["errors"]["parameters.batDensity"].is_string());
    assert!(body["errors"]["baseRiskScore"].is_string());
}

#[tokio::test]
async fn calculate_risk_rejects_malformed_json() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/calculate-risk")
        .header("content-type", "application/json")
        .body(Body::from("{\"parameters\":"))
        .expect("request builds");
    let response = app().oneshot(request).await.expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["errors"]["body"].is_string());
}

#[tokio::test]
async fn regions_are_listed_and_looked_up() {
    let app = app();
    let response = app
        .clone()
        .oneshot(get("/api/regions"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(4));

    let response = app
        .clone()
        .oneshot(get("/api/regions/region2"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["name"], "Kerala");
    assert_eq!(body["baseRiskScore"], 0.65);

    let response = app
        .oneshot(get("/api/regions/atlantis"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Region not found");
    assert_eq!(body["identifier"], "atlantis");
}

#[tokio::test]
async fn catalogs_are_served() {
    let app = app();
    let interventions = read_json(
        app.clone()
            .oneshot(get("/api/interventions"))
            .await
            .expect("router responds"),
    )
    .await;
    assert_eq!(interventions.as_array().map(Vec::len), Some(6));

    let events = read_json(
        app.oneshot(get("/api/seasonal-events"))
            .await
            .expect("router responds"),
    )
    .await;
    assert_eq!(events.as_array().map(Vec::len), Some(5));
}

#[tokio::test]
async fn projection_reports_intervention_effect() {
    let response = app()
        .oneshot(json_request(
            Method::POST,
            "/api/projection",
            json!({
                "regionIdentifier": "region1",
                "parameters": scenario_payload(),
                "interventions": [{ "id": "pig-quarantine" }, { "id": "health-camps" }],
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["mode"], "constant");
    assert_eq!(body["month"], 1);
    assert_eq!(body["region"]["name"], "West Bengal");
    let current = body["currentScore"].as_f64().expect("current score");
    let after = body["postInterventionRisk"].as_f64().expect("post risk");
    assert!(after < current);
    assert!(body["riskReduction"].as_f64().expect("reduction") > 0.0);
    assert_eq!(body["projection"]["baseRisk"].as_array().map(Vec::len), Some(12));
    assert_eq!(body["interventions"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn temporal_projection_reads_requested_month() {
    let response = app()
        .oneshot(json_request(
            Method::POST,
            "/api/projection",
            json!({
                "regionIdentifier": "region2",
                "parameters": scenario_payload(),
                "interventions": [{ "id": "bat-habitat", "appliedAt": 11 }],
                "mode": "temporal",
                "month": 10,
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["mode"], "temporal");
    assert_eq!(body["currentScore"], body["postInterventionRisk"]);
    assert_eq!(body["riskReduction"], 0.0);
}

#[tokio::test]
async fn projection_rejects_unknown_references() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/projection",
            json!({ "regionIdentifier": "region1", "interventions": [{ "id": "moon-shield" }] }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["identifier"], "moon-shield");

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/projection",
            json!({ "regionIdentifier": "nowhere" }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/projection",
            json!({ "regionIdentifier": "region1", "month": 13 }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["errors"]["month"].is_string());

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/projection",
            json!({
                "regionIdentifier": "region1",
                "mode": "temporal",
                "interventions": [
                    { "id": "fruit-netting", "appliedAt": 3 },
                    { "id": "pig-quarantine", "appliedAt": 200 },
                    { "id": "health-camps", "appliedAt": 0 },
                ],
            }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Invalid projection request");
    assert!(body["errors"]["interventions[1].appliedAt"].is_string());
    assert!(body["errors"]["interventions[2].appliedAt"].is_string());
    assert!(body["errors"].get("interventions[0].appliedAt").is_none());
}

#[tokio::test]
async fn region_parameters_round_trip_through_the_store() {
    let (service, store) = build_service();
    let app = risk_router(service);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/region-parameters",
            json!({ "state": "Kerala", "district": "Kozhikode", "parameters": scenario_payload() }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let saved = read_json(response).await;
    assert!(saved["updatedAt"].is_string());

    let response = app
        .clone()
        .oneshot(get("/api/region-parameters?state=Kerala&district=Kozhikode"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["parameters"], scenario_payload());

    let stored = store
        .get(crate::risk::parameters::REGION_DATA_KEY)
        .expect("store readable")
        .expect("book persisted");
    assert!(stored.contains("Kozhikode"));

    let response = app
        .oneshot(get("/api/region-parameters"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn region_parameters_reject_invalid_updates() {
    let mut parameters = scenario_payload();
    parameters["healthcareInfrastructure"] = json!(-0.5);
    let response = app()
        .oneshot(json_request(
            Method::PUT,
            "/api/region-parameters",
            json!({ "state": " ", "parameters": parameters }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Invalid parameter set data");
}

#[tokio::test]
async fn listed_districts_are_seeded_on_startup() {
    let (service, _) = build_service();
    let app = risk_router(service);

    let response = app
        .clone()
        .oneshot(get("/api/region-parameters?state=Assam&district=Guwahati"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let expected = serde_json::to_value(seed_factor_set("Assam", "Guwahati")).expect("serializes");
    assert_eq!(body["parameters"], expected);
    assert_ne!(body["parameters"]["batDensity"], 0.5);

    let response = app
        .oneshot(get("/api/region-parameters?state=Bangladesh%20(Rangpur)"))
        .await
        .expect("router responds");
    let body = read_json(response).await;
    let expected =
        serde_json::to_value(seed_factor_set("Bangladesh (Rangpur)", "")).expect("serializes");
    assert_eq!(body["parameters"], expected);
}

#[tokio::test]
async fn region_parameters_export_and_import() {
    let app = app();
    let response = app
        .clone()
        .oneshot(get("/api/region-parameters/export"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let exported = read_json(response).await;
    let seeded = seeded_entry_count();
    assert_eq!(exported.as_array().map(Vec::len), Some(seeded));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/region-parameters/import")
        .body(Body::from(exported.to_string()))
        .expect("request builds");
    let response = app.clone().oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["imported"], seeded);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/region-parameters/import")
        .body(Body::from("[{\"state\":\"Kerala\"}]"))
        .expect("request builds");
    let response = app.oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn store_failures_surface_as_server_errors() {
    let service = RiskService::new(
        Arc::new(StaticRegionCatalog::standard()),
        Arc::new(ReadOnlyStore),
        WeightProfile::standard(),
        ProjectionMode::Constant,
    )
    .expect("service opens over an existing book");
    let app = risk_router(Arc::new(service));

    let response = app
        .oneshot(json_request(
            Method::PUT,
            "/api/region-parameters",
            json!({ "state": "Kerala", "parameters": scenario_payload() }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read_json(response).await["message"], "Internal server error");
}
