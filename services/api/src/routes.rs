use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use school_feasibility::error::AppError;
use school_feasibility::feasibility::{render_payload, NormPlan, ScenarioInput};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FeasibilityRequest {
    pub(crate) scenario: ScenarioInput,
    pub(crate) norms: NormPlan,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/feasibility", post(feasibility_endpoint))
}

pub(crate) async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn feasibility_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<FeasibilityRequest>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .engine
        .run_feasibility(&request.scenario, &request.norms);

    info!(
        multi_year_valid = result.multi_year_valid,
        y1_students = result.years.y1.students.total_students,
        "feasibility projection served"
    );

    Ok(Json(render_payload(&result)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use school_feasibility::feasibility::FeasibilityEngine;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn build_router(ready: bool) -> Router {
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            engine: Arc::new(FeasibilityEngine::default()),
        };
        router().layer(Extension(state))
    }

    async fn post_json(router: Router, body: Value) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/feasibility")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, payload)
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_bound() {
        let response = build_router(false)
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn feasibility_endpoint_returns_flattened_payload() {
        let (status, payload) = post_json(
            build_router(true),
            json!({
                "scenario": {
                    "grades": [{ "grade": "1", "branch_count": 2, "total_students": 40 }],
                    "capacity": 100,
                    "inflation": { "y2": 0.1, "y3": 0.1 }
                },
                "norms": {
                    "teacher_weekly_max_hours": 24,
                    "curriculum_weekly_hours": { "1": { "Math": 5, "Reading": 5 } }
                }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["students"]["total_students"], json!(40.0));
        assert_eq!(payload["students"]["utilization"], json!(0.4));
        assert_eq!(payload["norm"]["total_teaching_hours"], json!(20.0));
        assert_eq!(payload["norm"]["required_teachers"], json!(1));
        assert_eq!(payload["years"]["y3"]["inflation_factor"], json!(1.21));
        assert_eq!(payload["multi_year_valid"], json!(true));
    }

    #[tokio::test]
    async fn empty_body_still_projects_with_errors() {
        let (status, payload) = post_json(build_router(true), json!({})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["is_valid"], json!(false));
        assert_eq!(payload["multi_year_valid"], json!(false));
        assert!(payload["flags"]["errors"]
            .as_array()
            .is_some_and(|errors| !errors.is_empty()));
    }
}
