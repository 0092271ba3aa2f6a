use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::json;

use super::engine::Assessment;
use super::service::{AssessmentRequest, AssessmentService};

/// Router builder exposing the assessment endpoint.
pub fn assessment_router(service: Arc<AssessmentService>) -> Router {
    Router::new()
        .route("/api/v1/assessments", post(assess_handler))
        .with_state(service)
}

#[derive(Debug, Serialize)]
pub(crate) struct AssessmentResponse {
    pub assessed_on: NaiveDate,
    #[serde(flatten)]
    pub assessment: Assessment,
}

pub(crate) async fn assess_handler(
    State(service): State<Arc<AssessmentService>>,
    axum::Json(request): axum::Json<AssessmentRequest>,
) -> Response {
    match service.assess(request) {
        Ok(assessment) => {
            let response = AssessmentResponse {
                assessed_on: Local::now().date_naive(),
                assessment,
            };
            (StatusCode::OK, axum::Json(response)).into_response()
        }
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}
