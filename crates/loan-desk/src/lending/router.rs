use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Serialize;

use super::application::LoanApplicationForm;
use super::eligibility::{EligibilityAssessment, RiskComponent, RiskMeter};

/// Body returned by the preview endpoint. `available` is false until every
/// scored field parses; the derived values are then omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewResponse {
    pub available: bool,
    pub completion: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<EligibilityAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meter: Option<RiskMeter>,
    pub components: Vec<RiskComponent>,
}

impl PreviewResponse {
    pub fn for_form(form: &LoanApplicationForm) -> Self {
        let completion = form.completion();
        match form.preview() {
            Some(breakdown) => Self {
                available: true,
                completion,
                meter: Some(RiskMeter::for_assessment(&breakdown.assessment)),
                assessment: Some(breakdown.assessment),
                components: breakdown.components,
            },
            None => Self {
                available: false,
                completion,
                assessment: None,
                meter: None,
                components: Vec::new(),
            },
        }
    }
}

/// Router exposing the stateless eligibility preview.
pub fn eligibility_router() -> Router {
    Router::new().route("/api/v1/eligibility/preview", post(preview_handler))
}

pub(crate) async fn preview_handler(axum::Json(form): axum::Json<LoanApplicationForm>) -> Response {
    let response = PreviewResponse::for_form(&form);
    if let Some(assessment) = response.assessment {
        tracing::debug!(
            risk_score = assessment.risk_score,
            decision = %assessment.decision,
            "eligibility preview computed"
        );
    }
    (StatusCode::OK, axum::Json(response)).into_response()
}
