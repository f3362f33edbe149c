use crate::AppState;
use crate::models::assessment::{AssessmentSubmission, RelayResponse};
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ====================================
// MAIN ASSESSMENT HANDLER

/// Entry point for the front-end form: runs the full upstream workflow.
pub async fn submit_assessment(
    State(state): State<AppState>,
    Json(payload): Json<AssessmentSubmission>,
) -> Response {
    let request_id = Uuid::new_v4();
    relay_submission(state, payload, request_id).await
}

#[instrument(skip_all, fields(request_id = %request_id))]
async fn relay_submission(
    state: AppState,
    mut payload: AssessmentSubmission,
    request_id: Uuid,
) -> Response {
    payload.name = payload.name.trim().to_string();
    if let Err(message) = validate_submission(&payload) {
        warn!("Rejected submission: {}", message);
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "requestId": request_id.to_string(),
                "error": message,
            })),
        )
            .into_response();
    }

    info!(answers = payload.answers.len(), "starting assessment workflow");
    let outcome = state.workflow.run(&payload).await;

    let status = if outcome.success {
        info!(assessment_id = ?outcome.assessment_id, "assessment workflow complete");
        StatusCode::OK
    } else {
        warn!(
            failed_step = ?outcome.failed_step,
            assessment_id = ?outcome.assessment_id,
            "assessment workflow stopped early"
        );
        StatusCode::BAD_GATEWAY
    };

    (
        status,
        Json(RelayResponse {
            request_id: request_id.to_string(),
            outcome,
        }),
    )
        .into_response()
}

// ====================================
// VALIDATION

/// Checks the form before any upstream call is made.
fn validate_submission(payload: &AssessmentSubmission) -> Result<(), String> {
    if payload.name.is_empty() {
        return Err("name is required".to_string());
    }
    if let Some(pos) = payload
        .answers
        .iter()
        .position(|a| a.question_id.trim().is_empty())
    {
        return Err(format!("answers[{}].questionId is required", pos));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessment::Answer;
    use serde_json::Value;

    fn submission(name: &str, question_ids: &[&str]) -> AssessmentSubmission {
        AssessmentSubmission {
            name: name.to_string(),
            answers: question_ids
                .iter()
                .map(|q| Answer {
                    question_id: q.to_string(),
                    response: Value::Null,
                })
                .collect(),
        }
    }

    #[test]
    fn accepts_name_and_answers() {
        assert!(validate_submission(&submission("Jo", &["q1", "q2"])).is_ok());
        assert!(validate_submission(&submission("Jo", &[])).is_ok());
    }

    #[test]
    fn rejects_missing_name() {
        assert_eq!(
            validate_submission(&submission("", &[])),
            Err("name is required".to_string())
        );
    }

    #[test]
    fn names_the_blank_question_id() {
        assert_eq!(
            validate_submission(&submission("Jo", &["q1", "  "])),
            Err("answers[1].questionId is required".to_string())
        );
    }
}
