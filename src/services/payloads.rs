use crate::config::RelayConfig;
use crate::models::assessment::{Answer, StepKind};
use crate::services::errors::RelayError;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;
use serde_json::{Value, json};
use url::Url;

const ASSESSMENTS_PATH: [&str; 4] = ["api", "assessment", "v2", "assessments"];
const REVIEW_STATUS: &str = "COMPLETED";
const REVIEW_COMMENT: &str = "Submitted via web form";

/// Method and URL for a step. `assessment_id` is ignored for `Create`.
pub fn step_endpoint(
    base: &Url,
    step: StepKind,
    assessment_id: &str,
) -> Result<(Method, Url), RelayError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            RelayError::Config("tenant base URL cannot carry a path".to_string())
        })?;
        segments.pop_if_empty().extend(ASSESSMENTS_PATH);
        match step {
            StepKind::Create => {}
            StepKind::Answers => {
                segments.extend([assessment_id, "responses"]);
            }
            StepKind::Submit => {
                segments.extend([assessment_id, "submit"]);
            }
            StepKind::Review => {
                segments.extend([assessment_id, "review"]);
            }
        }
    }

    let method = match step {
        StepKind::Answers => Method::PUT,
        _ => Method::POST,
    };
    Ok((method, url))
}

pub fn create_body(config: &RelayConfig, respondent_name: &str, now: DateTime<Utc>) -> Value {
    json!({
        "respondents": [{
            "respondentId": format!("form-{}", now.timestamp_millis()),
            "respondentName": respondent_name,
        }],
        "orgGroupId": config.org_group_id,
        "templateRootVersionId": config.template_id,
        "name": format!("Assessment - {}", now.to_rfc3339_opts(SecondsFormat::Millis, true)),
    })
}

pub fn answers_body(answers: &[Answer]) -> Value {
    let responses: Vec<Value> = answers
        .iter()
        .map(|a| json!({ "questionId": a.question_id, "response": a.response }))
        .collect();
    json!({ "responses": responses })
}

pub fn submit_body() -> Value {
    json!({})
}

pub fn review_body() -> Value {
    json!({ "status": REVIEW_STATUS, "comment": REVIEW_COMMENT })
}
