use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ====================================
// FRONT-END FORM

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSubmission {
    pub name: String,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    #[serde(default)]
    pub response: Value,
}

// ====================================
// WORKFLOW RESULTS

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Create,
    Answers,
    Submit,
    Review,
}

impl StepKind {
    pub const ORDER: [StepKind; 4] = [
        StepKind::Create,
        StepKind::Answers,
        StepKind::Submit,
        StepKind::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Create => "create",
            StepKind::Answers => "answers",
            StepKind::Submit => "submit",
            StepKind::Review => "review",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attempted upstream call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub step: StepKind,
    /// `None` when the call never produced a response.
    pub status: Option<u16>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_id: Option<String>,
    pub response: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowOutcome {
    pub success: bool,
    pub assessment_id: Option<String>,
    pub failed_step: Option<StepKind>,
    pub steps: Vec<StepRecord>,
}

/// Body returned by `POST /api/assessments`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    pub request_id: String,
    #[serde(flatten)]
    pub outcome: WorkflowOutcome,
}
