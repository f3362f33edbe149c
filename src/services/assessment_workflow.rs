use crate::config::RelayConfig;
use crate::models::assessment::{AssessmentSubmission, StepKind, StepRecord, WorkflowOutcome};
use crate::services::assessment_id::{extract_assessment_id, parse_body};
use crate::services::payloads;
use crate::services::upstream_client::{UpstreamClient, UpstreamRequest, UpstreamResponse};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

const MISSING_ID: &str = "create response did not contain an assessment identifier";

/// Drives create -> answers -> submit -> review against the assessment API.
///
/// Stateless: each `run` is independent, and the first failed step ends it.
pub struct AssessmentWorkflow {
    client: Arc<dyn UpstreamClient>,
    config: Arc<RelayConfig>,
}

impl AssessmentWorkflow {
    pub fn new(client: Arc<dyn UpstreamClient>, config: Arc<RelayConfig>) -> Self {
        Self { client, config }
    }

    pub async fn run(&self, submission: &AssessmentSubmission) -> WorkflowOutcome {
        let mut steps = Vec::with_capacity(StepKind::ORDER.len());

        // ====================================
        // CREATE

        let create = self
            .call(
                StepKind::Create,
                "",
                payloads::create_body(&self.config, &submission.name, Utc::now()),
            )
            .await;
        let assessment_id = match create {
            Ok(resp) => {
                debug!("Create response raw: {}", resp.body);
                let extracted = extract_assessment_id(&resp);
                let mut record = record_from_response(StepKind::Create, &resp);
                match extracted {
                    Some(found) if record.ok => {
                        info!(
                            assessment_id = %found.id,
                            source = ?found.source,
                            "assessment created"
                        );
                        record.assessment_id = Some(found.id.clone());
                        steps.push(record);
                        found.id
                    }
                    found => {
                        if record.ok {
                            record.ok = false;
                            record.error = Some(MISSING_ID.to_string());
                        } else {
                            record.assessment_id = found.map(|f| f.id);
                        }
                        warn!(status = ?record.status, "create step failed");
                        steps.push(record);
                        return finish(steps, None);
                    }
                }
            }
            Err(record) => {
                steps.push(record);
                return finish(steps, None);
            }
        };

        // ====================================
        // DEPENDENT STEPS

        let dependent = [
            (StepKind::Answers, payloads::answers_body(&submission.answers)),
            (StepKind::Submit, payloads::submit_body()),
            (StepKind::Review, payloads::review_body()),
        ];
        for (step, body) in dependent {
            let record = match self.call(step, &assessment_id, body).await {
                Ok(resp) => record_from_response(step, &resp),
                Err(record) => record,
            };
            let ok = record.ok;
            if ok {
                info!(%step, status = ?record.status, "step succeeded");
            } else {
                warn!(%step, status = ?record.status, "step failed, stopping workflow");
            }
            steps.push(record);
            if !ok {
                break;
            }
        }

        finish(steps, Some(assessment_id))
    }

    /// Sends one step. Transport and URL errors come back as a finished
    /// failure record.
    async fn call(
        &self,
        step: StepKind,
        assessment_id: &str,
        body: Value,
    ) -> Result<UpstreamResponse, StepRecord> {
        let (method, url) =
            payloads::step_endpoint(&self.config.tenant_base_url, step, assessment_id)
                .map_err(|e| failed_record(step, e.to_string()))?;
        info!(%step, %method, %url, "calling upstream");

        self.client
            .send(UpstreamRequest { method, url, body })
            .await
            .map_err(|e| {
                warn!(%step, error = %e, "upstream call failed");
                failed_record(step, e.to_string())
            })
    }
}

fn record_from_response(step: StepKind, resp: &UpstreamResponse) -> StepRecord {
    let ok = resp.is_success();
    StepRecord {
        step,
        status: Some(resp.status),
        ok,
        assessment_id: None,
        response: parse_body(&resp.body),
        error: (!ok).then(|| format!("upstream returned status {}", resp.status)),
    }
}

fn failed_record(step: StepKind, error: String) -> StepRecord {
    StepRecord {
        step,
        status: None,
        ok: false,
        assessment_id: None,
        response: Value::Null,
        error: Some(error),
    }
}

fn finish(steps: Vec<StepRecord>, assessment_id: Option<String>) -> WorkflowOutcome {
    let failed_step = steps.iter().find(|s| !s.ok).map(|s| s.step);
    let success = failed_step.is_none() && steps.len() == StepKind::ORDER.len();
    // a non-2xx create can still name an id; surface it
    let assessment_id =
        assessment_id.or_else(|| steps.iter().find_map(|s| s.assessment_id.clone()));
    WorkflowOutcome {
        success,
        assessment_id,
        failed_step,
        steps,
    }
}
