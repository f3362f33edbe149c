use crate::config::RelayConfig;
use crate::services::assessment_workflow::AssessmentWorkflow;
use crate::services::upstream_client::UpstreamClient;
use std::sync::Arc;

pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub workflow: Arc<AssessmentWorkflow>,
}

impl AppState {
    pub fn new(config: Arc<RelayConfig>, client: Arc<dyn UpstreamClient>) -> Self {
        let workflow = Arc::new(AssessmentWorkflow::new(client, config.clone()));
        Self { config, workflow }
    }
}
