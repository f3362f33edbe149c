pub mod assessment_id;
pub mod assessment_workflow;
pub mod errors;
pub mod payloads;
pub mod upstream_client;
