pub mod assessment_handler;
pub mod health_handler;
