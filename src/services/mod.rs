pub mod metrics;
pub mod plan_api;
