pub mod config;
pub mod scoring;
pub mod telemetry;
