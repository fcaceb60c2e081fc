pub mod config;
pub mod dashboard;
pub mod error;
pub mod performance;
pub mod records;
pub mod staff;
pub mod telemetry;
