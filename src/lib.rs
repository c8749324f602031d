pub mod config;
pub mod error;
pub mod forms;
pub mod plans;
pub mod postings;
pub mod storage;
pub mod telemetry;
