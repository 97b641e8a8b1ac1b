// src/report/mod.rs

pub mod error;
pub mod runner;
pub mod table;

pub use error::ReportError;
pub use runner::{execute_job, run_job, JobSummary};
