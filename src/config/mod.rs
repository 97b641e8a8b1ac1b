// src/config/mod.rs

pub mod jobs;
pub mod load_jobs;

pub use jobs::{Job, JobFile, Method, ProblemName};
pub use load_jobs::load_jobs;
