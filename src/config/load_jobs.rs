// src/config/load_jobs.rs

use std::fs::File;
use std::path::Path;

use serde_yaml::from_reader;

use crate::config::jobs::JobFile;
use crate::report::error::ReportError;

/// ジョブファイルの読み込み
pub fn load_jobs<P: AsRef<Path>>(path: P) -> Result<JobFile, ReportError> {
    let file = File::open(path)?;
    let jobs: JobFile = from_reader(file)?;
    Ok(jobs)
}
