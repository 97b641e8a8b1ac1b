// src/report/error.rs

use thiserror::Error;

use crate::config::{Method, ProblemName};
use crate::math::MathError;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("入出力エラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("ジョブファイルの解析に失敗しました: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Math(#[from] MathError),

    #[error("問題 {problem:?} に解法 {method:?} は使えません。")]
    MethodMismatch { problem: ProblemName, method: Method },

    #[error("不正なジョブ: {0}")]
    InvalidJob(String),
}
