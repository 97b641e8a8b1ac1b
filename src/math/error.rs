// src/math/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("不正な引数: {0}")]
    InvalidArgument(String),

    #[error("ゼロによる除算です。")]
    DivisionByZero,

    #[error("区間数 {max_intervals} までに許容誤差へ収束しませんでした (最終誤差: {last_error:e})")]
    DidNotConverge { max_intervals: usize, last_error: f64 },
}

/// 区間数が1以上であることを確認する
pub fn ensure_intervals(intervals: usize) -> Result<(), MathError> {
    if intervals < 1 {
        return Err(MathError::InvalidArgument(format!(
            "区間数は1以上である必要があります (指定値: {})",
            intervals
        )));
    }
    Ok(())
}
