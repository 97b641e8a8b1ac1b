// src/analysis/schedule.rs

use serde::Deserialize;

use crate::math::error::MathError;

/// スイープで試す区間数の列
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntervalSchedule {
    /// 1, 2, 3, ..., max
    Linear { max: usize },
    /// start, start*ratio, start*ratio^2, ... (max 以下)
    Geometric { start: usize, ratio: usize, max: usize },
    /// round(10^(k / steps_per_decade)), k = 0..=steps_per_decade * max_exponent
    Logarithmic { steps_per_decade: u32, max_exponent: u32 },
    /// 明示的な区間数のリスト (検証はスイープ側で行う)
    Explicit { counts: Vec<usize> },
}

impl IntervalSchedule {
    /// 区間数の列を生成する
    pub fn counts(&self) -> Result<Vec<usize>, MathError> {
        match self {
            IntervalSchedule::Linear { max } => Ok((1..=*max).collect()),
            IntervalSchedule::Geometric { start, ratio, max } => geometric(*start, *ratio, *max),
            IntervalSchedule::Logarithmic {
                steps_per_decade,
                max_exponent,
            } => logarithmic(*steps_per_decade, *max_exponent),
            IntervalSchedule::Explicit { counts } => Ok(counts.clone()),
        }
    }
}

fn geometric(start: usize, ratio: usize, max: usize) -> Result<Vec<usize>, MathError> {
    if start < 1 {
        return Err(MathError::InvalidArgument(
            "等比スケジュールの初項は1以上である必要があります".to_string(),
        ));
    }
    if ratio < 2 {
        return Err(MathError::InvalidArgument(format!(
            "等比スケジュールの公比は2以上である必要があります (指定値: {})",
            ratio
        )));
    }

    let counts = std::iter::successors(Some(start), |n| n.checked_mul(ratio))
        .take_while(|n| *n <= max)
        .collect();
    Ok(counts)
}

fn logarithmic(steps_per_decade: u32, max_exponent: u32) -> Result<Vec<usize>, MathError> {
    if steps_per_decade < 1 {
        return Err(MathError::InvalidArgument(
            "対数スケジュールの1桁あたりの点数は1以上である必要があります".to_string(),
        ));
    }

    let last = steps_per_decade.checked_mul(max_exponent).ok_or_else(|| {
        MathError::InvalidArgument(format!(
            "対数スケジュールの点数が大きすぎます ({} x {})",
            steps_per_decade, max_exponent
        ))
    })?;

    let mut counts: Vec<usize> = Vec::new();
    for k in 0..=last {
        let count = log_count(k, steps_per_decade)?;
        // 丸めで同じ値が続く場合は1回だけ使う
        if counts.last() != Some(&count) {
            counts.push(count);
        }
    }
    Ok(counts)
}

/// 10^(k / steps_per_decade) を最も近い整数に丸める (最小値1)
///
/// # 戻り値
/// - 丸めた値が `usize` に収まらない場合は `MathError::InvalidArgument`
pub fn log_count(k: u32, steps_per_decade: u32) -> Result<usize, MathError> {
    let exact = 10f64.powf(k as f64 / steps_per_decade as f64).round();
    // usize::MAX as f64 は 2^64 に丸められるので、それ以上は表現できない
    if !exact.is_finite() || exact >= usize::MAX as f64 {
        return Err(MathError::InvalidArgument(format!(
            "区間数 10^({}/{}) が大きすぎます",
            k, steps_per_decade
        )));
    }
    Ok(exact.max(1.0) as usize)
}
