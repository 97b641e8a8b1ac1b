// src/math/quadrature.rs

use serde::Deserialize;

use crate::math::error::{ensure_intervals, MathError};

/// 固定幅の数値積分則
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuadratureRule {
    Trapezium,
    Simpsons,
}

impl QuadratureRule {
    /// 打ち切り誤差の次数
    pub fn order(&self) -> u32 {
        match self {
            QuadratureRule::Trapezium => 2,
            QuadratureRule::Simpsons => 4,
        }
    }

    pub fn integrate<F>(
        &self,
        f: F,
        lower_bound: f64,
        upper_bound: f64,
        intervals: usize,
    ) -> Result<f64, MathError>
    where
        F: Fn(f64) -> f64,
    {
        match self {
            QuadratureRule::Trapezium => trapezium(f, lower_bound, upper_bound, intervals),
            QuadratureRule::Simpsons => simpsons(f, lower_bound, upper_bound, intervals),
        }
    }
}

/// 台形則による定積分
///
/// 区間の端点は `lower_bound + i * h` で毎回計算し、位置の累積による誤差を避ける。
/// 上限と下限が逆順の場合は負の積分値を返す。
///
/// # 引数
/// - `f`: 被積分関数
/// - `lower_bound`: 積分の下限
/// - `upper_bound`: 積分の上限
/// - `intervals`: 分割数 (1以上)
///
/// # 戻り値
/// - 積分の近似値
pub fn trapezium<F>(
    f: F,
    lower_bound: f64,
    upper_bound: f64,
    intervals: usize,
) -> Result<f64, MathError>
where
    F: Fn(f64) -> f64,
{
    ensure_intervals(intervals)?;
    let h = (upper_bound - lower_bound) / intervals as f64;

    let total = (0..intervals)
        .map(|i| {
            let left = lower_bound + i as f64 * h;
            let right = lower_bound + (i + 1) as f64 * h;
            0.5 * h * (f(left) + f(right))
        })
        .sum();

    Ok(total)
}

/// シンプソン則による定積分
///
/// 各小区間で両端と中点の3点を使う。三次多項式まで厳密。
///
/// # 引数
/// - `f`: 被積分関数
/// - `lower_bound`: 積分の下限
/// - `upper_bound`: 積分の上限
/// - `intervals`: 分割数 (1以上)
///
/// # 戻り値
/// - 積分の近似値
pub fn simpsons<F>(
    f: F,
    lower_bound: f64,
    upper_bound: f64,
    intervals: usize,
) -> Result<f64, MathError>
where
    F: Fn(f64) -> f64,
{
    ensure_intervals(intervals)?;
    let h = (upper_bound - lower_bound) / intervals as f64;

    let total = (0..intervals)
        .map(|i| {
            let left = lower_bound + i as f64 * h;
            let mid = lower_bound + (i as f64 + 0.5) * h;
            let right = lower_bound + (i + 1) as f64 * h;
            (h / 6.0) * (f(left) + 4.0 * f(mid) + f(right))
        })
        .sum();

    Ok(total)
}
