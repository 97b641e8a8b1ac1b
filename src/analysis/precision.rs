// src/analysis/precision.rs

use tracing::debug;

use crate::analysis::kernel::{Estimate, Kernel};
use crate::math::error::MathError;

/// 許容誤差に達したときの推定値と区間数
#[derive(Debug, Clone, PartialEq)]
pub struct Precision<E> {
    pub estimate: E,
    pub intervals: usize,
    pub absolute_error: f64,
}

/// 区間数を1から1ずつ増やし、参照値との絶対誤差が `tolerance` 以下になるまで繰り返す
///
/// 上限はない。収束の遅い計算核や厳しい許容誤差では終わらない可能性があるので、
/// 上限が必要な場合は `seek_precision_within` を使う。
///
/// # 引数
/// - `kernel`: 計算核
/// - `reference`: 参照値
/// - `tolerance`: 目標とする絶対誤差 (0以上)
///
/// # 戻り値
/// - 最初に許容誤差を満たした推定値と区間数
pub fn seek_precision<K: Kernel>(
    kernel: &K,
    reference: &K::Output,
    tolerance: f64,
) -> Result<Precision<K::Output>, MathError> {
    search(kernel, reference, tolerance, None)
}

/// `seek_precision` に区間数の上限を付けたもの
///
/// `max_intervals` まで試して収束しなければ `MathError::DidNotConverge` を返す。
pub fn seek_precision_within<K: Kernel>(
    kernel: &K,
    reference: &K::Output,
    tolerance: f64,
    max_intervals: usize,
) -> Result<Precision<K::Output>, MathError> {
    search(kernel, reference, tolerance, Some(max_intervals))
}

fn search<K: Kernel>(
    kernel: &K,
    reference: &K::Output,
    tolerance: f64,
    max_intervals: Option<usize>,
) -> Result<Precision<K::Output>, MathError> {
    if tolerance.is_nan() || tolerance < 0.0 {
        return Err(MathError::InvalidArgument(format!(
            "許容誤差は0以上である必要があります (指定値: {})",
            tolerance
        )));
    }

    let mut intervals = 1;
    let mut last_error = f64::INFINITY;
    loop {
        if let Some(max) = max_intervals {
            if intervals > max {
                return Err(MathError::DidNotConverge {
                    max_intervals: max,
                    last_error,
                });
            }
        }

        let estimate = kernel.evaluate(intervals)?;
        let absolute_error = estimate.absolute_error(reference);
        if absolute_error <= tolerance {
            debug!(intervals, absolute_error, "許容誤差に到達");
            return Ok(Precision {
                estimate,
                intervals,
                absolute_error,
            });
        }

        last_error = absolute_error;
        intervals += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::kernel::{FnKernel, QuadratureKernel};
    use crate::math::QuadratureRule;

    fn damped_sine_kernel(rule: QuadratureRule) -> QuadratureKernel<fn(f64) -> f64> {
        QuadratureKernel {
            rule,
            function: |x| (-x).exp() * x.sin(),
            lower_bound: 0.0,
            upper_bound: 1.0,
        }
    }

    fn damped_sine_exact() -> f64 {
        0.5 * (1.0 - (-1.0_f64).exp() * (1.0_f64.sin() + 1.0_f64.cos()))
    }

    /// test_simpsons_precision_interval_count
    /// 13区間では誤差 1.2e-8、14区間で 8.9e-9 となり 1e-8 を下回る。
    #[test]
    fn test_simpsons_precision_interval_count() {
        let kernel = damped_sine_kernel(QuadratureRule::Simpsons);
        let result = seek_precision(&kernel, &damped_sine_exact(), 1e-8).unwrap();

        assert_eq!(result.intervals, 14);
        assert!(result.absolute_error <= 1e-8);
    }

    #[test]
    fn test_trapezium_needs_more_intervals() {
        let kernel = damped_sine_kernel(QuadratureRule::Trapezium);
        let result = seek_precision(&kernel, &damped_sine_exact(), 1e-4).unwrap();
        assert_eq!(result.intervals, 31);
    }

    #[test]
    fn test_exact_kernel_converges_immediately() {
        let kernel = QuadratureKernel {
            rule: QuadratureRule::Trapezium,
            function: |x: f64| 3.0 * x,
            lower_bound: 0.0,
            upper_bound: 2.0,
        };
        let result = seek_precision(&kernel, &6.0, 0.0).unwrap();
        assert_eq!(result.intervals, 1);
    }

    #[test]
    fn test_cap_guards_against_non_convergence() {
        // 参照値に決して近づかない計算核
        let kernel = FnKernel::new(1.0, |_n: usize| 0.0_f64);
        let result = seek_precision_within(&kernel, &1.0, 1e-6, 50);

        assert_eq!(
            result,
            Err(MathError::DidNotConverge {
                max_intervals: 50,
                last_error: 1.0
            })
        );
    }

    #[test]
    fn test_invalid_tolerance() {
        let kernel = FnKernel::new(1.0, |_n: usize| 0.0_f64);
        assert!(matches!(
            seek_precision(&kernel, &1.0, -1.0),
            Err(MathError::InvalidArgument(_))
        ));
        assert!(matches!(
            seek_precision(&kernel, &1.0, f64::NAN),
            Err(MathError::InvalidArgument(_))
        ));
    }
}
