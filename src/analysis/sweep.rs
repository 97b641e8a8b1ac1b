// src/analysis/sweep.rs

use rayon::prelude::*;

use crate::analysis::kernel::{ensure_nonzero_reference, Estimate, Kernel};
use crate::math::error::{ensure_intervals, MathError};

/// 収束スイープの1行
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceRecord<E> {
    pub interval_count: usize,
    pub estimate: E,
    pub relative_error: f64,
    pub step_width: f64,
}

impl<E> ConvergenceRecord<E> {
    /// 収束次数の推定に使う (区間数, 相対誤差)
    pub fn error_point(&self) -> (usize, f64) {
        (self.interval_count, self.relative_error)
    }
}

/// 区間数の列に沿って計算核を評価する遅延イテレータ
///
/// 1回だけ走査できる。同じ結果が必要なら同じ引数で作り直す。
pub struct Sweep<'a, K: Kernel, I> {
    kernel: &'a K,
    reference: K::Output,
    schedule: I,
}

/// 収束スイープを開始する
///
/// 参照値はスイープの前に一度だけ検証する。
///
/// # 引数
/// - `kernel`: 区間数から推定値を計算する計算核
/// - `reference`: 解析解などの参照値 (ゼロは不可)
/// - `schedule`: 試す区間数の列
///
/// # 戻り値
/// - 区間数ごとに `ConvergenceRecord` を返すイテレータ
pub fn sweep<K, S>(
    kernel: &K,
    reference: K::Output,
    schedule: S,
) -> Result<Sweep<'_, K, S::IntoIter>, MathError>
where
    K: Kernel,
    S: IntoIterator<Item = usize>,
{
    ensure_nonzero_reference(&reference)?;
    Ok(Sweep {
        kernel,
        reference,
        schedule: schedule.into_iter(),
    })
}

impl<K, I> Iterator for Sweep<'_, K, I>
where
    K: Kernel,
    I: Iterator<Item = usize>,
{
    type Item = Result<ConvergenceRecord<K::Output>, MathError>;

    fn next(&mut self) -> Option<Self::Item> {
        let intervals = self.schedule.next()?;
        Some(evaluate_record(self.kernel, &self.reference, intervals))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.schedule.size_hint()
    }
}

fn evaluate_record<K: Kernel>(
    kernel: &K,
    reference: &K::Output,
    intervals: usize,
) -> Result<ConvergenceRecord<K::Output>, MathError> {
    ensure_intervals(intervals)?;
    let estimate = kernel.evaluate(intervals)?;
    let relative_error = estimate.relative_error(reference)?;
    Ok(ConvergenceRecord {
        interval_count: intervals,
        estimate,
        relative_error,
        step_width: kernel.step_width(intervals),
    })
}

/// 区間数ごとの評価を rayon で並列に行う
///
/// 結果は `sweep` と同じくスケジュールの順に並ぶ。
/// どれか1つでも失敗した場合はそのエラーを返す。
pub fn sweep_parallel<K, S>(
    kernel: &K,
    reference: K::Output,
    schedule: S,
) -> Result<Vec<ConvergenceRecord<K::Output>>, MathError>
where
    K: Kernel + Sync,
    K::Output: Send + Sync,
    S: IntoIterator<Item = usize>,
{
    ensure_nonzero_reference(&reference)?;
    let counts: Vec<usize> = schedule.into_iter().collect();

    counts
        .par_iter()
        .map(|&intervals| evaluate_record(kernel, &reference, intervals))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::kernel::{FnKernel, QuadratureKernel};
    use crate::math::QuadratureRule;

    #[test]
    fn test_constant_kernel_sweep() {
        let kernel = FnKernel::new(1.0, |_n: usize| 0.0_f64);
        let records: Vec<_> = sweep(&kernel, 1.0, [1, 2, 4, 8])
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records.len(), 4);
        let counts: Vec<usize> = records.iter().map(|r| r.interval_count).collect();
        assert_eq!(counts, vec![1, 2, 4, 8]);
        assert!(records.iter().all(|r| r.relative_error == 1.0));
        assert_eq!(records[3].step_width, 0.125);
    }

    #[test]
    fn test_zero_reference_rejected_before_sweep() {
        let kernel = FnKernel::new(1.0, |_n: usize| 0.0_f64);
        assert!(matches!(
            sweep(&kernel, 0.0, [1, 2]),
            Err(MathError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_interval_count_is_an_error_item() {
        let kernel = FnKernel::new(1.0, |n: usize| n as f64);
        let items: Vec<_> = sweep(&kernel, 1.0, vec![1, 0, 2]).unwrap().collect();

        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        assert!(matches!(items[1], Err(MathError::InvalidArgument(_))));
        assert!(items[2].is_ok());
    }

    #[test]
    fn test_sweep_is_lazy() {
        use std::cell::Cell;

        let calls = Cell::new(0);
        let kernel = FnKernel::new(1.0, |n: usize| {
            calls.set(calls.get() + 1);
            n as f64
        });
        let mut records = sweep(&kernel, 1.0, 1..=1000).unwrap();
        assert_eq!(calls.get(), 0);

        records.next();
        records.next();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let kernel = QuadratureKernel {
            rule: QuadratureRule::Simpsons,
            function: |x: f64| (-x).exp() * x.sin(),
            lower_bound: 0.0,
            upper_bound: 1.0,
        };
        let reference = 0.5 * (1.0 - (-1.0_f64).exp() * (1.0_f64.sin() + 1.0_f64.cos()));
        let schedule = vec![16, 1, 4, 64, 2];

        let parallel = sweep_parallel(&kernel, reference, schedule.clone()).unwrap();
        let sequential: Vec<_> = sweep(&kernel, reference, schedule)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        // 昇順でないスケジュールでも順序は変わらない
        assert_eq!(parallel, sequential);
        let counts: Vec<usize> = parallel.iter().map(|r| r.interval_count).collect();
        assert_eq!(counts, vec![16, 1, 4, 64, 2]);
    }
}
