// src/report/runner.rs

use std::io::Write;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::analysis::{
    observed_order, seek_precision, seek_precision_within, sweep, sweep_parallel, ConvergenceRecord,
    Estimate, IntervalSchedule, Kernel,
};
use crate::config::{Job, Method, ProblemName};
use crate::math::{OdeMethod, QuadratureRule, State};
use crate::problems::{self, relative_energy_drift, IntegrandProblem, OdeProblem};
use crate::report::error::ReportError;
use crate::report::table::*;

/// 観測次数と理論次数の差がこれを超えたら警告する
pub const ORDER_TOLERANCE: f64 = 0.5;

/// ジョブの実行結果の要約
#[derive(Debug, Clone, PartialEq)]
pub struct JobSummary {
    pub name: String,
    pub rows: usize,
    /// 解法の理論上の収束次数 (スイープのみ)
    pub expected_order: Option<u32>,
    pub observed_order: Option<f64>,
}

/// 名前から組み込みの問題を引く
enum Catalog {
    Integrand(IntegrandProblem),
    Scalar(OdeProblem<1>),
    Planar(OdeProblem<2>),
}

fn lookup(problem: ProblemName) -> Catalog {
    match problem {
        ProblemName::ReciprocalSquare => Catalog::Integrand(problems::reciprocal_square()),
        ProblemName::DampedSine => Catalog::Integrand(problems::damped_sine()),
        ProblemName::Oscillatory => Catalog::Integrand(problems::oscillatory()),
        ProblemName::Tangent => Catalog::Scalar(problems::tangent()),
        ProblemName::HarmonicOscillator => Catalog::Planar(problems::harmonic_oscillator()),
    }
}

fn quadrature_rule(problem: ProblemName, method: Method) -> Result<QuadratureRule, ReportError> {
    method
        .quadrature_rule()
        .ok_or(ReportError::MethodMismatch { problem, method })
}

fn ode_method(problem: ProblemName, method: Method) -> Result<OdeMethod, ReportError> {
    method
        .ode_method()
        .ok_or(ReportError::MethodMismatch { problem, method })
}

/// ジョブを実行し `<output_dir>/<name>.txt` に書き出す
pub fn run_job(job: &Job, output_dir: &Path) -> Result<JobSummary, ReportError> {
    let path = output_dir.join(format!("{}.txt", job.name()));
    info!(job = job.name(), path = %path.display(), "ジョブを開始");

    let mut writer = setup_table_output(&path)?;
    let summary = execute_job(job, &mut writer)?;
    writer.flush()?;

    match (summary.observed_order, summary.expected_order) {
        (Some(observed), Some(expected)) => {
            info!(job = %summary.name, rows = summary.rows, observed, expected, "ジョブが完了");
            if order_deviates(observed, expected) {
                warn!(
                    job = %summary.name,
                    observed,
                    expected,
                    "観測された収束次数が理論次数から外れています"
                );
            }
        }
        _ => info!(job = %summary.name, rows = summary.rows, "ジョブが完了"),
    }
    Ok(summary)
}

/// 観測次数が理論次数から `ORDER_TOLERANCE` より離れているか
pub fn order_deviates(observed: f64, expected: u32) -> bool {
    (observed - expected as f64).abs() > ORDER_TOLERANCE
}

/// ジョブを実行し、表を `writer` に書き込む
pub fn execute_job<W: Write>(job: &Job, writer: &mut W) -> Result<JobSummary, ReportError> {
    let (rows, expected, order) = match job {
        Job::Sweep {
            problem,
            method,
            schedule,
            parallel,
            ..
        } => match lookup(*problem) {
            Catalog::Integrand(p) => {
                let rule = quadrature_rule(*problem, *method)?;
                let (rows, order) =
                    write_sweep(writer, &p.kernel(rule), p.exact, schedule, &result_labels(&[]), *parallel)?;
                (rows, Some(rule.order()), order)
            }
            Catalog::Scalar(p) => {
                let method = ode_method(*problem, *method)?;
                let labels = result_labels(&p.component_names);
                let (rows, order) =
                    write_sweep(writer, &p.kernel(method), p.exact(), schedule, &labels, *parallel)?;
                (rows, Some(method.order()), order)
            }
            Catalog::Planar(p) => {
                let method = ode_method(*problem, *method)?;
                let labels = result_labels(&p.component_names);
                let (rows, order) =
                    write_sweep(writer, &p.kernel(method), p.exact(), schedule, &labels, *parallel)?;
                (rows, Some(method.order()), order)
            }
        },
        Job::Precision {
            problem,
            method,
            tolerance,
            max_intervals,
            ..
        } => {
            let rows = match lookup(*problem) {
                Catalog::Integrand(p) => {
                    let kernel = p.kernel(quadrature_rule(*problem, *method)?);
                    write_precision(writer, &kernel, &p.exact, *tolerance, *max_intervals, &result_labels(&[]))?
                }
                Catalog::Scalar(p) => {
                    let kernel = p.kernel(ode_method(*problem, *method)?);
                    let labels = result_labels(&p.component_names);
                    write_precision(writer, &kernel, &p.exact(), *tolerance, *max_intervals, &labels)?
                }
                Catalog::Planar(p) => {
                    let kernel = p.kernel(ode_method(*problem, *method)?);
                    let labels = result_labels(&p.component_names);
                    write_precision(writer, &kernel, &p.exact(), *tolerance, *max_intervals, &labels)?
                }
            };
            (rows, None, None)
        }
        Job::Trajectory {
            problem,
            method,
            intervals,
            ..
        } => {
            let rows = match lookup(*problem) {
                Catalog::Integrand(_) => {
                    return Err(ReportError::InvalidJob(format!(
                        "軌道の出力は常微分方程式の問題でのみ使えます ({:?})",
                        problem
                    )));
                }
                Catalog::Scalar(p) => {
                    let method = ode_method(*problem, *method)?;
                    write_trajectory(writer, &p, method, *intervals, |_, _| None)?
                }
                Catalog::Planar(p) => {
                    let method = ode_method(*problem, *method)?;
                    let drift =
                        |initial: &State<2>, current: &State<2>| relative_energy_drift(initial, current).ok();
                    write_trajectory(writer, &p, method, *intervals, drift)?
                }
            };
            (rows, None, None)
        }
    };

    Ok(JobSummary {
        name: job.name().to_string(),
        rows,
        expected_order: expected,
        observed_order: order,
    })
}

fn write_sweep<W, K>(
    writer: &mut W,
    kernel: &K,
    reference: K::Output,
    schedule: &IntervalSchedule,
    labels: &[String],
    parallel: bool,
) -> Result<(usize, Option<f64>), ReportError>
where
    W: Write,
    K: Kernel + Sync,
    K::Output: Send + Sync,
{
    let counts = schedule.counts()?;
    write_sweep_header(writer, labels)?;

    let mut error_points = Vec::with_capacity(counts.len());
    let mut write_record = |writer: &mut W, record: &ConvergenceRecord<K::Output>| {
        debug!(
            intervals = record.interval_count,
            relative_error = record.relative_error,
            "スイープ行"
        );
        error_points.push(record.error_point());
        writer.write_all(create_sweep_row(record).as_bytes())
    };

    if parallel {
        for record in sweep_parallel(kernel, reference, counts)? {
            write_record(&mut *writer, &record)?;
        }
    } else {
        for record in sweep(kernel, reference, counts)? {
            write_record(&mut *writer, &record?)?;
        }
    }

    let rows = error_points.len();
    Ok((rows, observed_order(error_points)))
}

fn write_precision<W, K>(
    writer: &mut W,
    kernel: &K,
    reference: &K::Output,
    tolerance: f64,
    max_intervals: Option<usize>,
    labels: &[String],
) -> Result<usize, ReportError>
where
    W: Write,
    K: Kernel,
{
    let precision = match max_intervals {
        Some(max) => seek_precision_within(kernel, reference, tolerance, max)?,
        None => {
            warn!(tolerance, "区間数の上限なしで精度探索を行います");
            seek_precision(kernel, reference, tolerance)?
        }
    };
    info!(
        intervals = precision.intervals,
        absolute_error = precision.absolute_error,
        "許容誤差を満たす区間数"
    );

    write_precision_table(writer, labels, &precision)?;
    Ok(1)
}

fn write_trajectory<W, D, const N: usize>(
    writer: &mut W,
    problem: &OdeProblem<N>,
    method: OdeMethod,
    intervals: usize,
    energy_drift: D,
) -> Result<usize, ReportError>
where
    W: Write,
    D: Fn(&State<N>, &State<N>) -> Option<f64>,
{
    let samples = method.trajectory(
        problem.derivative,
        problem.initial_state,
        problem.start_time,
        intervals,
        problem.final_time,
    )?;

    let with_drift = energy_drift(&problem.initial_state, &problem.initial_state).is_some();
    write_trajectory_header(writer, &problem.component_names, with_drift)?;

    for (step, (time, state)) in samples.iter().enumerate() {
        let drift = energy_drift(&problem.initial_state, state);
        writer.write_all(create_trajectory_row(step, *time, state, drift).as_bytes())?;
    }

    let final_error = samples
        .last()
        .map(|(_, state)| state.absolute_error(&problem.exact()));
    debug!(?final_error, "軌道の終端誤差");

    Ok(samples.len())
}
