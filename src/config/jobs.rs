// src/config/jobs.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::analysis::IntervalSchedule;
use crate::math::{OdeMethod, QuadratureRule};

/// ジョブファイル全体
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobFile {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    pub jobs: Vec<Job>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

/// 組み込みの問題
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemName {
    ReciprocalSquare,
    DampedSine,
    Oscillatory,
    Tangent,
    HarmonicOscillator,
}

/// 数値解法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Trapezium,
    Simpsons,
    Euler,
    RungeKuttaSecond,
    RungeKuttaFourth,
}

impl Method {
    pub fn quadrature_rule(&self) -> Option<QuadratureRule> {
        match self {
            Method::Trapezium => Some(QuadratureRule::Trapezium),
            Method::Simpsons => Some(QuadratureRule::Simpsons),
            _ => None,
        }
    }

    pub fn ode_method(&self) -> Option<OdeMethod> {
        match self {
            Method::Euler => Some(OdeMethod::Euler),
            Method::RungeKuttaSecond => Some(OdeMethod::RungeKuttaSecond),
            Method::RungeKuttaFourth => Some(OdeMethod::RungeKuttaFourth),
            _ => None,
        }
    }
}

/// 1つのジョブ。結果は `<output_dir>/<name>.txt` に書き出す
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Job {
    /// 区間数を変えながら誤差を記録する
    Sweep {
        name: String,
        problem: ProblemName,
        method: Method,
        schedule: IntervalSchedule,
        #[serde(default)]
        parallel: bool,
    },
    /// 許容誤差に達するまで区間数を増やす
    Precision {
        name: String,
        problem: ProblemName,
        method: Method,
        tolerance: f64,
        #[serde(default)]
        max_intervals: Option<usize>,
    },
    /// 各ステップの状態を記録する (常微分方程式のみ)
    Trajectory {
        name: String,
        problem: ProblemName,
        method: Method,
        intervals: usize,
    },
}

impl Job {
    pub fn name(&self) -> &str {
        match self {
            Job::Sweep { name, .. } | Job::Precision { name, .. } | Job::Trajectory { name, .. } => name,
        }
    }
}
