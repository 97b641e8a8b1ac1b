// src/problems/integrands.rs

use crate::analysis::QuadratureKernel;
use crate::math::QuadratureRule;

/// 解析解が分かっている定積分の問題
#[derive(Debug, Clone, Copy)]
pub struct IntegrandProblem {
    pub name: &'static str,
    pub function: fn(f64) -> f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub exact: f64,
}

impl IntegrandProblem {
    pub fn kernel(&self, rule: QuadratureRule) -> QuadratureKernel<fn(f64) -> f64> {
        QuadratureKernel {
            rule,
            function: self.function,
            lower_bound: self.lower_bound,
            upper_bound: self.upper_bound,
        }
    }
}

/// 1/(1+x)^2 を [0, 1] で積分する (厳密値 1/2)
pub fn reciprocal_square() -> IntegrandProblem {
    IntegrandProblem {
        name: "reciprocal_square",
        function: |x| 1.0 / ((1.0 + x) * (1.0 + x)),
        lower_bound: 0.0,
        upper_bound: 1.0,
        exact: 0.5,
    }
}

/// e^{-x} sin x を [0, 1] で積分する
pub fn damped_sine() -> IntegrandProblem {
    IntegrandProblem {
        name: "damped_sine",
        function: |x| (-x).exp() * x.sin(),
        lower_bound: 0.0,
        upper_bound: 1.0,
        exact: 0.5 * (1.0 - (-1.0_f64).exp() * (1.0_f64.sin() + 1.0_f64.cos())),
    }
}

/// x sin(30x) cos x を [0, 2] で積分する
pub fn oscillatory() -> IntegrandProblem {
    IntegrandProblem {
        name: "oscillatory",
        function: |x| x * (30.0 * x).sin() * x.cos(),
        lower_bound: 0.0,
        upper_bound: 2.0,
        exact: oscillatory_exact(2.0),
    }
}

/// ∫_0^b x sin(30x) cos x dx
///
/// sin(30x) cos x = (sin 31x + sin 29x) / 2 と ∫ x sin kx dx = sin kx / k^2 - x cos kx / k を使う。
fn oscillatory_exact(b: f64) -> f64 {
    [29.0_f64, 31.0]
        .iter()
        .map(|k| (k * b).sin() / (k * k) - b * (k * b).cos() / k)
        .sum::<f64>()
        * 0.5
}
