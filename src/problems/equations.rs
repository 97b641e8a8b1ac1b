// src/problems/equations.rs

use crate::analysis::OdeKernel;
use crate::math::{MathError, OdeMethod, State};

pub type Derivative<const N: usize> = fn(f64, &State<N>) -> State<N>;

/// 解析解が分かっている初期値問題
#[derive(Debug, Clone, Copy)]
pub struct OdeProblem<const N: usize> {
    pub name: &'static str,
    pub component_names: [&'static str; N],
    pub derivative: Derivative<N>,
    pub analytic: fn(f64) -> State<N>,
    pub initial_state: State<N>,
    pub start_time: f64,
    pub final_time: f64,
}

impl<const N: usize> OdeProblem<N> {
    /// 終端時刻での解析解
    pub fn exact(&self) -> State<N> {
        (self.analytic)(self.final_time)
    }

    pub fn kernel(&self, method: OdeMethod) -> OdeKernel<Derivative<N>, N> {
        OdeKernel {
            method,
            derivative: self.derivative,
            initial_state: self.initial_state,
            start_time: self.start_time,
            final_time: self.final_time,
        }
    }
}

/// y' = 1 + y^2, y(0) = 0 を x = π/4 まで (解析解 tan x)
pub fn tangent() -> OdeProblem<1> {
    OdeProblem {
        name: "tangent",
        component_names: ["y"],
        derivative: |_x, y| State::new([1.0 + y.components[0] * y.components[0]]),
        analytic: |x| State::new([x.tan()]),
        initial_state: State::new([0.0]),
        start_time: 0.0,
        final_time: std::f64::consts::FRAC_PI_4,
    }
}

/// 調和振動子 (v, x)' = (-x, v), (v, x)(0) = (1, 0) を t = 1 まで
/// (解析解 (cos t, sin t))
pub fn harmonic_oscillator() -> OdeProblem<2> {
    OdeProblem {
        name: "harmonic_oscillator",
        component_names: ["v", "x"],
        derivative: |_t, y| State::new([-y.components[1], y.components[0]]),
        analytic: |t| State::new([t.cos(), t.sin()]),
        initial_state: State::new([1.0, 0.0]),
        start_time: 0.0,
        final_time: 1.0,
    }
}

/// 調和振動子のエネルギー E = v^2 + x^2 の相対変化 |E - E0| / E0
pub fn relative_energy_drift(initial: &State<2>, current: &State<2>) -> Result<f64, MathError> {
    let energy = |s: &State<2>| s.components[0].powi(2) + s.components[1].powi(2);
    let initial_energy = energy(initial);
    if initial_energy == 0.0 {
        return Err(MathError::DivisionByZero);
    }
    Ok((energy(current) - initial_energy).abs() / initial_energy)
}
