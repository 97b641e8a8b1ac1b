// src/math/integrator.rs

use serde::Deserialize;

use crate::math::error::{ensure_intervals, MathError};
use crate::math::vector::State;

/// 固定刻みの常微分方程式ソルバ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OdeMethod {
    Euler,
    RungeKuttaSecond,
    RungeKuttaFourth,
}

impl OdeMethod {
    /// 大域誤差の次数
    pub fn order(&self) -> u32 {
        match self {
            OdeMethod::Euler => 1,
            OdeMethod::RungeKuttaSecond => 2,
            OdeMethod::RungeKuttaFourth => 4,
        }
    }

    /// 1ステップ分の更新
    pub fn step<F, const N: usize>(&self, derivative: &F, state: &State<N>, time: f64, h: f64) -> State<N>
    where
        F: Fn(f64, &State<N>) -> State<N>,
    {
        match self {
            OdeMethod::Euler => euler_step(derivative, state, time, h),
            OdeMethod::RungeKuttaSecond => runge_kutta_step(derivative, state, time, h),
            OdeMethod::RungeKuttaFourth => runge_kutta_fourth_step(derivative, state, time, h),
        }
    }

    /// `start_time` から `final_time` まで `intervals` ステップで積分する
    pub fn integrate<F, const N: usize>(
        &self,
        derivative: F,
        initial_state: State<N>,
        start_time: f64,
        intervals: usize,
        final_time: f64,
    ) -> Result<State<N>, MathError>
    where
        F: Fn(f64, &State<N>) -> State<N>,
    {
        ensure_intervals(intervals)?;
        let h = (final_time - start_time) / intervals as f64;

        // ステップ i の入力はステップ i-1 の出力なので逐次に適用する
        let state = (0..intervals).fold(initial_state, |state, i| {
            let time = start_time + i as f64 * h;
            self.step(&derivative, &state, time, h)
        });

        Ok(state)
    }

    /// 各ステップの時刻と状態を返す (初期値を含めて `intervals + 1` 点)
    pub fn trajectory<F, const N: usize>(
        &self,
        derivative: F,
        initial_state: State<N>,
        start_time: f64,
        intervals: usize,
        final_time: f64,
    ) -> Result<Vec<(f64, State<N>)>, MathError>
    where
        F: Fn(f64, &State<N>) -> State<N>,
    {
        ensure_intervals(intervals)?;
        let h = (final_time - start_time) / intervals as f64;

        let mut samples = Vec::with_capacity(intervals + 1);
        samples.push((start_time, initial_state));

        let mut state = initial_state;
        for i in 0..intervals {
            let time = start_time + i as f64 * h;
            state = self.step(&derivative, &state, time, h);
            samples.push((start_time + (i + 1) as f64 * h, state));
        }

        Ok(samples)
    }
}

/// オイラー法の1ステップ
///
/// # 引数
/// - `derivative`: 微分 f(t, y)
/// - `state`: 現在の状態 y_n
/// - `time`: 現在の時刻 t_n
/// - `h`: ステップ幅
///
/// # 戻り値
/// - y_{n+1} = y_n + h f(t_n, y_n)
pub fn euler_step<F, const N: usize>(derivative: &F, state: &State<N>, time: f64, h: f64) -> State<N>
where
    F: Fn(f64, &State<N>) -> State<N>,
{
    state.add(&derivative(time, state).scale(h))
}

/// 2次ルンゲ・クッタ法 (中点法) の1ステップ
///
/// # 引数
/// - `derivative`: 微分 f(t, y)
/// - `state`: 現在の状態 y_n
/// - `time`: 現在の時刻 t_n
/// - `h`: ステップ幅
///
/// # 戻り値
/// - y_{n+1} = y_n + k2
pub fn runge_kutta_step<F, const N: usize>(derivative: &F, state: &State<N>, time: f64, h: f64) -> State<N>
where
    F: Fn(f64, &State<N>) -> State<N>,
{
    let k1 = derivative(time, state).scale(h);
    let k2 = derivative(time + h / 2.0, &state.add(&k1.scale(0.5))).scale(h);
    state.add(&k2)
}

/// 古典的4次ルンゲ・クッタ法の1ステップ
pub fn runge_kutta_fourth_step<F, const N: usize>(
    derivative: &F,
    state: &State<N>,
    time: f64,
    h: f64,
) -> State<N>
where
    F: Fn(f64, &State<N>) -> State<N>,
{
    let k1 = derivative(time, state).scale(h);
    let k2 = derivative(time + h / 2.0, &state.add(&k1.scale(0.5))).scale(h);
    let k3 = derivative(time + h / 2.0, &state.add(&k2.scale(0.5))).scale(h);
    let k4 = derivative(time + h, &state.add(&k3)).scale(h);

    let increment = k1
        .add(&k2.scale(2.0))
        .add(&k3.scale(2.0))
        .add(&k4)
        .scale(1.0 / 6.0);
    state.add(&increment)
}

/// オイラー法による多ステップ積分
pub fn euler<F, const N: usize>(
    derivative: F,
    initial_state: State<N>,
    start_time: f64,
    intervals: usize,
    final_time: f64,
) -> Result<State<N>, MathError>
where
    F: Fn(f64, &State<N>) -> State<N>,
{
    OdeMethod::Euler.integrate(derivative, initial_state, start_time, intervals, final_time)
}

/// 2次ルンゲ・クッタ法による多ステップ積分
pub fn runge_kutta_second<F, const N: usize>(
    derivative: F,
    initial_state: State<N>,
    start_time: f64,
    intervals: usize,
    final_time: f64,
) -> Result<State<N>, MathError>
where
    F: Fn(f64, &State<N>) -> State<N>,
{
    OdeMethod::RungeKuttaSecond.integrate(derivative, initial_state, start_time, intervals, final_time)
}

/// 4次ルンゲ・クッタ法による多ステップ積分
pub fn runge_kutta_fourth<F, const N: usize>(
    derivative: F,
    initial_state: State<N>,
    start_time: f64,
    intervals: usize,
    final_time: f64,
) -> Result<State<N>, MathError>
where
    F: Fn(f64, &State<N>) -> State<N>,
{
    OdeMethod::RungeKuttaFourth.integrate(derivative, initial_state, start_time, intervals, final_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_4;

    fn tangent(_t: f64, y: &State<1>) -> State<1> {
        State::new([1.0 + y.components[0] * y.components[0]])
    }

    fn oscillator(_t: f64, y: &State<2>) -> State<2> {
        State::new([-y.components[1], y.components[0]])
    }

    fn oscillator_error(method: OdeMethod, intervals: usize) -> f64 {
        let result = method
            .integrate(oscillator, State::new([1.0, 0.0]), 0.0, intervals, 1.0)
            .unwrap();
        result
            .subtract(&State::new([1.0_f64.cos(), 1.0_f64.sin()]))
            .norm()
    }

    /// test_euler_step
    /// y' = 2 の場合、y_1 = 0 + 0.1 * 2 = 0.2 になる。
    #[test]
    fn test_euler_step() {
        let next = euler_step(&|_t: f64, _y: &State<1>| State::new([2.0]), &State::new([0.0]), 0.0, 0.1);
        assert_relative_eq!(next.components[0], 0.2, epsilon = 1e-12);
    }

    /// test_runge_kutta_step_uses_midpoint_time
    /// y' = t の場合、中点法は h * (t + h/2) を加える。
    #[test]
    fn test_runge_kutta_step_uses_midpoint_time() {
        let next = runge_kutta_step(&|t: f64, _y: &State<1>| State::new([t]), &State::new([0.0]), 1.0, 0.5);
        assert_relative_eq!(next.components[0], 0.5 * 1.25, epsilon = 1e-12);
    }

    #[test]
    fn test_euler_tangent() {
        let at_100 = euler(tangent, State::new([0.0]), 0.0, 100, FRAC_PI_4).unwrap();
        let at_1000 = euler(tangent, State::new([0.0]), 0.0, 1000, FRAC_PI_4).unwrap();
        let error_100 = (at_100.components[0] - 1.0).abs();
        let error_1000 = (at_1000.components[0] - 1.0).abs();

        assert!(error_100 < 0.05);
        // O(1/n): 区間数10倍で誤差はおよそ1/10
        let ratio = error_100 / error_1000;
        assert!(ratio > 8.0 && ratio < 12.0, "ratio = {}", ratio);
    }

    #[test]
    fn test_runge_kutta_second_order() {
        let ratio = oscillator_error(OdeMethod::RungeKuttaSecond, 20)
            / oscillator_error(OdeMethod::RungeKuttaSecond, 40);
        // O(1/n^2): 区間数2倍で誤差はおよそ1/4
        assert!(ratio > 3.5 && ratio < 4.5, "ratio = {}", ratio);
    }

    #[test]
    fn test_runge_kutta_fourth_order() {
        let ratio = oscillator_error(OdeMethod::RungeKuttaFourth, 5)
            / oscillator_error(OdeMethod::RungeKuttaFourth, 10);
        assert!(ratio > 14.0 && ratio < 18.0, "ratio = {}", ratio);
        assert!(oscillator_error(OdeMethod::RungeKuttaFourth, 10) < 1e-6);
    }

    #[test]
    fn test_runge_kutta_advances_time() {
        // y' = t, y(0) = 0 の厳密解は t^2 / 2。中点法は二次式まで厳密
        let result = runge_kutta_second(|t, _y: &State<1>| State::new([t]), State::new([0.0]), 0.0, 4, 2.0).unwrap();
        assert_relative_eq!(result.components[0], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_intervals_rejected() {
        let result = runge_kutta_fourth(oscillator, State::new([1.0, 0.0]), 0.0, 0, 1.0);
        assert!(matches!(result, Err(MathError::InvalidArgument(_))));
        let result = euler(tangent, State::new([0.0]), 0.0, 0, 1.0);
        assert!(matches!(result, Err(MathError::InvalidArgument(_))));
    }

    #[test]
    fn test_trajectory_samples() {
        let samples = OdeMethod::RungeKuttaSecond
            .trajectory(oscillator, State::new([1.0, 0.0]), 0.0, 10, 1.0)
            .unwrap();
        assert_eq!(samples.len(), 11);
        assert_eq!(samples[0], (0.0, State::new([1.0, 0.0])));
        assert_relative_eq!(samples[10].0, 1.0, epsilon = 1e-15);

        let last = runge_kutta_second(oscillator, State::new([1.0, 0.0]), 0.0, 10, 1.0).unwrap();
        assert_eq!(samples[10].1, last);
    }

    #[test]
    fn test_integrate_is_deterministic() {
        let first = OdeMethod::Euler.integrate(tangent, State::new([0.0]), 0.0, 57, FRAC_PI_4).unwrap();
        let second = OdeMethod::Euler.integrate(tangent, State::new([0.0]), 0.0, 57, FRAC_PI_4).unwrap();
        assert_eq!(first.components[0].to_bits(), second.components[0].to_bits());
    }
}
