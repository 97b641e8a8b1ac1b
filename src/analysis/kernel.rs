// src/analysis/kernel.rs

use std::marker::PhantomData;

use crate::math::error::{ensure_intervals, MathError};
use crate::math::{OdeMethod, QuadratureRule, State};

/// 誤差を測れる推定値
pub trait Estimate: Clone {
    /// |estimate - reference|
    fn absolute_error(&self, reference: &Self) -> f64;

    /// |reference|
    fn magnitude(&self) -> f64;

    /// 表に出力する成分
    fn components(&self) -> Vec<f64>;

    /// |estimate - reference| / |reference|
    ///
    /// 参照値がゼロの場合は `MathError::InvalidArgument`
    fn relative_error(&self, reference: &Self) -> Result<f64, MathError> {
        ensure_nonzero_reference(reference)?;
        Ok(self.absolute_error(reference) / reference.magnitude())
    }
}

impl Estimate for f64 {
    fn absolute_error(&self, reference: &Self) -> f64 {
        (self - reference).abs()
    }

    fn magnitude(&self) -> f64 {
        self.abs()
    }

    fn components(&self) -> Vec<f64> {
        vec![*self]
    }
}

impl<const N: usize> Estimate for State<N> {
    fn absolute_error(&self, reference: &Self) -> f64 {
        self.subtract(reference).norm()
    }

    fn magnitude(&self) -> f64 {
        self.norm()
    }

    fn components(&self) -> Vec<f64> {
        self.components.to_vec()
    }
}

/// 相対誤差の分母になる参照値がゼロでないことを確認する
pub fn ensure_nonzero_reference<E: Estimate>(reference: &E) -> Result<(), MathError> {
    if reference.magnitude() == 0.0 {
        return Err(MathError::InvalidArgument(
            "相対誤差の参照値がゼロです".to_string(),
        ));
    }
    Ok(())
}

/// 区間数を受け取り推定値を返す計算核
pub trait Kernel {
    type Output: Estimate;

    fn evaluate(&self, intervals: usize) -> Result<Self::Output, MathError>;

    /// 積分区間の長さ (終点 - 始点)
    fn span(&self) -> f64;

    fn step_width(&self, intervals: usize) -> f64 {
        self.span() / intervals as f64
    }
}

/// 求積則を区間 [lower_bound, upper_bound] に固定した計算核
#[derive(Debug, Clone)]
pub struct QuadratureKernel<F> {
    pub rule: QuadratureRule,
    pub function: F,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl<F> Kernel for QuadratureKernel<F>
where
    F: Fn(f64) -> f64,
{
    type Output = f64;

    fn evaluate(&self, intervals: usize) -> Result<f64, MathError> {
        self.rule
            .integrate(&self.function, self.lower_bound, self.upper_bound, intervals)
    }

    fn span(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

/// 初期値問題を固定した計算核
#[derive(Debug, Clone)]
pub struct OdeKernel<F, const N: usize> {
    pub method: OdeMethod,
    pub derivative: F,
    pub initial_state: State<N>,
    pub start_time: f64,
    pub final_time: f64,
}

impl<F, const N: usize> Kernel for OdeKernel<F, N>
where
    F: Fn(f64, &State<N>) -> State<N>,
{
    type Output = State<N>;

    fn evaluate(&self, intervals: usize) -> Result<State<N>, MathError> {
        self.method.integrate(
            &self.derivative,
            self.initial_state,
            self.start_time,
            intervals,
            self.final_time,
        )
    }

    fn span(&self) -> f64 {
        self.final_time - self.start_time
    }
}

/// クロージャによる計算核
pub struct FnKernel<F, E> {
    span: f64,
    function: F,
    output: PhantomData<fn() -> E>,
}

impl<F, E> FnKernel<F, E>
where
    F: Fn(usize) -> E,
    E: Estimate,
{
    pub fn new(span: f64, function: F) -> Self {
        FnKernel {
            span,
            function,
            output: PhantomData,
        }
    }
}

impl<F, E> Kernel for FnKernel<F, E>
where
    F: Fn(usize) -> E,
    E: Estimate,
{
    type Output = E;

    fn evaluate(&self, intervals: usize) -> Result<E, MathError> {
        ensure_intervals(intervals)?;
        Ok((self.function)(intervals))
    }

    fn span(&self) -> f64 {
        self.span
    }
}
