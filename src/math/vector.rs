// src/math/vector.rs

use crate::math::error::MathError;

/// 固定次元の状態ベクトル
///
/// 値型として扱い、演算はすべて新しい値を返す。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State<const N: usize> {
    pub components: [f64; N],
}

impl<const N: usize> State<N> {
    pub fn new(components: [f64; N]) -> Self {
        State { components }
    }

    pub fn zeros() -> Self {
        State {
            components: [0.0; N],
        }
    }

    /// 成分ごとの加算
    pub fn add(&self, other: &State<N>) -> State<N> {
        State {
            components: std::array::from_fn(|i| self.components[i] + other.components[i]),
        }
    }

    /// 成分ごとの減算
    pub fn subtract(&self, other: &State<N>) -> State<N> {
        State {
            components: std::array::from_fn(|i| self.components[i] - other.components[i]),
        }
    }

    /// スカラー倍
    pub fn scale(&self, k: f64) -> State<N> {
        State {
            components: std::array::from_fn(|i| self.components[i] * k),
        }
    }

    /// スカラーによる除算
    ///
    /// # 戻り値
    /// - `k == 0` の場合は `MathError::DivisionByZero`
    pub fn divide(&self, k: f64) -> Result<State<N>, MathError> {
        if k == 0.0 {
            return Err(MathError::DivisionByZero);
        }
        Ok(State {
            components: std::array::from_fn(|i| self.components[i] / k),
        })
    }

    /// ユークリッドノルム
    pub fn norm(&self) -> f64 {
        self.components.iter().map(|c| c * c).sum::<f64>().sqrt()
    }
}
