// src/math/mod.rs

pub mod error;
pub mod integrator;
pub mod quadrature;
pub mod vector;

pub use error::MathError;
pub use integrator::{euler, euler_step, runge_kutta_fourth, runge_kutta_second, runge_kutta_step, OdeMethod};
pub use quadrature::{simpsons, trapezium, QuadratureRule};
pub use vector::State;
