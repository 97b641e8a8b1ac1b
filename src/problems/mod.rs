// src/problems/mod.rs

pub mod equations;
pub mod integrands;

pub use equations::{harmonic_oscillator, relative_energy_drift, tangent, OdeProblem};
pub use integrands::{damped_sine, oscillatory, reciprocal_square, IntegrandProblem};
