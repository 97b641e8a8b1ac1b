// src/analysis/mod.rs

pub mod kernel;
pub mod order;
pub mod precision;
pub mod schedule;
pub mod sweep;

pub use kernel::{Estimate, FnKernel, Kernel, OdeKernel, QuadratureKernel};
pub use order::observed_order;
pub use precision::{seek_precision, seek_precision_within, Precision};
pub use schedule::IntervalSchedule;
pub use sweep::{sweep, sweep_parallel, ConvergenceRecord, Sweep};
