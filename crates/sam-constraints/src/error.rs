//! Errors reported at the boundary between the host solver and the
//! constraint functions
//!
//! The generated kernel itself never fails; these errors come from the
//! dimension checks of [`ExternalFunction::call`](crate::function::ExternalFunction::call)
//! and from the optional [`ValidatedConstraint`](crate::validation::ValidatedConstraint) layer.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstraintError {
    #[error("Invalid number of inputs: expected {expected}, got {got}")]
    InvalidInputCount { expected: usize, got: usize },
    #[error("Invalid number of outputs: expected {expected}, got {got}")]
    InvalidOutputCount { expected: usize, got: usize },
    #[error("Invalid dimension of input {slot}: expected {expected}, got {got}")]
    InvalidInputDimension { slot: usize, expected: usize, got: usize },
    #[error("Invalid dimension of output {slot}: expected {expected}, got {got}")]
    InvalidOutputDimension { slot: usize, expected: usize, got: usize },
    #[error("Non-finite state component x[{index}] = {value}")]
    NonFiniteState { index: usize, value: f64 },
    #[error("Degenerate quaternion: norm {norm:e} is not a finite value of at least {min:e}")]
    DegenerateQuaternion { norm: f64, min: f64 },
    #[error("Quaternion norm {norm} deviates from 1 by more than {tolerance}")]
    QuaternionNotUnit { norm: f64, tolerance: f64 },
    #[error("Constraint evaluation produced non-finite output")]
    NonFiniteOutput,
}
