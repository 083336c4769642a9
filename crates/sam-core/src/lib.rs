//! # SAM Core
//!
//! Math and model layer for the SAM (Small and Affordable Maritime) AUV
//! optimal-control model.
//!
//! The acados/CasADi toolchain describes the vehicle with a flat 19-element
//! state vector and scalar-first quaternions. This crate provides the pieces
//! every generated function of that model relies on.
//!
//! ## Modules
//!
//! - [`math`]: Scalar-first quaternion normalization, rotation matrices and
//!   their analytic partial derivatives
//! - [`state`]: The 19-element SAM state layout

pub mod math;
pub mod state;

// Common type aliases
use nalgebra::{Matrix3, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f64>;

/// Raw quaternion as stored in the state vector: `[q0, q1, q2, q3]`, scalar first.
///
/// Not required to be unit norm; functions that need a rotation normalize it.
pub type QuatVec = Vector4<f64>;

pub use state::{ActuatorState, SamState, NX};
