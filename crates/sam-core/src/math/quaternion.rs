//! Quaternion operations for attitude representation
//!
//! The SAM model stores orientation as a scalar-first quaternion
//! `q = [q0, q1, q2, q3]` directly inside the state vector. The optimizer is
//! free to move it off the unit sphere, so every consumer normalizes it
//! first:
//!
//! ```text
//! q̂ = q / ‖q‖
//! ∂q̂/∂q = (I₄ - q̂q̂ᵀ) / ‖q‖
//! ```
//!
//! None of these functions guard against `‖q‖ = 0`. A zero quaternion yields
//! NaN, which is what the generated solver functions produce as well.

use nalgebra::{Matrix4, Quaternion, UnitQuaternion};

use crate::QuatVec;

/// Euclidean norm of a raw quaternion
pub fn quaternion_norm(q: &QuatVec) -> f64 {
    (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt()
}

/// Normalize a raw quaternion
///
/// Divides every component by [`quaternion_norm`]. No zero guard.
pub fn normalize_quaternion(q: &QuatVec) -> QuatVec {
    let n = quaternion_norm(q);
    q / n
}

/// Jacobian of the normalization map `q ↦ q / ‖q‖`
///
/// # Returns
/// `(I₄ - q̂q̂ᵀ) / ‖q‖`, a symmetric 4x4 matrix whose null space is `q`
pub fn normalization_jacobian(q: &QuatVec) -> Matrix4<f64> {
    let n = quaternion_norm(q);
    let q_hat = q / n;
    (Matrix4::identity() - q_hat * q_hat.transpose()) / n
}

/// Convert a raw scalar-first quaternion into an nalgebra unit quaternion
pub fn to_unit_quaternion(q: &QuatVec) -> UnitQuaternion<f64> {
    UnitQuaternion::from_quaternion(Quaternion::new(q[0], q[1], q[2], q[3]))
}

/// Scalar-first components of an nalgebra unit quaternion
pub fn from_unit_quaternion(q: &UnitQuaternion<f64>) -> QuatVec {
    QuatVec::new(q.w, q.i, q.j, q.k)
}
