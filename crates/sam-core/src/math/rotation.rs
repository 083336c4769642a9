//! SO(3) rotation utilities
//!
//! Rotation matrix from a scalar-first unit quaternion `q̂ = [η, ε₁, ε₂, ε₃]`
//! (Fossen, *Handbook of Marine Craft Hydrodynamics*, `Rquat`):
//!
//! ```text
//! R(q̂) = [1-2(ε₂²+ε₃²)   2(ε₁ε₂-ε₃η)    2(ε₁ε₃+ε₂η) ]
//!        [2(ε₁ε₂+ε₃η)    1-2(ε₁²+ε₃²)   2(ε₂ε₃-ε₁η) ]
//!        [2(ε₁ε₃-ε₂η)    2(ε₂ε₃+ε₁η)    1-2(ε₁²+ε₂²)]
//! ```
//!
//! R maps body-frame vectors into the NED world frame.

use nalgebra::{Matrix3, Matrix3x4, Vector3};

use crate::QuatVec;

/// Rotation matrix R(q̂) from a unit scalar-first quaternion
///
/// The quaternion is used as given; callers normalize first.
pub fn rotation_matrix_from_quaternion(q_hat: &QuatVec) -> Matrix3<f64> {
    let (eta, e1, e2, e3) = (q_hat[0], q_hat[1], q_hat[2], q_hat[3]);

    Matrix3::new(
        1.0 - 2.0 * (e2 * e2 + e3 * e3), 2.0 * (e1 * e2 - e3 * eta),       2.0 * (e1 * e3 + e2 * eta),
        2.0 * (e1 * e2 + e3 * eta),       1.0 - 2.0 * (e1 * e1 + e3 * e3), 2.0 * (e2 * e3 - e1 * eta),
        2.0 * (e1 * e3 - e2 * eta),       2.0 * (e2 * e3 + e1 * eta),       1.0 - 2.0 * (e1 * e1 + e2 * e2),
    )
}

/// Body x-axis expressed in the world frame
///
/// x_world = R(q̂) * [1, 0, 0]^T, i.e. the first column of R
pub fn body_x_axis(q_hat: &QuatVec) -> Vector3<f64> {
    let (eta, e1, e2, e3) = (q_hat[0], q_hat[1], q_hat[2], q_hat[3]);

    Vector3::new(
        1.0 - 2.0 * (e2 * e2 + e3 * e3),
        2.0 * (e1 * e2 + e3 * eta),
        2.0 * (e1 * e3 - e2 * eta),
    )
}

/// Partial derivatives of [`body_x_axis`] with respect to `[η, ε₁, ε₂, ε₃]`
///
/// Column k is ∂(R(q̂)e₁)/∂q̂ₖ, treating the four components as independent
/// (no unit-norm projection).
pub fn body_x_axis_jacobian(q_hat: &QuatVec) -> Matrix3x4<f64> {
    let (eta, e1, e2, e3) = (q_hat[0], q_hat[1], q_hat[2], q_hat[3]);

    Matrix3x4::new(
        0.0,        0.0,       -4.0 * e2,   -4.0 * e3,
        2.0 * e3,   2.0 * e2,   2.0 * e1,    2.0 * eta,
        -2.0 * e2,  2.0 * e3,  -2.0 * eta,   2.0 * e1,
    )
}

/// Normalize a vector and return the Jacobian of the normalization
///
/// ```text
/// u = v / ‖v‖
/// ∂u/∂v = (I₃ - uuᵀ) / ‖v‖
/// ```
///
/// No zero guard: `v = 0` yields NaN in both outputs.
pub fn normalize_with_jacobian(v: &Vector3<f64>) -> (Vector3<f64>, Matrix3<f64>) {
    let m = (v.x * v.x + v.y * v.y + v.z * v.z).sqrt();
    let u = v / m;
    let jac = (Matrix3::identity() - u * u.transpose()) / m;
    (u, jac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::quaternion::{from_unit_quaternion, normalize_quaternion};
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::PI;

    fn random_unit_quaternion(rng: &mut StdRng) -> QuatVec {
        let q = QuatVec::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        normalize_quaternion(&q)
    }

    #[test]
    fn test_identity_quaternion_gives_identity_matrix() {
        let r = rotation_matrix_from_quaternion(&QuatVec::new(1.0, 0.0, 0.0, 0.0));
        assert_relative_eq!(r, Matrix3::identity(), epsilon = 1e-15);
    }

    #[test]
    fn test_rotation_matrix_orthogonal() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let r = rotation_matrix_from_quaternion(&random_unit_quaternion(&mut rng));

            // R * R^T = I
            assert_relative_eq!(r * r.transpose(), Matrix3::identity(), epsilon = 1e-12);
            // det(R) = 1
            assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_matches_nalgebra_rotation() {
        let axis = nalgebra::Unit::new_normalize(Vector3::new(1.0, -2.0, 0.5));
        let uq = UnitQuaternion::from_axis_angle(&axis, 1.1);
        let r = rotation_matrix_from_quaternion(&from_unit_quaternion(&uq));

        assert_relative_eq!(r, *uq.to_rotation_matrix().matrix(), epsilon = 1e-12);
    }

    #[test]
    fn test_yaw_90deg_points_x_axis_east() {
        let uq = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), PI / 2.0);
        let x_axis = body_x_axis(&from_unit_quaternion(&uq));

        assert_relative_eq!(x_axis, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_body_x_axis_is_first_column() {
        let mut rng = StdRng::seed_from_u64(11);
        let q_hat = random_unit_quaternion(&mut rng);
        let r = rotation_matrix_from_quaternion(&q_hat);

        assert_relative_eq!(body_x_axis(&q_hat), r.column(0).into_owned(), epsilon = 1e-15);
    }

    #[test]
    fn test_body_x_axis_jacobian_matches_finite_differences() {
        let q = QuatVec::new(0.8, 0.1, -0.4, 0.3);
        let jac = body_x_axis_jacobian(&q);
        let h = 1e-6;

        for k in 0..4 {
            let mut plus = q;
            let mut minus = q;
            plus[k] += h;
            minus[k] -= h;
            let column = (body_x_axis(&plus) - body_x_axis(&minus)) / (2.0 * h);

            assert_relative_eq!(jac.column(k).into_owned(), column, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_normalize_with_jacobian() {
        let v = Vector3::new(3.0, 0.0, 4.0);
        let (u, jac) = normalize_with_jacobian(&v);

        assert_relative_eq!(u, Vector3::new(0.6, 0.0, 0.8), epsilon = 1e-15);
        // Radial direction is in the null space
        assert_relative_eq!(jac * v, Vector3::zeros(), epsilon = 1e-15);
        // Tangential direction is scaled by 1/‖v‖
        assert_relative_eq!(jac * Vector3::y(), Vector3::y() / 5.0, epsilon = 1e-15);
    }

    #[test]
    fn test_normalize_zero_vector_is_nan() {
        let (u, jac) = normalize_with_jacobian(&Vector3::zeros());
        assert!(u.iter().all(|c| c.is_nan()));
        assert!(jac.iter().all(|c| c.is_nan()));
    }
}
