//! Terminal pose constraint of the SAM OCP
//!
//! The terminal stage constrains the vehicle position together with the
//! position of a point on the body x-axis (the bow), which pins down both
//! position and heading of the hull axis without involving the roll angle:
//!
//! ```text
//! h_e(x) = [ p                      ]   (3)
//!          [ p + c · v / ‖v‖        ]   (3)
//!
//! v  = R(q̂) e₁,   q̂ = q / ‖q‖,   c = 0.655 m
//! ```
//!
//! The function is evaluated together with its transposed Jacobian
//! `(∂h_e/∂x)ᵀ`, a 19x6 matrix with 18 structural non-zeros:
//!
//! ```text
//!            h0  h1  h2  h3  h4  h5
//! x0 (px)     1   .   .   1   .   .
//! x1 (py)     .   1   .   .   1   .
//! x2 (pz)     .   .   1   .   .   1
//! x3 (q0)     .   .   .   *   *   *
//! x4 (q1)     .   .   .   *   *   *
//! x5 (q2)     .   .   .   *   *   *
//! x6 (q3)     .   .   .   *   *   *
//! x7..x18     .   .   .   .   .   .
//! ```
//!
//! The quaternion block is the chain rule through both normalizations:
//!
//! ```text
//! ∂(c·v/‖v‖)/∂q = c · (I₃ - uuᵀ)/‖v‖ · ∂v/∂q̂ · (I₄ - q̂q̂ᵀ)/‖q‖,   u = v/‖v‖
//! ```
//!
//! Neither norm is guarded. A zero quaternion turns every quaternion-dependent
//! output into NaN while the position rows and the constant ones stay intact.

use nalgebra::{SVector, Vector3};
use serde::{Deserialize, Serialize};

use sam_core::math::{
    body_x_axis, body_x_axis_jacobian, normalization_jacobian, normalize_with_jacobian,
    quaternion_norm,
};
use sam_core::state::index;
use sam_core::{QuatVec, SamState};

use crate::function::{ExternalFunction, WorkSize};
use crate::jacobian::SparseJacobian;
use crate::sparsity::{CasadiInt, Sparsity};

/// Symbol name of the generated function this module implements
pub const FUNCTION_NAME: &str = "SAM_equation_system_constr_h_e_fun_jac_uxt_zt";

/// State dimension
pub const NX: usize = sam_core::NX;

/// Residual dimension
pub const NH: usize = 6;

/// Structural non-zeros of the transposed Jacobian
pub const NNZ_JAC: usize = 18;

/// Distance from the origin of the body frame to the bow point [m]
pub const BOW_LEVER_ARM: f64 = 0.655;

/// Number of input slots (state plus three empty slots)
pub const N_IN: usize = 4;

/// Number of output slots (residual, Jacobian, empty 6x0)
pub const N_OUT: usize = 3;

/// Input slot names
pub const INPUT_NAMES: [&str; N_IN] = ["i0", "i1", "i2", "i3"];

/// Output slot names
pub const OUTPUT_NAMES: [&str; N_OUT] = ["o0", "o1", "o2"];

/// Caller-provided scratch memory reported to the host
pub const WORK_SIZE: WorkSize = WorkSize { arg: 10, res: 4, iw: 0, w: 116 };

/// Storage positions of the constant `∂p/∂p = 1` entries
const IDENTITY_SLOTS: [usize; 6] = [0, 1, 2, 3, 8, 13];

/// Storage position of `∂h[3+k]/∂q0`; the following three hold q1..q3
const QUATERNION_BLOCK_START: [usize; 3] = [4, 9, 14];

/// Sparsity patterns of all slots
pub mod pattern {
    use super::*;

    static STATE_DATA: [CasadiInt; 23] = [
        19, 1, 0, 19, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18,
    ];
    static EMPTY_DATA: [CasadiInt; 3] = [0, 0, 0];
    static RESIDUAL_DATA: [CasadiInt; 10] = [6, 1, 0, 6, 0, 1, 2, 3, 4, 5];
    static JACOBIAN_DATA: [CasadiInt; 27] = [
        19, 6, 0, 1, 2, 3, 8, 13, 18, 0, 1, 2, 0, 3, 4, 5, 6, 1, 3, 4, 5, 6, 2, 3, 4, 5, 6,
    ];
    static EMPTY_OUTPUT_DATA: [CasadiInt; 3] = [6, 0, 0];

    /// Input 0: dense 19x1 state
    pub static STATE: Sparsity = Sparsity::from_compressed(&STATE_DATA);

    /// Inputs 1..3: 0x0
    pub static EMPTY: Sparsity = Sparsity::from_compressed(&EMPTY_DATA);

    /// Output 0: dense 6x1 residual
    pub static RESIDUAL: Sparsity = Sparsity::from_compressed(&RESIDUAL_DATA);

    /// Output 1: transposed Jacobian, 19x6 with 18 non-zeros
    pub static JACOBIAN: Sparsity = Sparsity::from_compressed(&JACOBIAN_DATA);

    /// Output 2: 6x0
    pub static EMPTY_OUTPUT: Sparsity = Sparsity::from_compressed(&EMPTY_OUTPUT_DATA);
}

/// Residual and Jacobian of one evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintOutput {
    /// h_e(x)
    pub residual: SVector<f64, NH>,
    /// (∂h_e/∂x)ᵀ in compressed form
    pub jacobian: SparseJacobian,
}

impl ConstraintOutput {
    /// Position of the bow point, `h[3..6]`
    pub fn bow_position(&self) -> Vector3<f64> {
        self.residual.fixed_rows::<3>(3).into_owned()
    }

    pub fn is_finite(&self) -> bool {
        self.residual.iter().all(|v| v.is_finite()) && self.jacobian.is_finite()
    }
}

/// Terminal pose constraint evaluator
///
/// Stateless: every call reads only its arguments and writes only its
/// outputs, so one instance can be shared freely between threads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminalPoseConstraint {
    lever_arm: f64,
}

impl Default for TerminalPoseConstraint {
    fn default() -> Self {
        Self::nominal()
    }
}

impl TerminalPoseConstraint {
    /// Constraint with the SAM bow lever arm of 0.655 m
    pub const fn nominal() -> Self {
        Self {
            lever_arm: BOW_LEVER_ARM,
        }
    }

    /// Constraint on a different point of the body x-axis
    pub const fn with_lever_arm(lever_arm: f64) -> Self {
        Self { lever_arm }
    }

    pub fn lever_arm(&self) -> f64 {
        self.lever_arm
    }

    /// Evaluate the residual and/or the Jacobian non-zeros into caller buffers
    ///
    /// Outputs passed as `None` are skipped. Buffers are only written.
    /// Jacobian values follow the storage order of [`pattern::JACOBIAN`].
    pub fn eval(
        &self,
        state: &[f64; NX],
        residual: Option<&mut [f64; NH]>,
        jacobian: Option<&mut [f64; NNZ_JAC]>,
    ) {
        let position = Vector3::from_column_slice(&state[index::POSITION]);
        let q = QuatVec::from_column_slice(&state[index::QUATERNION]);

        let q_hat = q / quaternion_norm(&q);
        let (heading, heading_jac) = normalize_with_jacobian(&body_x_axis(&q_hat));

        if let Some(h) = residual {
            let bow = position + self.lever_arm * heading;
            h[..3].copy_from_slice(position.as_slice());
            h[3..].copy_from_slice(bow.as_slice());
        }

        if let Some(jac) = jacobian {
            // 3x4: ∂(bow)/∂[q0, q1, q2, q3]
            let bow_jac =
                self.lever_arm * heading_jac * body_x_axis_jacobian(&q_hat) * normalization_jacobian(&q);

            for slot in IDENTITY_SLOTS {
                jac[slot] = 1.0;
            }
            for (k, start) in QUATERNION_BLOCK_START.iter().enumerate() {
                for j in 0..4 {
                    jac[start + j] = bow_jac[(k, j)];
                }
            }
        }
    }

    /// Evaluate residual and Jacobian
    pub fn evaluate(&self, state: &[f64; NX]) -> ConstraintOutput {
        let mut residual = [0.0; NH];
        let mut values = [0.0; NNZ_JAC];
        self.eval(state, Some(&mut residual), Some(&mut values));

        ConstraintOutput {
            residual: SVector::from(residual),
            jacobian: SparseJacobian::from_values(values),
        }
    }

    /// Residual only
    pub fn residual(&self, state: &[f64; NX]) -> SVector<f64, NH> {
        let mut residual = [0.0; NH];
        self.eval(state, Some(&mut residual), None);
        SVector::from(residual)
    }

    pub fn evaluate_state(&self, state: &SamState) -> ConstraintOutput {
        self.evaluate(&state.to_array())
    }
}

impl ExternalFunction for TerminalPoseConstraint {
    fn name(&self) -> &'static str {
        FUNCTION_NAME
    }

    fn n_in(&self) -> usize {
        N_IN
    }

    fn n_out(&self) -> usize {
        N_OUT
    }

    fn name_in(&self, i: usize) -> Option<&'static str> {
        INPUT_NAMES.get(i).copied()
    }

    fn name_out(&self, i: usize) -> Option<&'static str> {
        OUTPUT_NAMES.get(i).copied()
    }

    fn sparsity_in(&self, i: usize) -> Option<Sparsity> {
        match i {
            0 => Some(pattern::STATE),
            1..=3 => Some(pattern::EMPTY),
            _ => None,
        }
    }

    fn sparsity_out(&self, i: usize) -> Option<Sparsity> {
        match i {
            0 => Some(pattern::RESIDUAL),
            1 => Some(pattern::JACOBIAN),
            2 => Some(pattern::EMPTY_OUTPUT),
            _ => None,
        }
    }

    fn work_size(&self) -> WorkSize {
        WORK_SIZE
    }

    fn eval(&self, args: &[&[f64]], res: &mut [Option<&mut [f64]>]) {
        let Some(state) = args.first().and_then(|x| <&[f64; NX]>::try_from(*x).ok()) else {
            return;
        };

        let mut slots = res.iter_mut();
        let residual = slots
            .next()
            .and_then(|slot| slot.as_deref_mut())
            .and_then(|buf| <&mut [f64; NH]>::try_from(buf).ok());
        let jacobian = slots
            .next()
            .and_then(|slot| slot.as_deref_mut())
            .and_then(|buf| <&mut [f64; NNZ_JAC]>::try_from(buf).ok());

        TerminalPoseConstraint::eval(self, state, residual, jacobian);
    }
}
