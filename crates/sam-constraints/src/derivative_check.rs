//! Finite-difference check of the analytic Jacobian
//!
//! Central differences on every state component:
//!
//! ```text
//! ∂h/∂xⱼ ≈ (h(x + δeⱼ) - h(x - δeⱼ)) / 2δ
//! ```
//!
//! Truncation error is O(δ²); δ around 1e-6 balances it against rounding.

use nalgebra::{SMatrix, SVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::terminal::{TerminalPoseConstraint, NH, NX};

/// Default perturbation for [`check_jacobian`]
pub const DEFAULT_STEP: f64 = 1e-6;

/// Central-difference Jacobian `∂f/∂x` (6x19) of a residual function
pub fn finite_difference_jacobian<F>(f: F, x: &[f64; NX], step: f64) -> SMatrix<f64, NH, NX>
where
    F: Fn(&[f64; NX]) -> SVector<f64, NH>,
{
    let mut jac = SMatrix::<f64, NH, NX>::zeros();
    let mut xp = *x;
    let mut xm = *x;

    for j in 0..NX {
        xp[j] = x[j] + step;
        xm[j] = x[j] - step;
        let column = (f(&xp) - f(&xm)) / (2.0 * step);
        jac.set_column(j, &column);
        xp[j] = x[j];
        xm[j] = x[j];
    }

    jac
}

/// Comparison of the analytic and numerical Jacobian
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JacobianCheck {
    /// Largest `|analytic - numerical|`
    pub max_abs_error: f64,
    /// Largest `|analytic - numerical| / max(1, |numerical|)`
    pub max_rel_error: f64,
    /// `(residual_idx, state_idx)` of the largest relative error
    pub worst_entry: (usize, usize),
}

impl JacobianCheck {
    /// True if every entry agrees to within `tol` (relative, absolute below 1)
    pub fn passes(&self, tol: f64) -> bool {
        self.max_rel_error <= tol
    }
}

/// Compare the analytic Jacobian of `constraint` at `x` against central differences
///
/// Structural zeros are compared too, so a derivative missing from the
/// sparsity pattern shows up as an error.
pub fn check_jacobian(constraint: &TerminalPoseConstraint, x: &[f64; NX], step: f64) -> JacobianCheck {
    let analytic = constraint.evaluate(x).jacobian.jacobian();
    let numerical = finite_difference_jacobian(|xs| constraint.residual(xs), x, step);

    let mut check = JacobianCheck {
        max_abs_error: 0.0,
        max_rel_error: 0.0,
        worst_entry: (0, 0),
    };

    for i in 0..NH {
        for j in 0..NX {
            let abs_error = (analytic[(i, j)] - numerical[(i, j)]).abs();
            let rel_error = abs_error / numerical[(i, j)].abs().max(1.0);

            // The first NaN sticks in both errors and in `worst_entry`
            if check.max_rel_error.is_nan() {
                continue;
            }
            if abs_error.is_nan() || abs_error > check.max_abs_error {
                check.max_abs_error = abs_error;
            }
            if rel_error.is_nan() || rel_error > check.max_rel_error {
                check.max_rel_error = rel_error;
                check.worst_entry = (i, j);
            }
        }
    }

    debug!(
        max_abs_error = check.max_abs_error,
        max_rel_error = check.max_rel_error,
        worst_residual = check.worst_entry.0,
        worst_state = check.worst_entry.1,
        "jacobian check"
    );

    check
}
