//! Terminal constraint bounds
//!
//! acados imposes the terminal constraint as `lh_e ≤ h_e(x_N) ≤ uh_e`. For a
//! pose target both bounds are the target residual, optionally widened by a
//! tolerance. Violations use the sign convention negative = satisfied,
//! positive = violated.

use nalgebra::SVector;
use serde::{Deserialize, Serialize};

use sam_core::SamState;

use crate::terminal::{TerminalPoseConstraint, NH};

/// Names of the residual rows
pub const RESIDUAL_NAMES: [&str; NH] = ["position_x", "position_y", "position_z", "bow_x", "bow_y", "bow_z"];

/// Signed bound violations of one terminal residual
///
/// One row per bound side, `lh_e` rows first, named `<residual>_min` /
/// `<residual>_max` after [`RESIDUAL_NAMES`].
#[derive(Debug, Clone)]
pub struct ConstraintEvaluation {
    /// `lh_e - h` or `h - uh_e` per row; NaN when the residual is NaN
    pub values: Vec<f64>,
    /// Row names such as `bow_y_max`
    pub names: Vec<String>,
    /// No row positive or NaN
    pub all_satisfied: bool,
    /// Largest positive row, NaN once any row is NaN, 0 when satisfied
    pub max_violation: f64,
}

impl ConstraintEvaluation {
    /// Empty evaluation, trivially satisfied
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            names: Vec::new(),
            all_satisfied: true,
            max_violation: 0.0,
        }
    }

    /// Record one bound row
    pub fn add(&mut self, name: &str, value: f64) {
        self.names.push(name.to_string());
        self.values.push(value);
        // NaN counts as violated
        if !(value <= 0.0) {
            self.all_satisfied = false;
            self.max_violation = if value.is_nan() || self.max_violation.is_nan() {
                f64::NAN
            } else {
                self.max_violation.max(value)
            };
        }
    }

    /// Names of the violated rows
    pub fn violated(&self) -> impl Iterator<Item = &str> + '_ {
        self.names
            .iter()
            .zip(&self.values)
            .filter(|(_, v)| !(**v <= 0.0))
            .map(|(name, _)| name.as_str())
    }
}

impl Default for ConstraintEvaluation {
    fn default() -> Self {
        Self::new()
    }
}

/// Box bounds on the terminal residual
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstraintBounds {
    pub lower: [f64; NH],
    pub upper: [f64; NH],
}

impl ConstraintBounds {
    /// `h_e(x) = target`
    pub fn equality(target: &SVector<f64, NH>) -> Self {
        Self::around(target, 0.0)
    }

    /// `|h_e(x) - target| ≤ tol` componentwise
    pub fn around(target: &SVector<f64, NH>, tol: f64) -> Self {
        Self {
            lower: std::array::from_fn(|i| target[i] - tol),
            upper: std::array::from_fn(|i| target[i] + tol),
        }
    }

    /// Bounds that hold exactly when the vehicle reaches `target`'s pose
    pub fn for_pose(constraint: &TerminalPoseConstraint, target: &SamState, tol: f64) -> Self {
        Self::around(&constraint.evaluate_state(target).residual, tol)
    }

    /// Signed violation of every bound, lower bounds first
    pub fn evaluate(&self, residual: &SVector<f64, NH>) -> ConstraintEvaluation {
        let mut eval = ConstraintEvaluation::new();

        for (i, name) in RESIDUAL_NAMES.iter().enumerate() {
            eval.add(&format!("{name}_min"), self.lower[i] - residual[i]);
        }
        for (i, name) in RESIDUAL_NAMES.iter().enumerate() {
            eval.add(&format!("{name}_max"), residual[i] - self.upper[i]);
        }

        eval
    }
}
