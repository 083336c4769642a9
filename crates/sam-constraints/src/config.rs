//! Constraint configuration
//!
//! Geometry of the terminal constraint and the checks applied before a state
//! is handed to the kernel.

use serde::{Deserialize, Serialize};

use crate::terminal::{TerminalPoseConstraint, BOW_LEVER_ARM};
use crate::validation::ValidatedConstraint;

/// Main constraint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintConfig {
    /// Distance from the body origin to the constrained bow point [m]
    pub lever_arm: f64,
    /// Input and output checks
    pub validation: ValidationConfig,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            lever_arm: BOW_LEVER_ARM,
            validation: ValidationConfig::default(),
        }
    }
}

impl ConstraintConfig {
    pub fn constraint(&self) -> TerminalPoseConstraint {
        TerminalPoseConstraint::with_lever_arm(self.lever_arm)
    }

    /// Evaluator with the configured checks
    pub fn build(&self) -> ValidatedConstraint {
        ValidatedConstraint::new(self.constraint(), self.validation.clone())
    }
}

/// Checks applied by [`ValidatedConstraint`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Reject NaN/Inf in the position and quaternion components
    pub check_finite: bool,
    /// Smallest accepted quaternion norm, unchecked if `None`
    ///
    /// Non-finite norms are rejected whenever this is set.
    pub min_quaternion_norm: Option<f64>,
    /// Largest accepted `| ‖q‖ - 1 |`, unchecked if `None`
    pub unit_norm_tolerance: Option<f64>,
    /// Reject NaN/Inf in the residual or Jacobian
    pub check_output: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            check_finite: true,
            min_quaternion_norm: Some(1e-9),
            // Integrators let the norm drift; the kernel normalizes anyway
            unit_norm_tolerance: None,
            check_output: true,
        }
    }
}

impl ValidationConfig {
    /// No checks at all, the kernel sees every state
    pub fn permissive() -> Self {
        Self {
            check_finite: false,
            min_quaternion_norm: None,
            unit_norm_tolerance: None,
            check_output: false,
        }
    }

    /// Default checks plus a unit-norm requirement
    pub fn strict(tolerance: f64) -> Self {
        Self {
            unit_norm_tolerance: Some(tolerance),
            ..Self::default()
        }
    }
}
