//! Checked evaluation
//!
//! The kernel accepts any state and lets degenerate quaternions turn into
//! NaN. [`ValidatedConstraint`] is the boundary for callers that would rather
//! get an error: it inspects the components the kernel reads (position and
//! quaternion) before evaluating and the outputs afterwards.

use tracing::warn;

use sam_core::math::quaternion_norm;
use sam_core::state::index;
use sam_core::{QuatVec, SamState};

use crate::config::ValidationConfig;
use crate::error::ConstraintError;
use crate::terminal::{ConstraintOutput, TerminalPoseConstraint, NX};

/// Terminal constraint with input and output checks
#[derive(Debug, Clone)]
pub struct ValidatedConstraint {
    constraint: TerminalPoseConstraint,
    config: ValidationConfig,
}

impl Default for ValidatedConstraint {
    fn default() -> Self {
        Self::new(TerminalPoseConstraint::nominal(), ValidationConfig::default())
    }
}

impl ValidatedConstraint {
    pub fn new(constraint: TerminalPoseConstraint, config: ValidationConfig) -> Self {
        Self { constraint, config }
    }

    pub fn constraint(&self) -> &TerminalPoseConstraint {
        &self.constraint
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Check a flat state without evaluating
    pub fn validate_state(&self, x: &[f64]) -> Result<(), ConstraintError> {
        if x.len() != NX {
            warn!(expected = NX, got = x.len(), "rejected state of wrong length");
            return Err(ConstraintError::InvalidInputDimension {
                slot: 0,
                expected: NX,
                got: x.len(),
            });
        }

        if self.config.check_finite {
            if let Some(i) = (index::POSITION.start..index::QUATERNION.end).find(|&i| !x[i].is_finite()) {
                warn!(index = i, value = x[i], "rejected non-finite state");
                return Err(ConstraintError::NonFiniteState { index: i, value: x[i] });
            }
        }

        let norm = quaternion_norm(&QuatVec::from_column_slice(&x[index::QUATERNION]));
        if let Some(min) = self.config.min_quaternion_norm {
            // Finite components can still overflow the norm, which the
            // kernel would turn into a zero quaternion
            if !(norm >= min && norm.is_finite()) {
                warn!(norm, min, "rejected degenerate quaternion");
                return Err(ConstraintError::DegenerateQuaternion { norm, min });
            }
        }

        if let Some(tolerance) = self.config.unit_norm_tolerance {
            if (norm - 1.0).abs() > tolerance {
                warn!(norm, tolerance, "rejected non-unit quaternion");
                return Err(ConstraintError::QuaternionNotUnit { norm, tolerance });
            }
        }

        Ok(())
    }

    /// Validate, evaluate, and check the outputs
    pub fn evaluate(&self, x: &[f64]) -> Result<ConstraintOutput, ConstraintError> {
        self.validate_state(x)?;

        let state: &[f64; NX] = x.try_into().map_err(|_| ConstraintError::InvalidInputDimension {
            slot: 0,
            expected: NX,
            got: x.len(),
        })?;
        let output = self.constraint.evaluate(state);

        if self.config.check_output && !output.is_finite() {
            warn!("constraint evaluation produced non-finite output");
            return Err(ConstraintError::NonFiniteOutput);
        }

        Ok(output)
    }

    pub fn evaluate_state(&self, state: &SamState) -> Result<ConstraintOutput, ConstraintError> {
        self.evaluate(&state.to_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn identity_state() -> [f64; NX] {
        SamState::default().to_array()
    }

    #[test]
    fn test_accepts_nominal_state() {
        let checked = ValidatedConstraint::default();
        let x = identity_state();

        let output = checked.evaluate(&x).expect("valid state");
        assert_eq!(output, TerminalPoseConstraint::nominal().evaluate(&x));
    }

    #[test]
    fn test_rejects_wrong_length() {
        let checked = ValidatedConstraint::default();

        assert_eq!(
            checked.evaluate(&[0.0; 7]),
            Err(ConstraintError::InvalidInputDimension { slot: 0, expected: NX, got: 7 })
        );
    }

    #[test]
    fn test_rejects_non_finite_pose() {
        let checked = ValidatedConstraint::default();
        let mut x = identity_state();
        x[1] = f64::INFINITY;

        assert!(matches!(
            checked.evaluate(&x),
            Err(ConstraintError::NonFiniteState { index: 1, .. })
        ));
    }

    #[test]
    fn test_ignores_unread_components() {
        let checked = ValidatedConstraint::default();
        let mut x = identity_state();
        x[12] = f64::NAN;

        assert!(checked.evaluate(&x).is_ok());
    }

    #[test]
    fn test_rejects_zero_quaternion() {
        let checked = ValidatedConstraint::default();

        match checked.evaluate(&[0.0; NX]) {
            Err(ConstraintError::DegenerateQuaternion { norm, min }) => {
                assert_eq!(norm, 0.0);
                assert_eq!(min, 1e-9);
            }
            other => panic!("expected DegenerateQuaternion, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_overflowing_quaternion() {
        let checked = ValidatedConstraint::default();
        // 90 degree yaw scaled so that the squared components overflow
        let mut x = identity_state();
        x[3] = 1e200 * std::f64::consts::FRAC_1_SQRT_2;
        x[6] = 1e200 * std::f64::consts::FRAC_1_SQRT_2;

        match checked.evaluate(&x) {
            Err(ConstraintError::DegenerateQuaternion { norm, min }) => {
                assert_eq!(norm, f64::INFINITY);
                assert_eq!(min, 1e-9);
            }
            other => panic!("expected DegenerateQuaternion, got {other:?}"),
        }
    }

    #[test]
    fn test_unit_norm_tolerance() {
        let mut x = identity_state();
        x[3] = 1.01;

        assert!(ValidatedConstraint::default().evaluate(&x).is_ok());

        let strict = ValidatedConstraint::new(TerminalPoseConstraint::nominal(), ValidationConfig::strict(1e-3));
        match strict.evaluate(&x) {
            Err(ConstraintError::QuaternionNotUnit { norm, tolerance }) => {
                assert_relative_eq!(norm, 1.01, epsilon = 1e-12);
                assert_eq!(tolerance, 1e-3);
            }
            other => panic!("expected QuaternionNotUnit, got {other:?}"),
        }
    }

    #[test]
    fn test_permissive_passes_nan_through() {
        let permissive = ValidatedConstraint::new(TerminalPoseConstraint::nominal(), ValidationConfig::permissive());

        let output = permissive.evaluate(&[0.0; NX]).expect("no checks configured");
        assert!(!output.is_finite());

        let mut x = identity_state();
        x[3] = f64::NAN;
        let output = permissive.evaluate(&x).expect("no checks configured");
        assert!(output.residual.as_slice()[3..].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_output_check_catches_overflow() {
        let config = ValidationConfig {
            check_finite: false,
            ..ValidationConfig::default()
        };
        let checked = ValidatedConstraint::new(TerminalPoseConstraint::nominal(), config);
        let mut x = identity_state();
        x[0] = f64::INFINITY;

        assert_eq!(checked.evaluate(&x), Err(ConstraintError::NonFiniteOutput));
    }
}
