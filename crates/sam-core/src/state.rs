//! SAM state vector layout
//!
//! The acados model of SAM uses a 19-element state:
//!
//! ```text
//! x = [ p (3) | q (4) | ν_lin (3) | ν_ang (3) | actuators (6) ]
//!       0..3    3..7    7..10       10..13      13..19
//! ```
//!
//! - p: position in the NED frame [m]
//! - q: orientation quaternion, scalar first (`x[3]` is the scalar part)
//! - ν_lin: body-fixed linear velocity (u, v, w) [m/s]
//! - ν_ang: body-fixed angular velocity (p, q, r) [rad/s]
//! - actuators: VBS, LCG, stern plane angle, rudder angle, propeller RPMs

use std::ops::Range;

use nalgebra::{SVector, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::math::quaternion::{from_unit_quaternion, to_unit_quaternion};
use crate::QuatVec;

/// State dimension
pub const NX: usize = 19;

/// Index ranges of the state blocks
pub mod index {
    use std::ops::Range;

    pub const POSITION: Range<usize> = 0..3;
    pub const QUATERNION: Range<usize> = 3..7;
    pub const LINEAR_VELOCITY: Range<usize> = 7..10;
    pub const ANGULAR_VELOCITY: Range<usize> = 10..13;
    pub const ACTUATORS: Range<usize> = 13..19;

    /// Scalar part of the quaternion
    pub const QUATERNION_SCALAR: usize = 3;
}

/// Actuator states carried in the state vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ActuatorState {
    /// Variable buoyancy system position [%]
    pub vbs: f64,
    /// Longitudinal center of gravity trim position [%]
    pub lcg: f64,
    /// Stern plane (elevator) angle [rad]
    pub stern_angle: f64,
    /// Rudder angle [rad]
    pub rudder_angle: f64,
    /// Propeller 1 speed [rpm]
    pub rpm_1: f64,
    /// Propeller 2 speed [rpm]
    pub rpm_2: f64,
}

impl ActuatorState {
    fn to_array(self) -> [f64; 6] {
        [
            self.vbs,
            self.lcg,
            self.stern_angle,
            self.rudder_angle,
            self.rpm_1,
            self.rpm_2,
        ]
    }
}

/// Full SAM state
///
/// The quaternion is kept exactly as it appears in the state vector, without
/// normalization, so that packing and unpacking are lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamState {
    /// Position in NED frame [m]
    pub position: Vector3<f64>,
    /// Raw orientation quaternion, scalar first
    pub orientation: QuatVec,
    /// Body-fixed linear velocity [m/s]
    pub linear_velocity: Vector3<f64>,
    /// Body-fixed angular velocity [rad/s]
    pub angular_velocity: Vector3<f64>,
    /// Actuator states
    pub actuators: ActuatorState,
}

impl Default for SamState {
    fn default() -> Self {
        Self::at_rest(Vector3::zeros())
    }
}

impl SamState {
    /// Vehicle at rest at `position` with identity orientation
    pub fn at_rest(position: Vector3<f64>) -> Self {
        Self {
            position,
            orientation: QuatVec::new(1.0, 0.0, 0.0, 0.0),
            linear_velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            actuators: ActuatorState::default(),
        }
    }

    /// Vehicle at rest with the given pose
    pub fn with_pose(position: Vector3<f64>, orientation: &UnitQuaternion<f64>) -> Self {
        Self {
            orientation: from_unit_quaternion(orientation),
            ..Self::at_rest(position)
        }
    }

    /// Orientation as a unit quaternion (normalizes the stored components)
    pub fn unit_orientation(&self) -> UnitQuaternion<f64> {
        to_unit_quaternion(&self.orientation)
    }

    /// Pack state into the flat acados layout
    pub fn to_vector(&self) -> SVector<f64, NX> {
        let mut x = SVector::<f64, NX>::zeros();
        write_block(&mut x, index::POSITION, self.position.as_slice());
        write_block(&mut x, index::QUATERNION, self.orientation.as_slice());
        write_block(&mut x, index::LINEAR_VELOCITY, self.linear_velocity.as_slice());
        write_block(&mut x, index::ANGULAR_VELOCITY, self.angular_velocity.as_slice());
        write_block(&mut x, index::ACTUATORS, &self.actuators.to_array());
        x
    }

    /// Pack state into a plain array, as passed through the C calling convention
    pub fn to_array(&self) -> [f64; NX] {
        self.to_vector().into()
    }

    /// Unpack state from the flat acados layout
    ///
    /// Returns `None` if `x` does not have exactly [`NX`] elements.
    pub fn from_slice(x: &[f64]) -> Option<Self> {
        if x.len() != NX {
            return None;
        }

        let a = &x[index::ACTUATORS];
        Some(Self {
            position: Vector3::from_column_slice(&x[index::POSITION]),
            orientation: QuatVec::from_column_slice(&x[index::QUATERNION]),
            linear_velocity: Vector3::from_column_slice(&x[index::LINEAR_VELOCITY]),
            angular_velocity: Vector3::from_column_slice(&x[index::ANGULAR_VELOCITY]),
            actuators: ActuatorState {
                vbs: a[0],
                lcg: a[1],
                stern_angle: a[2],
                rudder_angle: a[3],
                rpm_1: a[4],
                rpm_2: a[5],
            },
        })
    }
}

fn write_block(x: &mut SVector<f64, NX>, range: Range<usize>, values: &[f64]) {
    x.as_mut_slice()[range].copy_from_slice(values);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_blocks_cover_state() {
        assert_eq!(index::POSITION.start, 0);
        assert_eq!(index::POSITION.end, index::QUATERNION.start);
        assert_eq!(index::QUATERNION.end, index::LINEAR_VELOCITY.start);
        assert_eq!(index::LINEAR_VELOCITY.end, index::ANGULAR_VELOCITY.start);
        assert_eq!(index::ANGULAR_VELOCITY.end, index::ACTUATORS.start);
        assert_eq!(index::ACTUATORS.end, NX);
    }

    #[test]
    fn test_at_rest_has_unit_scalar_at_index_3() {
        let x = SamState::default().to_vector();

        assert_eq!(x[index::QUATERNION_SCALAR], 1.0);
        assert_eq!(x.iter().filter(|v| **v != 0.0).count(), 1);
    }

    #[test]
    fn test_layout_positions() {
        let state = SamState {
            position: Vector3::new(1.0, 2.0, 3.0),
            orientation: QuatVec::new(4.0, 5.0, 6.0, 7.0),
            linear_velocity: Vector3::new(8.0, 9.0, 10.0),
            angular_velocity: Vector3::new(11.0, 12.0, 13.0),
            actuators: ActuatorState {
                vbs: 14.0,
                lcg: 15.0,
                stern_angle: 16.0,
                rudder_angle: 17.0,
                rpm_1: 18.0,
                rpm_2: 19.0,
            },
        };

        let x = state.to_array();
        for (i, value) in x.iter().enumerate() {
            assert_eq!(*value, (i + 1) as f64);
        }

        assert_eq!(SamState::from_slice(&x), Some(state));
    }

    #[test]
    fn test_from_slice_rejects_wrong_length() {
        assert!(SamState::from_slice(&[0.0; 18]).is_none());
        assert!(SamState::from_slice(&[0.0; 20]).is_none());
    }

    #[test]
    fn test_with_pose_stores_scalar_first() {
        let q = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), PI / 3.0);
        let state = SamState::with_pose(Vector3::zeros(), &q);

        assert_relative_eq!(state.orientation[0], (PI / 6.0).cos(), epsilon = 1e-12);
        assert_relative_eq!(state.orientation[3], (PI / 6.0).sin(), epsilon = 1e-12);
        assert_relative_eq!(state.unit_orientation().angle(), PI / 3.0, epsilon = 1e-9);
    }
}
