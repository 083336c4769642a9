//! Mathematical utilities for the SAM model
//!
//! Implements scalar-first quaternion operations and the SO(3) rotation
//! utilities used by the constraint functions, together with the analytic
//! derivatives needed for their Jacobians.

pub mod quaternion;
pub mod rotation;

pub use quaternion::*;
pub use rotation::*;
