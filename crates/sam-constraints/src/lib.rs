//! SAM Terminal Constraint
//!
//! Terminal pose constraint of the SAM AUV optimal control problem, evaluated
//! together with its sparse Jacobian for the acados SQP solver.
//!
//! # Function
//!
//! ```text
//! h_e(x) = [ p ; p + c · R(q/‖q‖) e₁ / ‖R(q/‖q‖) e₁‖ ]      c = 0.655 m
//!
//! inputs:   x (19x1 dense), three empty 0x0 slots
//! outputs:  h_e (6x1 dense), (∂h_e/∂x)ᵀ (19x6, 18 non-zeros), empty 6x0
//! ```
//!
//! The crate is a drop-in replacement for the CasADi-generated C function
//! `SAM_equation_system_constr_h_e_fun_jac_uxt_zt`: linked as a static
//! library it exports the same symbols with the same calling convention.
//!
//! # Components
//!
//! - [`terminal`]: The evaluator and the constant slot metadata
//! - [`jacobian`]: Compressed transposed Jacobian
//! - [`sparsity`]: CasADi compressed column sparsity descriptors
//! - [`function`]: The external function interface acados consumes
//! - [`ffi`]: `extern "C"` exports under the generated symbol names
//! - [`validation`]: Checked evaluation that rejects degenerate states
//! - [`constraints`]: Terminal bounds and violation reports
//! - [`derivative_check`]: Finite-difference verification of the Jacobian
//! - [`config`]: Constraint and validation configuration

pub mod config;
pub mod constraints;
pub mod derivative_check;
pub mod error;
pub mod ffi;
pub mod function;
pub mod jacobian;
pub mod sparsity;
pub mod terminal;
pub mod validation;

// Generated C implementation (only when feature is enabled and the source was found)
#[cfg(all(feature = "reference", sam_reference_linked))]
pub mod reference_ffi;

// Re-exports
pub use config::{ConstraintConfig, ValidationConfig};
pub use constraints::{ConstraintBounds, ConstraintEvaluation};
pub use error::ConstraintError;
pub use function::{ExternalFunction, WorkSize};
pub use jacobian::SparseJacobian;
pub use sparsity::Sparsity;
pub use terminal::{ConstraintOutput, TerminalPoseConstraint};
pub use validation::ValidatedConstraint;
