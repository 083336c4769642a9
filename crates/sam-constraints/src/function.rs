//! External function interface
//!
//! acados consumes model functions through the CasADi calling convention:
//! a fixed number of input and output slots, each with a constant sparsity
//! pattern and a name, plus the size of the scratch memory the caller has to
//! provide. [`ExternalFunction`] exposes that metadata and a slice-level
//! entry point that checks dimensions before evaluating.

use std::mem::size_of;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConstraintError;
use crate::sparsity::{CasadiInt, Sparsity};

/// Scratch memory the caller provides for one evaluation
///
/// Counts are in elements: argument pointers, result pointers, integers and
/// reals respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSize {
    pub arg: usize,
    pub res: usize,
    pub iw: usize,
    pub w: usize,
}

impl WorkSize {
    /// Same sizes expressed in bytes
    pub fn bytes(&self) -> WorkSize {
        WorkSize {
            arg: self.arg * size_of::<*const f64>(),
            res: self.res * size_of::<*mut f64>(),
            iw: self.iw * size_of::<CasadiInt>(),
            w: self.w * size_of::<f64>(),
        }
    }
}

/// A numerical function in the CasADi calling convention
pub trait ExternalFunction {
    /// Symbol name of the function
    fn name(&self) -> &'static str;

    fn n_in(&self) -> usize;

    fn n_out(&self) -> usize;

    fn name_in(&self, i: usize) -> Option<&'static str>;

    fn name_out(&self, i: usize) -> Option<&'static str>;

    fn sparsity_in(&self, i: usize) -> Option<Sparsity>;

    fn sparsity_out(&self, i: usize) -> Option<Sparsity>;

    /// Value assumed for an input that is not provided
    fn default_in(&self, _i: usize) -> f64 {
        0.0
    }

    fn work_size(&self) -> WorkSize;

    /// Evaluate with slots already matching the sparsity patterns
    ///
    /// `args[i].len()` equals the non-zero count of input i and every
    /// provided output buffer has the non-zero count of its output. `None`
    /// outputs are not computed.
    fn eval(&self, args: &[&[f64]], res: &mut [Option<&mut [f64]>]);

    /// Check slot counts and dimensions, then evaluate
    fn call(&self, args: &[&[f64]], res: &mut [Option<&mut [f64]>]) -> Result<(), ConstraintError> {
        if args.len() != self.n_in() {
            warn!(function = self.name(), expected = self.n_in(), got = args.len(), "wrong input count");
            return Err(ConstraintError::InvalidInputCount {
                expected: self.n_in(),
                got: args.len(),
            });
        }
        if res.len() != self.n_out() {
            warn!(function = self.name(), expected = self.n_out(), got = res.len(), "wrong output count");
            return Err(ConstraintError::InvalidOutputCount {
                expected: self.n_out(),
                got: res.len(),
            });
        }

        for (slot, arg) in args.iter().enumerate() {
            let expected = self.sparsity_in(slot).map_or(0, |sp| sp.nnz());
            if arg.len() != expected {
                warn!(function = self.name(), slot, expected, got = arg.len(), "wrong input dimension");
                return Err(ConstraintError::InvalidInputDimension {
                    slot,
                    expected,
                    got: arg.len(),
                });
            }
        }

        for (slot, out) in res.iter().enumerate() {
            let expected = self.sparsity_out(slot).map_or(0, |sp| sp.nnz());
            if let Some(buf) = out {
                if buf.len() != expected {
                    warn!(function = self.name(), slot, expected, got = buf.len(), "wrong output dimension");
                    return Err(ConstraintError::InvalidOutputDimension {
                        slot,
                        expected,
                        got: buf.len(),
                    });
                }
            }
        }

        self.eval(args, res);
        Ok(())
    }
}
