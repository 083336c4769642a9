//! Sparse transposed Jacobian of the terminal constraint

use nalgebra::{SMatrix, Vector4};

use crate::sparsity::Sparsity;
use crate::terminal::{pattern, NH, NNZ_JAC, NX};

/// Non-zeros of `(∂h_e/∂x)ᵀ` in the storage order of [`pattern::JACOBIAN`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparseJacobian {
    values: [f64; NNZ_JAC],
}

impl SparseJacobian {
    pub fn from_values(values: [f64; NNZ_JAC]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64; NNZ_JAC] {
        &self.values
    }

    pub fn sparsity(&self) -> Sparsity {
        pattern::JACOBIAN
    }

    /// `∂h[residual_idx]/∂x[state_idx]`, zero outside the pattern
    pub fn get(&self, state_idx: usize, residual_idx: usize) -> f64 {
        pattern::JACOBIAN
            .index_of(state_idx, residual_idx)
            .map_or(0.0, |k| self.values[k])
    }

    /// Derivatives of bow row `k` (h[3+k]) with respect to `[q0, q1, q2, q3]`
    pub fn quaternion_row(&self, k: usize) -> Vector4<f64> {
        Vector4::from_fn(|j, _| self.get(3 + j, 3 + k))
    }

    /// Dense transposed Jacobian, 19x6
    pub fn to_dense(&self) -> SMatrix<f64, NX, NH> {
        let mut dense = SMatrix::<f64, NX, NH>::zeros();
        for ((row, col), value) in pattern::JACOBIAN.entries().zip(self.values) {
            dense[(row, col)] = value;
        }
        dense
    }

    /// Dense Jacobian `∂h_e/∂x`, 6x19
    pub fn jacobian(&self) -> SMatrix<f64, NH, NX> {
        self.to_dense().transpose()
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

impl From<SparseJacobian> for [f64; NNZ_JAC] {
    fn from(jac: SparseJacobian) -> Self {
        jac.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered() -> SparseJacobian {
        let mut values = [0.0; NNZ_JAC];
        for (k, v) in values.iter_mut().enumerate() {
            *v = (k + 1) as f64;
        }
        SparseJacobian::from_values(values)
    }

    #[test]
    fn test_get_follows_storage_order() {
        let jac = numbered();

        assert_eq!(jac.get(0, 0), 1.0);
        assert_eq!(jac.get(2, 2), 3.0);
        assert_eq!(jac.get(0, 3), 4.0);
        assert_eq!(jac.get(6, 3), 8.0);
        assert_eq!(jac.get(1, 4), 9.0);
        assert_eq!(jac.get(3, 5), 15.0);
        assert_eq!(jac.get(6, 5), 18.0);
        assert_eq!(jac.get(7, 3), 0.0);
        assert_eq!(jac.get(1, 0), 0.0);
    }

    #[test]
    fn test_dense_layouts() {
        let jac = numbered();
        let dense = jac.to_dense();
        let full = jac.jacobian();

        assert_eq!(dense.iter().filter(|v| **v != 0.0).count(), NNZ_JAC);
        for row in 0..NX {
            for col in 0..NH {
                assert_eq!(dense[(row, col)], jac.get(row, col));
                assert_eq!(full[(col, row)], dense[(row, col)]);
            }
        }
    }

    #[test]
    fn test_quaternion_row() {
        let jac = numbered();

        assert_eq!(jac.quaternion_row(0), Vector4::new(5.0, 6.0, 7.0, 8.0));
        assert_eq!(jac.quaternion_row(2), Vector4::new(15.0, 16.0, 17.0, 18.0));
    }
}
