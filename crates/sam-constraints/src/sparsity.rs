//! Compressed column sparsity descriptors
//!
//! CasADi describes the structure of every function input and output with a
//! single integer array:
//!
//! ```text
//! [nrow, ncol, colind[0..=ncol], row[0..nnz]]
//! ```
//!
//! `colind[j]..colind[j+1]` is the range of stored entries belonging to
//! column j and `row[k]` is the row of stored entry k. Values of a sparse
//! matrix are stored in the same column-major order.
//!
//! [`Sparsity`] wraps such an array as `'static` constant data so that the
//! same table serves both the Rust API and the C calling convention.

use std::os::raw::c_int;

/// Integer type of the CasADi calling convention (`casadi_int`)
pub type CasadiInt = c_int;

/// Compressed column storage pattern in CasADi layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sparsity(&'static [CasadiInt]);

impl Sparsity {
    /// Wrap a compressed CasADi sparsity array
    ///
    /// The array is not checked here; see [`Sparsity::is_well_formed`].
    pub const fn from_compressed(data: &'static [CasadiInt]) -> Self {
        Self(data)
    }

    /// The compressed array, exactly as handed to C callers
    pub fn as_compressed(&self) -> &'static [CasadiInt] {
        self.0
    }

    /// Pointer to the compressed array
    pub fn as_ptr(&self) -> *const CasadiInt {
        self.0.as_ptr()
    }

    pub fn nrow(&self) -> usize {
        self.0[0] as usize
    }

    pub fn ncol(&self) -> usize {
        self.0[1] as usize
    }

    /// Column pointers, `ncol + 1` entries
    pub fn colind(&self) -> &'static [CasadiInt] {
        let data: &'static [CasadiInt] = self.0;
        &data[2..3 + self.ncol()]
    }

    /// Row index of every stored entry
    pub fn row(&self) -> &'static [CasadiInt] {
        let data: &'static [CasadiInt] = self.0;
        &data[3 + self.ncol()..]
    }

    /// Number of structural non-zeros
    pub fn nnz(&self) -> usize {
        self.colind()[self.ncol()] as usize
    }

    /// Number of elements of the dense matrix
    pub fn numel(&self) -> usize {
        self.nrow() * self.ncol()
    }

    /// True if every element is stored
    pub fn is_dense(&self) -> bool {
        self.nnz() == self.numel()
    }

    /// True if the matrix has no elements at all (0x0, n×0 or 0×n)
    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// Storage position of element `(row, col)`, `None` for structural zeros
    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.nrow() || col >= self.ncol() {
            return None;
        }

        let colind = self.colind();
        let start = colind[col] as usize;
        let end = colind[col + 1] as usize;
        self.row()[start..end]
            .iter()
            .position(|&r| r as usize == row)
            .map(|offset| start + offset)
    }

    /// `(row, col)` of every stored entry, in storage order
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let colind = self.colind();
        let row = self.row();
        (0..self.ncol()).flat_map(move |col| {
            (colind[col] as usize..colind[col + 1] as usize).map(move |k| (row[k] as usize, col))
        })
    }

    /// Structural consistency of the compressed array
    ///
    /// Checks the array length, monotone column pointers starting at zero,
    /// and strictly increasing in-range row indices within each column.
    pub fn is_well_formed(&self) -> bool {
        let data = self.0;
        if data.len() < 3 || data[0] < 0 || data[1] < 0 {
            return false;
        }

        let ncol = self.ncol();
        if data.len() < 3 + ncol {
            return false;
        }

        let colind = self.colind();
        if colind[0] != 0 || colind.windows(2).any(|w| w[0] > w[1]) {
            return false;
        }

        let nnz = self.nnz();
        if data.len() != 3 + ncol + nnz {
            return false;
        }

        let row = self.row();
        (0..ncol).all(|col| {
            let rows = &row[colind[col] as usize..colind[col + 1] as usize];
            rows.iter().all(|&r| r >= 0 && (r as usize) < self.nrow())
                && rows.windows(2).all(|w| w[0] < w[1])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 3x2, entries (0,0), (2,0), (1,1)
    static SMALL: [CasadiInt; 8] = [3, 2, 0, 2, 3, 0, 2, 1];
    static DENSE_2X1: [CasadiInt; 6] = [2, 1, 0, 2, 0, 1];
    static EMPTY_0X0: [CasadiInt; 3] = [0, 0, 0];
    static EMPTY_4X0: [CasadiInt; 3] = [4, 0, 0];

    #[test]
    fn test_small_pattern_accessors() {
        let sp = Sparsity::from_compressed(&SMALL);

        assert_eq!(sp.nrow(), 3);
        assert_eq!(sp.ncol(), 2);
        assert_eq!(sp.nnz(), 3);
        assert_eq!(sp.colind(), &[0, 2, 3]);
        assert_eq!(sp.row(), &[0, 2, 1]);
        assert!(!sp.is_dense());
        assert!(!sp.is_empty());
        assert!(sp.is_well_formed());
    }

    #[test]
    fn test_index_of() {
        let sp = Sparsity::from_compressed(&SMALL);

        assert_eq!(sp.index_of(0, 0), Some(0));
        assert_eq!(sp.index_of(2, 0), Some(1));
        assert_eq!(sp.index_of(1, 1), Some(2));
        assert_eq!(sp.index_of(1, 0), None);
        assert_eq!(sp.index_of(3, 0), None);
        assert_eq!(sp.index_of(0, 2), None);
    }

    #[test]
    fn test_entries_in_storage_order() {
        let sp = Sparsity::from_compressed(&SMALL);
        let entries: Vec<_> = sp.entries().collect();

        assert_eq!(entries, vec![(0, 0), (2, 0), (1, 1)]);
    }

    #[test]
    fn test_dense_and_empty() {
        let dense = Sparsity::from_compressed(&DENSE_2X1);
        assert!(dense.is_dense());
        assert!(dense.is_well_formed());

        for empty in [Sparsity::from_compressed(&EMPTY_0X0), Sparsity::from_compressed(&EMPTY_4X0)] {
            assert!(empty.is_empty());
            assert_eq!(empty.nnz(), 0);
            assert!(empty.is_well_formed());
            assert_eq!(empty.entries().count(), 0);
        }
    }

    #[test]
    fn test_malformed_patterns() {
        static UNSORTED_ROWS: [CasadiInt; 6] = [3, 1, 0, 2, 2, 0];
        static ROW_OUT_OF_RANGE: [CasadiInt; 5] = [2, 1, 0, 1, 5];
        static WRONG_LENGTH: [CasadiInt; 6] = [2, 1, 0, 1, 0, 1];

        assert!(!Sparsity::from_compressed(&UNSORTED_ROWS).is_well_formed());
        assert!(!Sparsity::from_compressed(&ROW_OUT_OF_RANGE).is_well_formed());
        assert!(!Sparsity::from_compressed(&WRONG_LENGTH).is_well_formed());
    }
}
