/// Dense row-major matrix of `f64` values.
///
/// Used for per-group sample blocks (rows = samples, columns = horizons),
/// dependence templates, training targets, and weight matrices
/// (rows = query instances, columns = training instances).
///
/// # Examples
///
/// ```
/// use schaake_stats::matrix::Matrix;
///
/// let m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
/// assert_eq!(m.n_rows(), 3);
/// assert_eq!(m.n_cols(), 2);
/// assert_eq!(m.row(1), &[3.0, 4.0]);
/// assert_eq!(m.column(1).collect::<Vec<_>>(), [2.0, 4.0, 6.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    n_rows: usize,
    n_cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a matrix filled with zeros.
    #[must_use]
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            data: vec![0.0; n_rows * n_cols],
        }
    }

    /// Creates a matrix from row-major data.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != n_rows * n_cols`.
    #[must_use]
    pub fn from_row_major(n_rows: usize, n_cols: usize, data: Vec<f64>) -> Self {
        assert_eq!(
            data.len(),
            n_rows * n_cols,
            "data length must equal n_rows * n_cols"
        );
        Self {
            n_rows,
            n_cols,
            data,
        }
    }

    /// Creates a matrix from a slice of equally long rows.
    ///
    /// An empty slice yields a `0 × 0` matrix.
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    #[must_use]
    pub fn from_rows<R>(rows: &[R]) -> Self
    where
        R: AsRef<[f64]>,
    {
        let n_cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * n_cols);
        for row in rows {
            let row = row.as_ref();
            assert_eq!(row.len(), n_cols, "all rows must have the same length");
            data.extend_from_slice(row);
        }
        Self {
            n_rows: rows.len(),
            n_cols,
            data,
        }
    }

    /// Creates a matrix by evaluating `f(row, col)` for every cell.
    pub fn from_fn<F>(n_rows: usize, n_cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for r in 0..n_rows {
            for c in 0..n_cols {
                data.push(f(r, c));
            }
        }
        Self {
            n_rows,
            n_cols,
            data,
        }
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the value at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.n_rows && col < self.n_cols, "index out of bounds");
        self.data[row * self.n_cols + col]
    }

    /// Sets the value at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.n_rows && col < self.n_cols, "index out of bounds");
        self.data[row * self.n_cols + col] = value;
    }

    /// Returns one row as a slice.
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.n_cols;
        &self.data[start..start + self.n_cols]
    }

    /// Returns an iterator over all rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.n_rows).map(|r| self.row(r))
    }

    /// Returns an iterator over one column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        assert!(col < self.n_cols, "column index out of bounds");
        self.data.iter().skip(col).step_by(self.n_cols).copied()
    }

    /// Builds a new matrix from the given rows of `self`, in the given order.
    ///
    /// Indices may repeat, which is how templates are drawn with replacement.
    #[must_use]
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.n_cols);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Self {
            n_rows: indices.len(),
            n_cols: self.n_cols,
            data,
        }
    }

    /// Returns the underlying row-major storage.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_and_access() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.get(1, 2), 6.0);
        assert_eq!(m.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(m.column(1).collect::<Vec<_>>(), [2.0, 5.0]);
    }

    #[test]
    fn test_empty_rows() {
        let rows: [[f64; 2]; 0] = [];
        let m = Matrix::from_rows(&rows);
        assert_eq!(m.shape(), (0, 0));
        assert!(m.is_empty());
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_ragged_rows_panic() {
        let _ = Matrix::from_rows(&[vec![1.0], vec![2.0, 3.0]]);
    }

    #[test]
    fn test_select_rows_with_repeats() {
        let m = Matrix::from_rows(&[[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]]);
        let selected = m.select_rows(&[2, 0, 2]);
        assert_eq!(
            selected,
            Matrix::from_rows(&[[3.0, 30.0], [1.0, 10.0], [3.0, 30.0]])
        );
    }

    #[test]
    fn test_from_fn_and_set() {
        let mut m = Matrix::from_fn(2, 2, |r, c| (r * 10 + c) as f64);
        assert_eq!(m.as_slice(), &[0.0, 1.0, 10.0, 11.0]);
        m.set(0, 1, -1.0);
        assert_eq!(m.get(0, 1), -1.0);
    }
}
