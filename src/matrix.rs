use crate::error::Error;

/**
Dense matrix stored in column major order. Element `(c, r)` is in column `c`
and row `r`. Dimensions are reported as (rows, cols).
*/
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    elems: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Copy> Matrix<T> {
    pub fn filled(cols: usize, rows: usize, value: T) -> Matrix<T> {
        Matrix {
            elems: vec![value; cols * rows],
            rows,
            cols,
        }
    }

    /// Create a matrix from a list of columns, which must all have the same
    /// length.
    pub fn from_cols<C: AsRef<[T]>>(columns: &[C]) -> Result<Matrix<T>, Error> {
        let rows = match columns.first() {
            Some(first) => first.as_ref().len(),
            None => return Err(Error::InvalidDimensions),
        };
        if rows == 0 {
            return Err(Error::InvalidDimensions);
        }
        let mut elems = Vec::with_capacity(rows * columns.len());
        for col in columns {
            let col = col.as_ref();
            if col.len() != rows {
                return Err(Error::DimensionMismatch((rows, 1), (col.len(), 1)));
            }
            elems.extend_from_slice(col);
        }
        Ok(Matrix {
            elems,
            rows,
            cols: columns.len(),
        })
    }

    /// Create a matrix from column major elements.
    pub fn from_flat(cols: usize, rows: usize, elems: Vec<T>) -> Result<Matrix<T>, Error> {
        if cols == 0 || rows == 0 {
            return Err(Error::InvalidDimensions);
        }
        if elems.len() != cols * rows {
            return Err(Error::DimensionMismatch((rows, cols), (elems.len(), 1)));
        }
        Ok(Matrix { elems, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, col: usize, row: usize) -> T {
        self.elems[col * self.rows + row]
    }

    pub fn col(&self, c: usize) -> &[T] {
        &self.elems[(c * self.rows)..((c + 1) * self.rows)]
    }

    pub fn columns(&self) -> impl Iterator<Item = &[T]> {
        self.elems.chunks(self.rows)
    }

    /// Elements in column major order.
    pub fn elems(&self) -> &[T] {
        &self.elems
    }

    /// A matrix of the same shape holding `elems`, in column major order.
    pub fn with_elems<U>(&self, elems: Vec<U>) -> Matrix<U> {
        assert_eq!(elems.len(), self.elems.len(), "Wrong number of elements");
        Matrix {
            elems,
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(&self, f: F) -> Matrix<U> {
        Matrix {
            elems: self.elems.iter().copied().map(f).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn transpose(&self) -> Matrix<T> {
        let mut elems = Vec::with_capacity(self.elems.len());
        for r in 0..self.rows {
            for c in 0..self.cols {
                elems.push(self.get(c, r));
            }
        }
        Matrix {
            elems,
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// The matrix with column `col` and row `row` removed.
    pub fn minor(&self, col: usize, row: usize) -> Matrix<T> {
        assert!(self.rows > 1 && self.cols > 1, "Matrix is too small to have a minor");
        let mut elems = Vec::with_capacity((self.rows - 1) * (self.cols - 1));
        for c in (0..self.cols).filter(|c| *c != col) {
            for r in (0..self.rows).filter(|r| *r != row) {
                elems.push(self.get(c, r));
            }
        }
        Matrix {
            elems,
            rows: self.rows - 1,
            cols: self.cols - 1,
        }
    }
}
