use crate::{
    error::Error,
    format::Format,
    framework::{FpTraits, MatrixToMatrixOp},
    interval::Interval,
    matrix::Matrix,
};

/// Matrices have between 2 and 4 columns and rows.
fn check_dims(m: &Matrix<f64>) -> Result<(), Error> {
    if (2..=4).contains(&m.rows()) && (2..=4).contains(&m.cols()) {
        Ok(())
    } else {
        Err(Error::InvalidDimensions)
    }
}

fn check_same_dims(x: &Matrix<f64>, y: &Matrix<f64>) -> Result<(), Error> {
    check_dims(x)?;
    check_dims(y)?;
    if x.dims() != y.dims() {
        return Err(Error::DimensionMismatch(x.dims(), y.dims()));
    }
    Ok(())
}

impl<F: Format> FpTraits<F> {
    fn to_matrix(m: &Matrix<f64>) -> Matrix<Interval> {
        m.map(|e| Self::to_interval(e))
    }

    pub fn addition_matrix(x: &Matrix<f64>, y: &Matrix<f64>) -> Result<Matrix<Interval>, Error> {
        check_same_dims(x, y)?;
        Ok(Self::run_pair_matrix_component_wise(
            &Self::to_matrix(x),
            &Self::to_matrix(y),
            &Self::addition_op(),
        ))
    }

    pub fn subtraction_matrix(
        x: &Matrix<f64>,
        y: &Matrix<f64>,
    ) -> Result<Matrix<Interval>, Error> {
        check_same_dims(x, y)?;
        Ok(Self::run_pair_matrix_component_wise(
            &Self::to_matrix(x),
            &Self::to_matrix(y),
            &Self::subtraction_op(),
        ))
    }

    /// Every element multiplied by `s`. Each product is rounded and flushed
    /// on its own, a non-finite element does not widen the others.
    pub fn multiplication_matrix_scalar(
        m: &Matrix<f64>,
        s: f64,
    ) -> Result<Matrix<Interval>, Error> {
        check_dims(m)?;
        let op = Self::multiplication_op();
        Ok(m.map(|e| (op.imp)(e, s)))
    }

    pub fn multiplication_scalar_matrix(
        s: f64,
        m: &Matrix<f64>,
    ) -> Result<Matrix<Interval>, Error> {
        Self::multiplication_matrix_scalar(m, s)
    }

    /// Each element of the product is the dot product of a row of `x` with a
    /// column of `y`.
    pub fn multiplication_matrix_matrix(
        x: &Matrix<f64>,
        y: &Matrix<f64>,
    ) -> Result<Matrix<Interval>, Error> {
        check_dims(x)?;
        check_dims(y)?;
        if x.cols() != y.rows() {
            return Err(Error::DimensionMismatch(x.dims(), y.dims()));
        }
        let rows = Self::to_matrix(&x.transpose());
        let y = Self::to_matrix(y);
        let mut elems = Vec::with_capacity(y.cols() * rows.cols());
        for col in y.columns() {
            for row in rows.columns() {
                elems.push(Self::dot_intervals(row, col));
            }
        }
        Matrix::from_flat(y.cols(), x.rows(), elems)
    }

    pub fn multiplication_matrix_vector(
        x: &Matrix<f64>,
        y: &[f64],
    ) -> Result<Vec<Interval>, Error> {
        check_dims(x)?;
        if x.cols() != y.len() {
            return Err(Error::DimensionMismatch(x.dims(), (y.len(), 1)));
        }
        let y = Self::to_vector(y);
        Ok(Self::to_matrix(&x.transpose())
            .columns()
            .map(|row| Self::dot_intervals(row, &y))
            .collect())
    }

    pub fn multiplication_vector_matrix(
        x: &[f64],
        y: &Matrix<f64>,
    ) -> Result<Vec<Interval>, Error> {
        check_dims(y)?;
        if x.len() != y.rows() {
            return Err(Error::DimensionMismatch((1, x.len()), y.dims()));
        }
        let x = Self::to_vector(x);
        Ok(Self::to_matrix(y)
            .columns()
            .map(|col| Self::dot_intervals(&x, col))
            .collect())
    }

    pub fn transpose(m: &Matrix<f64>) -> Result<Matrix<Interval>, Error> {
        check_dims(m)?;
        let op = MatrixToMatrixOp::new(|m: &Matrix<f64>| {
            m.transpose().map(|e| Self::correctly_rounded(e))
        });
        Ok(Self::run_matrix_to_matrix(&Self::to_matrix(m), &op))
    }

    fn determinant_impl(m: &Matrix<f64>) -> Interval {
        if m.cols() == 2 {
            return Self::subtraction(
                Self::multiplication(m.get(0, 0), m.get(1, 1)),
                Self::multiplication(m.get(0, 1), m.get(1, 0)),
            );
        }
        // Cofactor expansion along the first column.
        let terms: Vec<Interval> = (0..m.rows())
            .map(|row| {
                let e = m.get(0, row);
                let e = if row % 2 == 0 { e } else { -e };
                Self::multiplication(e, Self::determinant_impl(&m.minor(0, row)))
            })
            .collect();
        Self::sum_all_orders(&terms)
    }

    /**
    Determinant of a square matrix. The 3x3 and 4x4 cases expand the first
    column into cofactors, and the cofactors are summed in every order.
    */
    pub fn determinant(m: &Matrix<f64>) -> Result<Interval, Error> {
        check_dims(m)?;
        if m.rows() != m.cols() {
            return Err(Error::InvalidDimensions);
        }
        Ok(Self::determinant_impl(m))
    }
}
