use crate::format::Kind;
use std::fmt::Debug;

#[derive(Clone, PartialEq)]
pub enum Error {
    /// Something went wrong when trying to construct an interval, for example
    /// because the bounds are NaN or out of order.
    InvalidInterval,
    /// A value that must not be NaN was NaN.
    ContainsNaN,
    /// The value cannot be represented exactly in the target format.
    NotRepresentable(f64),
    /// A mismatch between two dimensions, for example, when multiplying
    /// matrices. Dimensions are (rows, cols).
    DimensionMismatch((usize, usize), (usize, usize)),
    /// Vectors must have 2, 3 or 4 elements and matrices must have between 2
    /// and 4 rows and columns.
    InvalidDimensions,
    /// Intervals of different floating point formats were combined.
    KindMismatch(Kind, Kind),
}

impl Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Error::*;
        match self {
            InvalidInterval => write!(f, "InvalidInterval"),
            ContainsNaN => write!(f, "ContainsNaN"),
            NotRepresentable(val) => f.debug_tuple("NotRepresentable").field(val).finish(),
            DimensionMismatch(a, b) => f
                .debug_tuple("DimensionMismatch")
                .field(a)
                .field(b)
                .finish(),
            InvalidDimensions => write!(f, "InvalidDimensions"),
            KindMismatch(expected, actual) => f
                .debug_tuple("KindMismatch")
                .field(expected)
                .field(actual)
                .finish(),
        }
    }
}
