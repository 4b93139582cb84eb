pub mod dispatch;
pub mod error;
pub mod format;
pub mod framework;
pub mod interval;
pub mod io;
pub mod matrix;
pub mod primitives;
pub mod scalar_ops;

mod binary_ops;
mod inari_interval;
mod macros;
mod matrix_ops;
mod unpack;
mod vec_ops;

#[cfg(test)]
mod test;

pub use dispatch::{FP, FpTable};
pub use error::Error;
pub use format::{Abstract, F16, F32, Format, Kind};
pub use framework::FpTraits;
pub use interval::{Interval, Operand};
pub use matrix::Matrix;
