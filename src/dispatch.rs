use crate::{
    error::Error,
    format::{Abstract, F16, F32, Format, Kind},
    framework::FpTraits,
    interval::Interval,
    matrix::Matrix,
    scalar_ops::Modf,
};
use std::ops::Index;

pub type Unary = fn(f64) -> Interval;
pub type Binary = fn(f64, f64) -> Interval;
pub type Ternary = fn(f64, f64, f64) -> Interval;
pub type VectorShaped<T> = fn(&[f64]) -> Result<T, Error>;
pub type VectorPairShaped<T> = fn(&[f64], &[f64]) -> Result<T, Error>;
pub type MatrixPair = fn(&Matrix<f64>, &Matrix<f64>) -> Result<Matrix<Interval>, Error>;
pub type Unpack = fn(u32) -> Vec<Interval>;

/**
Every operation of one format as plain function pointers over raw doubles.
This is what the code generating test cases consumes when the format is only
known at run time, through [`FP`].
*/
#[derive(Copy, Clone)]
pub struct FpTable {
    pub kind: Kind,
    pub correctly_rounded: Unary,
    pub correctly_rounded_matrix: fn(&Matrix<f64>) -> Matrix<Interval>,
    pub absolute_error: Binary,
    pub ulp_error: Binary,
    // Scalar.
    pub abs: Unary,
    pub acos: Unary,
    pub acosh: [Unary; 2],
    pub asin: Unary,
    pub asinh: Unary,
    pub atan: Unary,
    pub atanh: Unary,
    pub ceil: Unary,
    pub cos: Unary,
    pub cosh: Unary,
    pub degrees: Unary,
    pub exp: Unary,
    pub exp2: Unary,
    pub floor: Unary,
    pub fract: Unary,
    pub inverse_sqrt: Unary,
    pub length: Unary,
    pub log: Unary,
    pub log2: Unary,
    pub modf: fn(f64) -> Modf,
    pub negation: Unary,
    pub quantize_to_f16: Unary,
    pub radians: Unary,
    pub round: Unary,
    pub saturate: Unary,
    pub sign: Unary,
    pub sin: Unary,
    pub sinh: Unary,
    pub sqrt: Unary,
    pub tan: Unary,
    pub tanh: Unary,
    pub trunc: Unary,
    // Binary.
    pub addition: Binary,
    pub atan2: Binary,
    pub distance: Binary,
    pub division: Binary,
    pub ldexp: Binary,
    pub max: Binary,
    pub min: Binary,
    pub multiplication: Binary,
    pub pow: Binary,
    pub remainder: Binary,
    pub step: Binary,
    pub subtraction: Binary,
    // Ternary.
    pub clamp: [Ternary; 2],
    pub fma: Ternary,
    pub mix: [Ternary; 2],
    pub smooth_step: Ternary,
    // Vector.
    pub cross: VectorPairShaped<Vec<Interval>>,
    pub distance_vector: VectorPairShaped<Interval>,
    pub dot: VectorPairShaped<Interval>,
    pub face_forward: fn(&[f64], &[f64], &[f64]) -> Result<Vec<Option<Vec<Interval>>>, Error>,
    pub length_vector: VectorShaped<Interval>,
    pub normalize: VectorShaped<Vec<Interval>>,
    pub reflect: VectorPairShaped<Vec<Interval>>,
    pub refract: fn(&[f64], &[f64], f64) -> Result<Vec<Interval>, Error>,
    // Matrix.
    pub addition_matrix: MatrixPair,
    pub subtraction_matrix: MatrixPair,
    pub multiplication_matrix_matrix: MatrixPair,
    pub multiplication_matrix_scalar: fn(&Matrix<f64>, f64) -> Result<Matrix<Interval>, Error>,
    pub multiplication_scalar_matrix: fn(f64, &Matrix<f64>) -> Result<Matrix<Interval>, Error>,
    pub multiplication_matrix_vector: fn(&Matrix<f64>, &[f64]) -> Result<Vec<Interval>, Error>,
    pub multiplication_vector_matrix: fn(&[f64], &Matrix<f64>) -> Result<Vec<Interval>, Error>,
    pub transpose: fn(&Matrix<f64>) -> Result<Matrix<Interval>, Error>,
    pub determinant: fn(&Matrix<f64>) -> Result<Interval, Error>,
    // Packing.
    pub unpack2x16float: Unpack,
    pub unpack2x16snorm: Unpack,
    pub unpack2x16unorm: Unpack,
    pub unpack4x8snorm: Unpack,
    pub unpack4x8unorm: Unpack,
}

impl FpTable {
    pub const fn of<F: Format>() -> FpTable {
        FpTable {
            kind: F::KIND,
            correctly_rounded: FpTraits::<F>::correctly_rounded,
            correctly_rounded_matrix: FpTraits::<F>::correctly_rounded_matrix,
            absolute_error: FpTraits::<F>::absolute_error,
            ulp_error: FpTraits::<F>::ulp_error,
            abs: FpTraits::<F>::abs,
            acos: FpTraits::<F>::acos,
            acosh: [
                FpTraits::<F>::acosh_alternative,
                FpTraits::<F>::acosh_primary,
            ],
            asin: FpTraits::<F>::asin,
            asinh: FpTraits::<F>::asinh,
            atan: FpTraits::<F>::atan,
            atanh: FpTraits::<F>::atanh,
            ceil: FpTraits::<F>::ceil,
            cos: FpTraits::<F>::cos,
            cosh: FpTraits::<F>::cosh,
            degrees: FpTraits::<F>::degrees,
            exp: FpTraits::<F>::exp,
            exp2: FpTraits::<F>::exp2,
            floor: FpTraits::<F>::floor,
            fract: FpTraits::<F>::fract,
            inverse_sqrt: FpTraits::<F>::inverse_sqrt,
            length: FpTraits::<F>::length,
            log: FpTraits::<F>::log,
            log2: FpTraits::<F>::log2,
            modf: FpTraits::<F>::modf,
            negation: FpTraits::<F>::negation,
            quantize_to_f16: FpTraits::<F>::quantize_to_f16,
            radians: FpTraits::<F>::radians,
            round: FpTraits::<F>::round,
            saturate: FpTraits::<F>::saturate,
            sign: FpTraits::<F>::sign,
            sin: FpTraits::<F>::sin,
            sinh: FpTraits::<F>::sinh,
            sqrt: FpTraits::<F>::sqrt,
            tan: FpTraits::<F>::tan,
            tanh: FpTraits::<F>::tanh,
            trunc: FpTraits::<F>::trunc,
            addition: FpTraits::<F>::addition,
            atan2: FpTraits::<F>::atan2,
            distance: FpTraits::<F>::distance,
            division: FpTraits::<F>::division,
            ldexp: FpTraits::<F>::ldexp,
            max: FpTraits::<F>::max,
            min: FpTraits::<F>::min,
            multiplication: FpTraits::<F>::multiplication,
            pow: FpTraits::<F>::pow,
            remainder: FpTraits::<F>::remainder,
            step: FpTraits::<F>::step,
            subtraction: FpTraits::<F>::subtraction,
            clamp: [FpTraits::<F>::clamp_median, FpTraits::<F>::clamp_min_max],
            fma: FpTraits::<F>::fma,
            mix: [FpTraits::<F>::mix_imprecise, FpTraits::<F>::mix_precise],
            smooth_step: FpTraits::<F>::smooth_step,
            cross: FpTraits::<F>::cross,
            distance_vector: FpTraits::<F>::distance_vector,
            dot: FpTraits::<F>::dot,
            face_forward: FpTraits::<F>::face_forward,
            length_vector: FpTraits::<F>::length_vector,
            normalize: FpTraits::<F>::normalize,
            reflect: FpTraits::<F>::reflect,
            refract: FpTraits::<F>::refract,
            addition_matrix: FpTraits::<F>::addition_matrix,
            subtraction_matrix: FpTraits::<F>::subtraction_matrix,
            multiplication_matrix_matrix: FpTraits::<F>::multiplication_matrix_matrix,
            multiplication_matrix_scalar: FpTraits::<F>::multiplication_matrix_scalar,
            multiplication_scalar_matrix: FpTraits::<F>::multiplication_scalar_matrix,
            multiplication_matrix_vector: FpTraits::<F>::multiplication_matrix_vector,
            multiplication_vector_matrix: FpTraits::<F>::multiplication_vector_matrix,
            transpose: FpTraits::<F>::transpose,
            determinant: FpTraits::<F>::determinant,
            unpack2x16float: FpTraits::<F>::unpack2x16float,
            unpack2x16snorm: FpTraits::<F>::unpack2x16snorm,
            unpack2x16unorm: FpTraits::<F>::unpack2x16unorm,
            unpack4x8snorm: FpTraits::<F>::unpack4x8snorm,
            unpack4x8unorm: FpTraits::<F>::unpack4x8unorm,
        }
    }
}

/// One operation table per format, selected with a [`Kind`].
pub struct Dispatch {
    f32: FpTable,
    f16: FpTable,
    abstract_float: FpTable,
}

impl Index<Kind> for Dispatch {
    type Output = FpTable;

    fn index(&self, kind: Kind) -> &FpTable {
        match kind {
            Kind::F32 => &self.f32,
            Kind::F16 => &self.f16,
            Kind::Abstract => &self.abstract_float,
        }
    }
}

pub static FP: Dispatch = Dispatch {
    f32: FpTable::of::<F32>(),
    f16: FpTable::of::<F16>(),
    abstract_float: FpTable::of::<Abstract>(),
};
