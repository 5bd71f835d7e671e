//! # Precision Model Module
//!
//! Two numeric regimes drive the continuation kernel: a fixed double regime
//! at [`DOUBLE_PRECISION`] decimal digits, and a multiple regime carried by
//! the precision-tagged [`CmplxMP`] scalar. The tag is the protocol-level
//! precision of the value; changing it (`set_precision`) reinterprets the
//! stored digits verbatim and always succeeds, in both directions.
//!
//! ## Main Structures and Methods
//!
//! ### `CmplxMP` Struct
//! Multiple-precision complex scalar backed by `num_bigfloat::BigFloat`:
//! - construction: `from_c64`, `from_polar`, `zero`, `one`
//! - precision tag: `precision`, `set_precision`, `at_precision`
//! - arithmetic: `+ - * /`, unary `-`, `norm`, `exp`, `ln`, `sqrt`, `pow`,
//!   `powi`, `arg`
//!
//! ### Free functions
//! - `ensure_at_precision_d` - the double regime admits exactly one precision
//! - `ensure_at_precision_mp` / `ensure_vec_at_precision_mp` - retag, always
//!   succeed
//! - `ensure_at_uniform_precision` - raise a sample/time pair to a shared
//!   precision
//! - `precision_of_vec` - the shared precision of a uniform vector

use nalgebra::DVector;
use num_bigfloat::BigFloat;
use num_complex::Complex64;
use std::fmt;

/// Decimal digits of the fixed double regime.
pub const DOUBLE_PRECISION: u32 = 16;

/// Knobs of the precision-escalation ladder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecisionConfig {
    /// first precision tier of the multiple regime
    pub lowest_multiple_precision: u32,
    /// digits added per escalation step
    pub precision_increment: u32,
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        PrecisionConfig {
            lowest_multiple_precision: 20,
            precision_increment: 10,
        }
    }
}

/// Error type for precision contract violations.
#[derive(Debug, Clone, PartialEq)]
pub enum PrecisionError {
    /// a fixed-precision double value was asked to be at a non-native precision
    NonNativeDoublePrecision { requested: u32 },
}

impl fmt::Display for PrecisionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PrecisionError::NonNativeDoublePrecision { requested } => write!(
                f,
                "cannot put a double-precision value at precision {}, only {} is native",
                requested, DOUBLE_PRECISION
            ),
        }
    }
}

impl std::error::Error for PrecisionError {}

/// Precision-tagged multiple-precision complex scalar.
///
/// The backing `BigFloat` carries a fixed internal mantissa wide enough for
/// every precision tier this kernel escalates through; the `prec` tag is the
/// protocol-level precision the value is considered to be at. Promotion and
/// demotion therefore never lose the stored digits and always succeed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CmplxMP {
    pub re: BigFloat,
    pub im: BigFloat,
    prec: u32,
}

impl CmplxMP {
    pub fn new(re: BigFloat, im: BigFloat, precision: u32) -> Self {
        assert!(precision >= 2, "precision must be at least 2");
        CmplxMP {
            re,
            im,
            prec: precision,
        }
    }

    /// Promotes a double-precision complex value verbatim.
    pub fn from_c64(val: Complex64, precision: u32) -> Self {
        CmplxMP::new(
            BigFloat::from_f64(val.re),
            BigFloat::from_f64(val.im),
            precision,
        )
    }

    /// Demotes to double precision (rounding to the nearest double).
    pub fn to_c64(&self) -> Complex64 {
        Complex64::new(self.re.to_f64(), self.im.to_f64())
    }

    /// `r * e^(i*theta)` at the given precision.
    pub fn from_polar(r: BigFloat, theta: BigFloat, precision: u32) -> Self {
        CmplxMP::new(r * theta.cos(), r * theta.sin(), precision)
    }

    pub fn zero(precision: u32) -> Self {
        CmplxMP::new(num_bigfloat::ZERO, num_bigfloat::ZERO, precision)
    }

    pub fn one(precision: u32) -> Self {
        CmplxMP::new(num_bigfloat::ONE, num_bigfloat::ZERO, precision)
    }

    /// The protocol-level precision tag of this value.
    pub fn precision(&self) -> u32 {
        self.prec
    }

    /// Retags the value at a new precision, keeping the digits verbatim.
    /// Defined to succeed in both directions.
    pub fn set_precision(&mut self, precision: u32) {
        assert!(precision >= 2, "precision must be at least 2");
        self.prec = precision;
    }

    /// Copy of the value retagged at a new precision.
    pub fn at_precision(&self, precision: u32) -> Self {
        let mut out = *self;
        out.set_precision(precision);
        out
    }

    /// Euclidean norm |z|.
    pub fn norm(&self) -> BigFloat {
        (self.re * self.re + self.im * self.im).sqrt()
    }

    /// Argument of z in (-pi, pi].
    pub fn arg(&self) -> BigFloat {
        atan2_mp(self.im, self.re)
    }

    pub fn exp(&self) -> Self {
        let r = self.re.exp();
        CmplxMP::new(r * self.im.cos(), r * self.im.sin(), self.prec)
    }

    pub fn ln(&self) -> Self {
        CmplxMP::new(self.norm().ln(), self.arg(), self.prec)
    }

    pub fn sqrt(&self) -> Self {
        let half = BigFloat::from_f64(0.5);
        CmplxMP::from_polar(self.norm().sqrt(), self.arg() * half, self.prec)
    }

    /// General complex power `z^w` as `exp(w * ln(z))`; `0^w` is defined as 0.
    pub fn pow(&self, exponent: &CmplxMP) -> Self {
        if self.re == num_bigfloat::ZERO && self.im == num_bigfloat::ZERO {
            return CmplxMP::zero(self.prec);
        }
        (*exponent * self.ln()).exp()
    }

    /// Integer power by binary exponentiation.
    pub fn powi(&self, n: i32) -> Self {
        if n == 0 {
            return CmplxMP::one(self.prec);
        }
        let mut base = if n < 0 { self.recip() } else { *self };
        let mut exp = n.unsigned_abs();
        let mut acc = CmplxMP::one(self.prec);
        while exp > 0 {
            if exp & 1 == 1 {
                acc = acc * base;
            }
            base = base * base;
            exp >>= 1;
        }
        acc
    }

    /// Multiplicative inverse 1/z.
    pub fn recip(&self) -> Self {
        let denom = self.re * self.re + self.im * self.im;
        CmplxMP::new(self.re / denom, -self.im / denom, self.prec)
    }
}

impl fmt::Display for CmplxMP {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}+{}i @ {})", self.re, self.im, self.prec)
    }
}

impl std::ops::Add for CmplxMP {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        CmplxMP::new(self.re + rhs.re, self.im + rhs.im, self.prec)
    }
}

impl std::ops::Sub for CmplxMP {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        CmplxMP::new(self.re - rhs.re, self.im - rhs.im, self.prec)
    }
}

impl std::ops::Mul for CmplxMP {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        CmplxMP::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
            self.prec,
        )
    }
}

impl std::ops::Div for CmplxMP {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        let denom = rhs.re * rhs.re + rhs.im * rhs.im;
        CmplxMP::new(
            (self.re * rhs.re + self.im * rhs.im) / denom,
            (self.im * rhs.re - self.re * rhs.im) / denom,
            self.prec,
        )
    }
}

impl std::ops::Neg for CmplxMP {
    type Output = Self;

    fn neg(self) -> Self::Output {
        CmplxMP::new(-self.re, -self.im, self.prec)
    }
}

/// atan2 built from the one-argument arctangent.
fn atan2_mp(y: BigFloat, x: BigFloat) -> BigFloat {
    let zero = num_bigfloat::ZERO;
    if x > zero {
        (y / x).atan()
    } else if x < zero {
        if y >= zero {
            (y / x).atan() + num_bigfloat::PI
        } else {
            (y / x).atan() - num_bigfloat::PI
        }
    } else if y > zero {
        num_bigfloat::PI * BigFloat::from_f64(0.5)
    } else if y < zero {
        -num_bigfloat::PI * BigFloat::from_f64(0.5)
    } else {
        zero
    }
}

/// The double regime admits exactly one precision.
pub fn ensure_at_precision_d(
    _value: &Complex64,
    precision: u32,
) -> Result<(), PrecisionError> {
    if precision == DOUBLE_PRECISION {
        Ok(())
    } else {
        Err(PrecisionError::NonNativeDoublePrecision {
            requested: precision,
        })
    }
}

/// Retags a multiple-precision value; always succeeds.
pub fn ensure_at_precision_mp(value: &mut CmplxMP, precision: u32) {
    value.set_precision(precision);
}

/// Retags every entry of a multiple-precision vector.
pub fn ensure_vec_at_precision_mp(values: &mut DVector<CmplxMP>, precision: u32) {
    for value in values.iter_mut() {
        value.set_precision(precision);
    }
}

/// Raises the sample and its time value to the maximum precision present
/// among them and returns that precision.
pub fn ensure_at_uniform_precision(sample: &mut DVector<CmplxMP>, time: &mut CmplxMP) -> u32 {
    let mut max_precision = time.precision();
    for coordinate in sample.iter() {
        max_precision = max_precision.max(coordinate.precision());
    }
    time.set_precision(max_precision);
    ensure_vec_at_precision_mp(sample, max_precision);
    max_precision
}

/// The shared precision of a uniform-precision vector.
///
/// # Panics
/// When the vector is empty or its entries disagree on precision.
pub fn precision_of_vec(values: &DVector<CmplxMP>) -> u32 {
    assert!(!values.is_empty(), "precision of an empty vector is undefined");
    let precision = values[0].precision();
    assert!(
        values.iter().all(|v| v.precision() == precision),
        "vector entries must share one precision"
    );
    precision
}
