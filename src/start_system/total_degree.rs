//! # Total-Degree Start System Module
//!
//! Construction of the total-degree start system for a square polynomial
//! target system, and structured enumeration of its start points.
//!
//! The start system has one equation `x_i^{d_i} - r_i = 0` per target
//! function, where `d_i` is the target function's degree and `r_i` a random
//! complex seed drawn at construction. Its solution set is the full grid of
//! rotated radicals: coordinate `i` of start point `k` is
//! `exp(2*pi*I*digit_i/d_i) * r_i^(1/d_i)` with `digit_i` the `i`-th
//! mixed-radix digit of `k` over the degree sequence. The number of start
//! points is the product of the degrees, the Bezout count of the target.
//!
//! ## Main Structures and Methods
//!
//! ### `PolySystem` Trait
//! The seam to the externally owned polynomial-system container; the start
//! system only needs its shape queries, degrees, variable names and patch
//! coefficients.
//!
//! ### `TotalDegree` Struct
//! - `new` - construction with fatal sanity checks
//! - `num_start_points` - the Bezout count
//! - `generate_start_point_d` / `generate_start_point_mp` - decode one index
//!   into a start point, in either numeric regime
//!
//! Construction-time sanity failures (`StartSystemError`) abort construction;
//! there is nothing to recover.

use crate::symbolic::expr_tree::Expr;
use crate::tracking::precision::CmplxMP;
use log::info;
use nalgebra::DVector;
use num_bigfloat::BigFloat;
use num_complex::Complex64;
use rand::Rng;
use std::fmt;

/// Shape and content queries of the externally owned polynomial system.
pub trait PolySystem {
    /// Per-function total degrees.
    fn degrees(&self) -> Vec<u64>;
    fn num_variables(&self) -> usize;
    fn num_total_functions(&self) -> usize;
    fn num_hom_variable_groups(&self) -> usize;
    fn num_variable_groups(&self) -> usize;
    fn is_polynomial(&self) -> bool;
    fn have_path_variable(&self) -> bool;
    fn is_homogeneous(&self) -> bool;
    fn is_patched(&self) -> bool;
    /// Names of the single affine variable group, in coordinate order.
    fn variable_names(&self) -> Vec<String>;
    /// Patch coefficients `p_j` of `sum p_j x_j = 1`; empty when unpatched.
    fn patch_coefficients(&self) -> Vec<Complex64>;
}

/// Fatal construction-time rejections of the target system's shape.
#[derive(Debug, Clone, PartialEq)]
pub enum StartSystemError {
    HomogeneousVariableGroupPresent,
    NonSquareSystem { functions: usize, variables: usize },
    PathVariableAlreadyDeclared,
    MultipleAffineVariableGroups { groups: usize },
    NonPolynomialSystem,
}

impl fmt::Display for StartSystemError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StartSystemError::HomogeneousVariableGroupPresent => write!(
                f,
                "cannot build a total-degree start system for a system with homogeneous variable groups"
            ),
            StartSystemError::NonSquareSystem {
                functions,
                variables,
            } => write!(
                f,
                "total-degree start systems require a square target, got {} functions and {} variables",
                functions, variables
            ),
            StartSystemError::PathVariableAlreadyDeclared => write!(
                f,
                "target system already declares a path variable"
            ),
            StartSystemError::MultipleAffineVariableGroups { groups } => write!(
                f,
                "total-degree start systems support exactly one affine variable group, got {}",
                groups
            ),
            StartSystemError::NonPolynomialSystem => {
                write!(f, "target system is not polynomial")
            }
        }
    }
}

impl std::error::Error for StartSystemError {}

/// The total-degree start system for one square polynomial target.
pub struct TotalDegree {
    degrees: Vec<u64>,
    random_seeds: Vec<Complex64>,
    variable_names: Vec<String>,
    functions: Vec<Expr>,
    patched: bool,
    patch_coefficients: Vec<Complex64>,
}

/// Homogenizing-variable name used when the target system is homogeneous.
const HOM_VAR_NAME: &str = "HOM_VAR_0";

impl TotalDegree {
    /// Builds the start system for a target, running the sanity checks,
    /// drawing one random seed per function and generating the defining
    /// equations `x_i^{d_i} - r_i`.
    pub fn new(system: &impl PolySystem) -> Result<TotalDegree, StartSystemError> {
        Self::sanity_checks(system)?;

        let degrees = system.degrees();
        let variable_names = system.variable_names();
        let mut rng = rand::rng();
        let random_seeds: Vec<Complex64> = (0..degrees.len())
            .map(|_| {
                Complex64::new(
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                )
            })
            .collect();

        let mut functions = Vec::with_capacity(degrees.len());
        for ((name, degree), seed) in variable_names
            .iter()
            .zip(degrees.iter())
            .zip(random_seeds.iter())
        {
            functions.push(Expr::var(name).ipow(*degree as i32) - Expr::Num(*seed));
        }

        if system.is_homogeneous() {
            for function in functions.iter_mut() {
                // start equations are polynomial by construction
                function
                    .homogenize(&variable_names, HOM_VAR_NAME)
                    .unwrap_or_else(|e| {
                        panic!("start system equation failed to homogenize: {}", e)
                    });
            }
        }

        let patched = system.is_patched();
        let patch_coefficients = if patched {
            system.patch_coefficients()
        } else {
            Vec::new()
        };

        info!(
            "total-degree start system built: {} functions, {} start points",
            functions.len(),
            degrees.iter().product::<u64>()
        );

        Ok(TotalDegree {
            degrees,
            random_seeds,
            variable_names,
            functions,
            patched,
            patch_coefficients,
        })
    }

    fn sanity_checks(system: &impl PolySystem) -> Result<(), StartSystemError> {
        if system.num_hom_variable_groups() > 0 {
            return Err(StartSystemError::HomogeneousVariableGroupPresent);
        }
        if system.num_total_functions() != system.num_variables() {
            return Err(StartSystemError::NonSquareSystem {
                functions: system.num_total_functions(),
                variables: system.num_variables(),
            });
        }
        if system.have_path_variable() {
            return Err(StartSystemError::PathVariableAlreadyDeclared);
        }
        if system.num_variable_groups() != 1 {
            return Err(StartSystemError::MultipleAffineVariableGroups {
                groups: system.num_variable_groups(),
            });
        }
        if !system.is_polynomial() {
            return Err(StartSystemError::NonPolynomialSystem);
        }
        Ok(())
    }

    /// The defining equations as expression trees.
    pub fn functions(&self) -> &[Expr] {
        &self.functions
    }

    pub fn degrees(&self) -> &[u64] {
        &self.degrees
    }

    pub fn random_seeds(&self) -> &[Complex64] {
        &self.random_seeds
    }

    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    /// The Bezout count: product of the target degrees.
    pub fn num_start_points(&self) -> u64 {
        self.degrees.iter().product()
    }

    /// Decodes a start point index into one coordinate per function, in
    /// double precision.
    ///
    /// Patched systems get a fixed leading `1` coordinate followed by the
    /// natural coordinates, then the whole point is rescaled to satisfy
    /// `sum p_j x_j = 1`.
    ///
    /// # Panics
    /// When `index >= num_start_points()`.
    pub fn generate_start_point_d(&self, index: u64) -> DVector<Complex64> {
        let subscripts = index_to_subscript(index, &self.degrees);

        let offset = if self.patched { 1 } else { 0 };
        let mut point =
            DVector::from_element(self.degrees.len() + offset, Complex64::new(0.0, 0.0));
        if self.patched {
            point[0] = Complex64::new(1.0, 0.0);
        }

        for (ii, (digit, degree)) in subscripts.iter().zip(self.degrees.iter()).enumerate() {
            let angle = 2.0 * std::f64::consts::PI * (*digit as f64) / (*degree as f64);
            let root_of_unity = Complex64::new(0.0, angle).exp();
            let radical = self.random_seeds[ii].powf(1.0 / (*degree as f64));
            point[ii + offset] = root_of_unity * radical;
        }

        if self.patched {
            let mut patch_value = Complex64::new(0.0, 0.0);
            for (coefficient, coordinate) in self.patch_coefficients.iter().zip(point.iter()) {
                patch_value += coefficient * coordinate;
            }
            point /= patch_value;
        }
        point
    }

    /// Decodes a start point index at an explicit multiple precision.
    ///
    /// # Panics
    /// When `index >= num_start_points()`.
    pub fn generate_start_point_mp(&self, index: u64, precision: u32) -> DVector<CmplxMP> {
        let subscripts = index_to_subscript(index, &self.degrees);

        let offset = if self.patched { 1 } else { 0 };
        let mut point = DVector::from_element(
            self.degrees.len() + offset,
            CmplxMP::zero(precision),
        );
        if self.patched {
            point[0] = CmplxMP::one(precision);
        }

        let two = BigFloat::from_f64(2.0);
        for (ii, (digit, degree)) in subscripts.iter().zip(self.degrees.iter()).enumerate() {
            let angle = two * num_bigfloat::PI * BigFloat::from_f64(*digit as f64)
                / BigFloat::from_f64(*degree as f64);
            let root_of_unity = CmplxMP::from_polar(num_bigfloat::ONE, angle, precision);
            let radical = CmplxMP::from_c64(self.random_seeds[ii], precision).pow(
                &CmplxMP::from_c64(Complex64::new(1.0 / (*degree as f64), 0.0), precision),
            );
            point[ii + offset] = root_of_unity * radical;
        }

        if self.patched {
            let mut patch_value = CmplxMP::zero(precision);
            for (coefficient, coordinate) in self.patch_coefficients.iter().zip(point.iter()) {
                patch_value = patch_value + CmplxMP::from_c64(*coefficient, precision) * *coordinate;
            }
            for coordinate in point.iter_mut() {
                *coordinate = *coordinate / patch_value;
            }
        }
        point
    }
}

/// Mixed-radix decode of an index over a radix sequence, least significant
/// digit first: digit `i` ranges over `[0, radices[i])`.
///
/// # Panics
/// When `index >= product(radices)`.
pub fn index_to_subscript(index: u64, radices: &[u64]) -> Vec<u64> {
    let mut subscripts = Vec::with_capacity(radices.len());
    let mut remaining = index;
    for radix in radices.iter() {
        subscripts.push(remaining % radix);
        remaining /= radix;
    }
    assert_eq!(
        remaining, 0,
        "start point index {} out of range for radices {:?}",
        index, radices
    );
    subscripts
}
