#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// # Precision model
/// the two-regime precision model: a fixed double regime (16 decimal digits)
/// and an unbounded multiple regime carried by the precision-tagged CmplxMP
/// scalar; precision is always an explicit parameter, never ambient state
///# Example#
/// ```
/// use homotopy_kernel::tracking::precision::CmplxMP;
/// use num_complex::Complex64;
/// let z = CmplxMP::from_c64(Complex64::new(3.0, 4.0), 30);
/// assert_eq!(z.precision(), 30);
/// assert!((z.norm().to_f64() - 5.0).abs() < 1e-14);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod precision;
///________________________________________________________________________________________________________________________________
/// # Adaptive-precision refinement
/// the endgame protocol that refines an approximate path sample to tolerance,
/// escalating precision at most once on failure and always restoring the
/// precision that was active on entry
/// ________________________________________________________________________________________________________________________________
pub mod amp_endgame;

#[cfg(test)]
mod amp_endgame_tests;
#[cfg(test)]
mod precision_tests;
