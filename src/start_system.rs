#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// # Total-degree start system
/// builds the auxiliary system `x_i^{d_i} - r_i = 0` for a square polynomial
/// target system and enumerates all of its product-of-degrees start points
/// through mixed-radix index decoding
/// ________________________________________________________________________________________________________________________________
pub mod total_degree;
