#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// # Expression tree
/// the core symbolic representation of the polynomial (and not-quite-polynomial)
/// functions tracked by the continuation engine
/// 1) builds expression trees from factory constructors and operator overloads
/// 2) evaluates a tree freshly in double precision or in multiple precision at an explicit precision
/// 3) folds constant subtrees for the simplifier's exact zero/one tests
///# Example#
/// ```
/// use homotopy_kernel::symbolic::expr_tree::Expr;
/// use std::collections::HashMap;
/// use num_complex::Complex64;
/// let x = Expr::Var("x".to_string());
/// let f = x.clone().ipow(3) - Expr::Num(Complex64::new(1.0, 0.0));
/// let mut vals = HashMap::new();
/// vals.insert("x".to_string(), Complex64::new(2.0, 0.0));
/// assert_eq!(f.eval_d(&vals), Complex64::new(7.0, 0.0));
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod expr_tree;
///________________________________________________________________________________________________________________________________
/// # Algebraic simplifier
/// in-place zero/one elimination and depth reduction over Sum and Mult subtrees;
/// every pass returns the number of eliminated operand entries (telemetry only)
///# Example#
/// ```
/// use homotopy_kernel::symbolic::expr_tree::Expr;
/// use num_complex::Complex64;
/// let x = Expr::Var("x".to_string());
/// let mut f = x.clone() + Expr::Num(Complex64::new(0.0, 0.0));
/// f.eliminate_zeros();
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod simplify;
///________________________________________________________________________________________________________________________________
/// # Differentiation engine
/// per-node-variant symbolic differentiation; always produces a new tree,
/// never mutates the original
/// ________________________________________________________________________________________________________________________________
pub mod differentiate;
///________________________________________________________________________________________________________________________________
/// # Degree, homogeneity and homogenization
/// polynomial degree with the -1 non-polynomial sentinel, homogeneity tests,
/// and in-place homogenization of Sum terms with a compensating variable
/// ________________________________________________________________________________________________________________________________
pub mod degree;
