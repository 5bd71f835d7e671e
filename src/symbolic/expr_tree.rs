//! # Expression Tree Module
//!
//! This module provides the core symbolic expression type for the continuation
//! kernel. Every function tracked by the engine - target system equations,
//! start system equations, their derivatives - is an `Expr` tree built from
//! a closed set of node variants.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! The core symbolic expression type supporting:
//! - **Leaves**: `Var(String)`, `Num(Complex64)`, `Differential(String)`
//! - **N-ary operators**: `Sum` and `Mult`, each carrying an ordered operand
//!   sequence and a parallel sequence of boolean flags (`true` = add/multiply,
//!   `false` = subtract/divide, always the same length as the operands)
//! - **Unary/binary operators**: `Negate`, `Power`, `IntegerPower`, `Sqrt`,
//!   `Exp`, `Log`
//!
//! ### Key Methods
//! - `sum(operands, signs)` / `mult(operands, ops)` - factory constructors
//! - `add_operand(node, flag)` - append an operand to a Sum/Mult in place
//! - `eval_d(vals)` - fresh double-precision evaluation
//! - `eval_mp(vals, precision)` - fresh multiple-precision evaluation at an
//!   explicit precision (no ambient global precision state)
//! - `eval_constant_d()` - constant folding used by the simplifier and the
//!   degree engine
//!
//! ## Interesting Code Features
//!
//! 1. **Flag-paired operand lists**: a Sum like `a - b + c` is a single node
//!    with operands `[a, b, c]` and signs `[true, false, true]`, which is what
//!    makes the splice/XNOR depth-reduction passes cheap
//!
//! 2. **Two evaluation number types**: the same tree evaluates in `Complex64`
//!    and in the precision-tagged `CmplxMP` type used by the AMP endgame
//!
//! 3. **Operator Overloading**: implements std::ops traits (Add, Sub, Mul,
//!    Div, Neg) for natural mathematical syntax: `x + y * z`

use crate::tracking::precision::CmplxMP;
use num_complex::Complex64;
use num_traits::{One, Zero};
use std::collections::HashMap;
use std::fmt;

/// Error type for expression-tree domain violations.
///
/// Raised by `homogenize` when asked to homogenize a non-polynomial subtree.
/// The failure is non-transactional: siblings visited before the failing node
/// may already carry their compensating factors, so callers must discard the
/// tree on error rather than retry in place.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprError {
    NonPolynomial,
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExprError::NonPolynomial => {
                write!(f, "asking for homogenization on non-polynomial node")
            }
        }
    }
}

impl std::error::Error for ExprError {}

/// Core symbolic expression enum representing functions as trees.
///
/// `Sum` and `Mult` are n-ary: they hold an ordered operand sequence plus a
/// parallel sequence of boolean flags of identical length (`true` =
/// add/multiply, `false` = subtract/divide). The length invariant and
/// non-emptiness are enforced by assertion in the factory constructors and
/// preserved by every simplification pass.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Numeric constant (double-precision complex literal)
    Num(Complex64),
    /// Symbolic variable with a name
    Var(String),
    /// Differential symbol d<name>, produced by jacobian machinery
    Differential(String),
    /// N-ary sum: flags select + (true) or - (false) per operand
    Sum { operands: Vec<Expr>, signs: Vec<bool> },
    /// N-ary product: flags select * (true) or / (false) per operand
    Mult { operands: Vec<Expr>, ops: Vec<bool> },
    /// Unary negation
    Negate(Box<Expr>),
    /// General power: base ^ exponent, both expression trees
    Power(Box<Expr>, Box<Expr>),
    /// Power with an integer literal exponent
    IntegerPower(Box<Expr>, i32),
    /// Square root
    Sqrt(Box<Expr>),
    /// Exponential function e^x
    Exp(Box<Expr>),
    /// Natural logarithm
    Log(Box<Expr>),
}

impl Expr {
    /// BASIC FEATURES

    /// Factory constructor for a Sum node.
    ///
    /// # Panics
    /// When the operand sequence is empty or the sign sequence has a
    /// different length (contract violation, not a recoverable error).
    pub fn sum(operands: Vec<Expr>, signs: Vec<bool>) -> Expr {
        assert!(!operands.is_empty(), "a Sum node must have operands");
        assert_eq!(
            operands.len(),
            signs.len(),
            "operand and sign sequences of a Sum must have the same length"
        );
        Expr::Sum { operands, signs }
    }

    /// Factory constructor for a Mult node.
    ///
    /// # Panics
    /// When the operand sequence is empty or the flag sequence has a
    /// different length.
    pub fn mult(operands: Vec<Expr>, ops: Vec<bool>) -> Expr {
        assert!(!operands.is_empty(), "a Mult node must have operands");
        assert_eq!(
            operands.len(),
            ops.len(),
            "operand and op sequences of a Mult must have the same length"
        );
        Expr::Mult { operands, ops }
    }

    /// Creates a real numeric constant.
    pub fn num(val: f64) -> Expr {
        Expr::Num(Complex64::new(val, 0.0))
    }

    /// Creates a symbolic variable.
    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    /// Creates multiple symbolic variables from a comma-separated string.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let vars = Expr::Symbols("x, y, z");
    /// assert_eq!(vars.len(), 3);
    /// ```
    pub fn Symbols(symbols: &str) -> Vec<Expr> {
        symbols
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| Expr::Var(s.to_string()))
            .collect()
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Power(self.boxed(), rhs.boxed())
    }

    /// Creates an integer power expression self^n.
    pub fn ipow(self, n: i32) -> Expr {
        Expr::IntegerPower(self.boxed(), n)
    }

    /// Creates exponential function e^(self).
    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    /// Creates natural logarithm log(self).
    pub fn log(self) -> Expr {
        Expr::Log(self.boxed())
    }

    /// Creates square root sqrt(self).
    pub fn sqrt(self) -> Expr {
        Expr::Sqrt(self.boxed())
    }

    /// Number of direct operands of a Sum/Mult node; 0 for everything else.
    pub fn num_operands(&self) -> usize {
        match self {
            Expr::Sum { operands, .. } | Expr::Mult { operands, .. } => operands.len(),
            _ => 0,
        }
    }

    /// Appends an operand with its flag to a Sum or Mult node in place.
    ///
    /// # Panics
    /// When called on any other node variant (caller misuse).
    pub fn add_operand(&mut self, node: Expr, flag: bool) {
        match self {
            Expr::Sum { operands, signs } => {
                operands.push(node);
                signs.push(flag);
            }
            Expr::Mult { operands, ops } => {
                operands.push(node);
                ops.push(flag);
            }
            _ => panic!("add_operand called on a node that is neither Sum nor Mult"),
        }
    }

    /// Checks if expression is exactly the literal zero constant.
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Num(c) if *c == Complex64::new(0.0, 0.0))
    }

    /// Checks if expression is exactly the literal one constant.
    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Num(c) if *c == Complex64::new(1.0, 0.0))
    }

    /// check if the expression contains a variable or differential leaf
    pub fn contains_variables(&self) -> bool {
        match self {
            Expr::Num(_) => false,
            Expr::Var(_) | Expr::Differential(_) => true,
            Expr::Sum { operands, .. } | Expr::Mult { operands, .. } => {
                operands.iter().any(|op| op.contains_variables())
            }
            Expr::Negate(operand)
            | Expr::Sqrt(operand)
            | Expr::Exp(operand)
            | Expr::Log(operand) => operand.contains_variables(),
            Expr::Power(base, exponent) => {
                base.contains_variables() || exponent.contains_variables()
            }
            Expr::IntegerPower(operand, _) => operand.contains_variables(),
        }
    }

    /// EVALUATION

    /// Fresh double-precision evaluation against a variable table.
    ///
    /// Every call recomputes the whole tree; no intermediate values are
    /// cached. Variables and differentials look their current value up in
    /// `vals`.
    ///
    /// # Panics
    /// When a variable reachable from this tree is missing from the table
    /// (caller misuse).
    pub fn eval_d(&self, vals: &HashMap<String, Complex64>) -> Complex64 {
        match self {
            Expr::Num(c) => *c,
            Expr::Var(name) | Expr::Differential(name) => *vals
                .get(name)
                .unwrap_or_else(|| panic!("no value set for variable {}", name)),
            Expr::Sum { operands, signs } => {
                let mut acc = Complex64::zero();
                for (operand, sign) in operands.iter().zip(signs.iter()) {
                    if *sign {
                        acc += operand.eval_d(vals);
                    } else {
                        acc -= operand.eval_d(vals);
                    }
                }
                acc
            }
            Expr::Mult { operands, ops } => {
                let mut acc = Complex64::one();
                for (operand, op) in operands.iter().zip(ops.iter()) {
                    if *op {
                        acc *= operand.eval_d(vals);
                    } else {
                        acc /= operand.eval_d(vals);
                    }
                }
                acc
            }
            Expr::Negate(operand) => -operand.eval_d(vals),
            Expr::Power(base, exponent) => base.eval_d(vals).powc(exponent.eval_d(vals)),
            Expr::IntegerPower(operand, n) => operand.eval_d(vals).powi(*n),
            Expr::Sqrt(operand) => operand.eval_d(vals).sqrt(),
            Expr::Exp(operand) => operand.eval_d(vals).exp(),
            Expr::Log(operand) => operand.eval_d(vals).ln(),
        }
    }

    /// Fresh multiple-precision evaluation at an explicit precision.
    ///
    /// Precision is threaded as a parameter through the whole call chain
    /// rather than consulted from ambient global state.
    pub fn eval_mp(&self, vals: &HashMap<String, CmplxMP>, precision: u32) -> CmplxMP {
        match self {
            Expr::Num(c) => CmplxMP::from_c64(*c, precision),
            Expr::Var(name) | Expr::Differential(name) => vals
                .get(name)
                .unwrap_or_else(|| panic!("no value set for variable {}", name))
                .clone(),
            Expr::Sum { operands, signs } => {
                let mut acc = CmplxMP::zero(precision);
                for (operand, sign) in operands.iter().zip(signs.iter()) {
                    let term = operand.eval_mp(vals, precision);
                    if *sign {
                        acc = acc + term;
                    } else {
                        acc = acc - term;
                    }
                }
                acc
            }
            Expr::Mult { operands, ops } => {
                let mut acc = CmplxMP::one(precision);
                for (operand, op) in operands.iter().zip(ops.iter()) {
                    let factor = operand.eval_mp(vals, precision);
                    if *op {
                        acc = acc * factor;
                    } else {
                        acc = acc / factor;
                    }
                }
                acc
            }
            Expr::Negate(operand) => -operand.eval_mp(vals, precision),
            Expr::Power(base, exponent) => base
                .eval_mp(vals, precision)
                .pow(&exponent.eval_mp(vals, precision)),
            Expr::IntegerPower(operand, n) => operand.eval_mp(vals, precision).powi(*n),
            Expr::Sqrt(operand) => operand.eval_mp(vals, precision).sqrt(),
            Expr::Exp(operand) => operand.eval_mp(vals, precision).exp(),
            Expr::Log(operand) => operand.eval_mp(vals, precision).ln(),
        }
    }

    /// Fresh double evaluation of a constant subtree.
    ///
    /// Returns `None` as soon as any `Var` or `Differential` leaf is
    /// reachable. This is the evaluation behind the simplifier's exact
    /// `== 0.0` / `== 1.0` tests and the degree engine's exponent
    /// inspection, so it deliberately performs no tolerance-based rounding.
    pub fn eval_constant_d(&self) -> Option<Complex64> {
        match self {
            Expr::Num(c) => Some(*c),
            Expr::Var(_) | Expr::Differential(_) => None,
            Expr::Sum { operands, signs } => {
                let mut acc = Complex64::zero();
                for (operand, sign) in operands.iter().zip(signs.iter()) {
                    let term = operand.eval_constant_d()?;
                    if *sign {
                        acc += term;
                    } else {
                        acc -= term;
                    }
                }
                Some(acc)
            }
            Expr::Mult { operands, ops } => {
                let mut acc = Complex64::one();
                for (operand, op) in operands.iter().zip(ops.iter()) {
                    let factor = operand.eval_constant_d()?;
                    if *op {
                        acc *= factor;
                    } else {
                        acc /= factor;
                    }
                }
                Some(acc)
            }
            Expr::Negate(operand) => Some(-operand.eval_constant_d()?),
            Expr::Power(base, exponent) => {
                Some(base.eval_constant_d()?.powc(exponent.eval_constant_d()?))
            }
            Expr::IntegerPower(operand, n) => Some(operand.eval_constant_d()?.powi(*n)),
            Expr::Sqrt(operand) => Some(operand.eval_constant_d()?.sqrt()),
            Expr::Exp(operand) => Some(operand.eval_constant_d()?.exp()),
            Expr::Log(operand) => Some(operand.eval_constant_d()?.ln()),
        }
    }
}

/// Display implementation for pretty printing expression trees.
///
/// Sign/op flags render as infix `+ - * /`; a leading divide flag on a Mult
/// renders as `1/`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Num(c) => {
                if c.im == 0.0 {
                    write!(f, "{}", c.re)
                } else {
                    write!(f, "({}+{}i)", c.re, c.im)
                }
            }
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Differential(name) => write!(f, "d{}", name),
            Expr::Sum { operands, signs } => {
                write!(f, "(")?;
                for (ii, (operand, sign)) in operands.iter().zip(signs.iter()).enumerate() {
                    if !*sign {
                        write!(f, "-")?;
                    } else if ii > 0 {
                        write!(f, "+")?;
                    }
                    write!(f, "{}", operand)?;
                }
                write!(f, ")")
            }
            Expr::Mult { operands, ops } => {
                write!(f, "(")?;
                for (ii, (operand, op)) in operands.iter().zip(ops.iter()).enumerate() {
                    if ii == 0 {
                        if !*op {
                            write!(f, "1/")?;
                        }
                    } else if *op {
                        write!(f, "*")?;
                    } else {
                        write!(f, "/")?;
                    }
                    write!(f, "{}", operand)?;
                }
                write!(f, ")")
            }
            Expr::Negate(operand) => write!(f, "-({})", operand),
            Expr::Power(base, exponent) => write!(f, "({})^({})", base, exponent),
            Expr::IntegerPower(operand, n) => write!(f, "({}^{})", operand, n),
            Expr::Sqrt(operand) => write!(f, "sqrt({})", operand),
            Expr::Exp(operand) => write!(f, "exp({})", operand),
            Expr::Log(operand) => write!(f, "log({})", operand),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Sum {
            operands: vec![self, rhs],
            signs: vec![true, true],
        }
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sum {
            operands: vec![self, rhs],
            signs: vec![true, false],
        }
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mult {
            operands: vec![self, rhs],
            ops: vec![true, true],
        }
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Mult {
            operands: vec![self, rhs],
            ops: vec![true, false],
        }
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Negate(self.boxed())
    }
}
