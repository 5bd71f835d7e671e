//! # Degree and Homogenization Module
//!
//! Polynomial degree queries, homogeneity tests and in-place homogenization
//! for `Expr` trees.
//!
//! Degrees live in `{-1} ∪ ℕ`: `-1` is the sentinel for "non-polynomial /
//! indeterminate degree in this variable" and propagates through the
//! composition rules (a single non-polynomial term poisons the whole sum; a
//! nonzero-degree divisor poisons the whole product). The sentinel never
//! leaks partially: a tree is `-1` iff an irreducible non-polynomial
//! subexpression is reachable under these rules.

use crate::symbolic::expr_tree::{Expr, ExprError};

/// Near-integer / near-real thresholding for constant exponents.
const EXP_INT_TOLERANCE: f64 = 10.0 * f64::EPSILON;

impl Expr {
    /// Degree of the expression in a single variable; -1 when non-polynomial.
    pub fn degree(&self, var: &str) -> i32 {
        match self {
            Expr::Num(_) | Expr::Differential(_) => 0,
            Expr::Var(name) => {
                if name == var {
                    1
                } else {
                    0
                }
            }
            Expr::Sum { operands, .. } => {
                let mut deg = 0;
                for operand in operands.iter() {
                    let curr_deg = operand.degree(var);
                    if curr_deg < 0 {
                        return curr_deg;
                    }
                    deg = deg.max(curr_deg);
                }
                deg
            }
            Expr::Mult { operands, ops } => {
                let mut deg = 0;
                for (operand, op) in operands.iter().zip(ops.iter()) {
                    let factor_deg = operand.degree(var);

                    // a differential of another variable zeroes the whole product
                    if let Expr::Differential(name) = operand {
                        if name != var {
                            return 0;
                        }
                    }

                    if factor_deg < 0 {
                        return factor_deg;
                    } else if factor_deg != 0 && !*op {
                        return -1;
                    } else {
                        deg += factor_deg;
                    }
                }
                deg
            }
            Expr::Negate(operand) => operand.degree(var),
            Expr::Power(base, exponent) => {
                let base_deg = base.degree(var);
                let exp_deg = exponent.degree(var);

                if exp_deg != 0 {
                    return -1;
                }
                match constant_nonneg_integer_exponent(exponent) {
                    ExponentKind::Zero => 0,
                    ExponentKind::NonNegativeInteger(n) => {
                        if base_deg < 0 {
                            -1
                        } else {
                            base_deg * n
                        }
                    }
                    ExponentKind::NegativeInteger => -1,
                    ExponentKind::NotInteger => {
                        if base_deg == 0 {
                            0
                        } else {
                            -1
                        }
                    }
                }
            }
            Expr::IntegerPower(operand, n) => {
                let base_deg = operand.degree(var);
                if base_deg < 0 { base_deg } else { n * base_deg }
            }
            Expr::Sqrt(operand) | Expr::Exp(operand) | Expr::Log(operand) => {
                if operand.degree(var) == 0 { 0 } else { -1 }
            }
        }
    }

    /// Degree of the expression in a variable group; -1 when non-polynomial.
    pub fn degree_group(&self, vars: &[String]) -> i32 {
        match self {
            Expr::Num(_) | Expr::Differential(_) => 0,
            Expr::Var(name) => {
                if vars.iter().any(|v| v == name) {
                    1
                } else {
                    0
                }
            }
            Expr::Sum { operands, .. } => {
                let mut deg = 0;
                for operand in operands.iter() {
                    let term_degree = operand.degree_group(vars);
                    if term_degree < 0 {
                        return term_degree;
                    }
                    deg = deg.max(term_degree);
                }
                deg
            }
            Expr::Mult { operands, ops } => {
                let mut deg = 0;
                for (operand, op) in operands.iter().zip(ops.iter()) {
                    let factor_deg = operand.degree_group(vars);
                    if factor_deg < 0 {
                        return factor_deg;
                    } else if factor_deg != 0 && !*op {
                        return -1;
                    } else {
                        deg += factor_deg;
                    }
                }
                deg
            }
            Expr::Negate(operand) => operand.degree_group(vars),
            Expr::Power(..) => {
                let multideg = self.multi_degree(vars);
                let mut deg = 0;
                for n in multideg {
                    if n < 0 {
                        return -1;
                    }
                    deg += n;
                }
                deg
            }
            Expr::IntegerPower(operand, n) => {
                let base_deg = operand.degree_group(vars);
                if base_deg < 0 { base_deg } else { n * base_deg }
            }
            Expr::Sqrt(operand) | Expr::Exp(operand) | Expr::Log(operand) => {
                if operand.degree_group(vars) == 0 {
                    0
                } else {
                    -1
                }
            }
        }
    }

    /// Per-variable degrees over a variable group.
    pub fn multi_degree(&self, vars: &[String]) -> Vec<i32> {
        match self {
            Expr::Sum { operands, .. } => {
                let mut deg = vec![0; vars.len()];
                for operand in operands.iter() {
                    let term_deg = operand.multi_degree(vars);
                    for (d, t) in deg.iter_mut().zip(term_deg.iter()) {
                        *d = (*d).max(*t);
                    }
                }
                deg
            }
            Expr::Mult { operands, .. } => {
                let mut deg = vec![0; vars.len()];
                for operand in operands.iter() {
                    let term_deg = operand.multi_degree(vars);
                    for (d, t) in deg.iter_mut().zip(term_deg.iter()) {
                        *d += *t;
                    }
                }
                deg
            }
            _ => vars.iter().map(|v| self.degree(v)).collect(),
        }
    }

    /// Tests homogeneity in a single variable.
    ///
    /// A Sum is homogeneous iff every operand is homogeneous and all operands
    /// share the first operand's degree; a product is homogeneous iff every
    /// factor is; a power needs a constant non-negative integer exponent and
    /// a homogeneous base; transcendental nodes pass only for degree-0
    /// arguments.
    pub fn is_homogeneous(&self, var: &str) -> bool {
        match self {
            Expr::Num(_) | Expr::Var(_) | Expr::Differential(_) => true,
            Expr::Sum { operands, .. } => {
                for operand in operands.iter() {
                    if !operand.is_homogeneous(var) {
                        return false;
                    }
                }

                let deg = operands[0].degree(var);
                if deg < 0 {
                    return false;
                }
                operands[1..].iter().all(|op| op.degree(var) == deg)
            }
            Expr::Mult { operands, .. } => operands.iter().all(|op| op.is_homogeneous(var)),
            Expr::Negate(operand) => operand.is_homogeneous(var),
            Expr::Power(base, exponent) => {
                if exponent.degree(var) != 0 {
                    return false;
                }
                matches!(
                    constant_nonneg_integer_exponent(exponent),
                    ExponentKind::Zero | ExponentKind::NonNegativeInteger(_)
                ) && base.is_homogeneous(var)
            }
            Expr::IntegerPower(operand, n) => *n >= 0 && operand.is_homogeneous(var),
            Expr::Sqrt(operand) | Expr::Exp(operand) | Expr::Log(operand) => {
                operand.degree(var) == 0
            }
        }
    }

    /// Tests homogeneity in a variable group.
    pub fn is_homogeneous_group(&self, vars: &[String]) -> bool {
        match self {
            Expr::Num(_) | Expr::Var(_) | Expr::Differential(_) => true,
            Expr::Sum { operands, .. } => {
                for operand in operands.iter() {
                    if !operand.is_homogeneous_group(vars) {
                        return false;
                    }
                }

                let deg = operands[0].degree_group(vars);
                if deg < 0 {
                    return false;
                }
                operands[1..].iter().all(|op| op.degree_group(vars) == deg)
            }
            Expr::Mult { operands, .. } => {
                operands.iter().all(|op| op.is_homogeneous_group(vars))
            }
            Expr::Negate(operand) => operand.is_homogeneous_group(vars),
            Expr::Power(base, exponent) => {
                if exponent.degree_group(vars) != 0 {
                    return false;
                }
                matches!(
                    constant_nonneg_integer_exponent(exponent),
                    ExponentKind::Zero | ExponentKind::NonNegativeInteger(_)
                ) && base.is_homogeneous_group(vars)
            }
            Expr::IntegerPower(operand, n) => *n >= 0 && operand.is_homogeneous_group(vars),
            Expr::Sqrt(operand) | Expr::Exp(operand) | Expr::Log(operand) => {
                operand.degree_group(vars) == 0
            }
        }
    }

    /// Homogenizes the tree in place with respect to a variable group, using
    /// `homvar` as the compensating variable.
    ///
    /// Children are homogenized first; each Sum then pads every
    /// degree-deficient term with `homvar^deficiency` (a plain Mult factor
    /// when the deficiency is exactly 1).
    ///
    /// # Errors
    /// `ExprError::NonPolynomial` when a non-polynomial subtree is reached.
    /// The operation is not transactional: on error the tree may be left
    /// partially homogenized and must be discarded by the caller.
    pub fn homogenize(&mut self, vars: &[String], homvar: &str) -> Result<(), ExprError> {
        match self {
            Expr::Num(_) | Expr::Var(_) | Expr::Differential(_) => Ok(()),
            Expr::Sum { operands, .. } => {
                // first homogenize each summand
                for operand in operands.iter_mut() {
                    operand.homogenize(vars, homvar)?;
                }

                // then pad each term up to the highest term degree
                let mut maxdegree = 0;
                let mut term_degrees = Vec::with_capacity(operands.len());
                for operand in operands.iter() {
                    let local_degree = operand.degree_group(vars);
                    if local_degree < 0 {
                        return Err(ExprError::NonPolynomial);
                    }
                    term_degrees.push(local_degree);
                    maxdegree = maxdegree.max(local_degree);
                }

                for (operand, term_degree) in operands.iter_mut().zip(term_degrees.iter()) {
                    let degree_deficiency = maxdegree - term_degree;
                    if degree_deficiency > 0 {
                        let held = std::mem::replace(operand, Expr::num(0.0));
                        let padding = if degree_deficiency == 1 {
                            Expr::var(homvar)
                        } else {
                            Expr::IntegerPower(Expr::var(homvar).boxed(), degree_deficiency)
                        };
                        *operand = Expr::mult(vec![padding, held], vec![true, true]);
                    }
                }
                Ok(())
            }
            Expr::Mult { operands, .. } => {
                for operand in operands.iter_mut() {
                    operand.homogenize(vars, homvar)?;
                }
                Ok(())
            }
            Expr::Negate(operand) => operand.homogenize(vars, homvar),
            Expr::Power(base, exponent) => {
                if exponent.degree_group(vars) == 0 {
                    base.homogenize(vars, homvar)
                } else {
                    Err(ExprError::NonPolynomial)
                }
            }
            Expr::IntegerPower(operand, _) => operand.homogenize(vars, homvar),
            Expr::Sqrt(operand) | Expr::Exp(operand) | Expr::Log(operand) => {
                if operand.degree_group(vars) == 0 {
                    Ok(())
                } else {
                    Err(ExprError::NonPolynomial)
                }
            }
        }
    }
}

enum ExponentKind {
    /// exponent evaluates to 0 within tolerance
    Zero,
    /// exponent is (near) a non-negative integer
    NonNegativeInteger(i32),
    /// exponent is (near) a negative integer
    NegativeInteger,
    /// exponent is non-integer, non-real, or not constant-foldable
    NotInteger,
}

/// Classifies a Power exponent by fresh constant evaluation with the
/// `10 * epsilon` near-integer / near-real thresholding.
fn constant_nonneg_integer_exponent(exponent: &Expr) -> ExponentKind {
    let Some(exp_val) = exponent.eval_constant_d() else {
        // constant in the queried variable, but not evaluable to a literal
        return ExponentKind::NotInteger;
    };

    let exp_is_int = exp_val.im.abs() < EXP_INT_TOLERANCE
        && (exp_val.re - exp_val.re.round()).abs() < EXP_INT_TOLERANCE;

    if !exp_is_int {
        return ExponentKind::NotInteger;
    }
    if exp_val.norm() < EXP_INT_TOLERANCE {
        ExponentKind::Zero
    } else if exp_val.re < 0.0 {
        ExponentKind::NegativeInteger
    } else {
        ExponentKind::NonNegativeInteger(exp_val.re.round() as i32)
    }
}
