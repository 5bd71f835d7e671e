//! # Differentiation Engine Module
//!
//! Per-node-variant symbolic differentiation for `Expr` trees. Every rule
//! produces a new tree and never mutates the receiver.
//!
//! ## Key rules
//! - Sum: term-by-term with structural zero-pruning (terms whose derivative
//!   is the literal zero constant are skipped, not numerically tested)
//! - Mult: the generalized product rule over N factors with mixed
//!   multiply/divide flags; divided factors pick up the quotient-rule
//!   `factor^2` divisor
//! - Power: `g * f^(g-1) * f'` - the logarithmic term a fully variable
//!   exponent would need is deliberately not generated; this restriction is
//!   part of the contract
//! - IntegerPower, Sqrt, Exp, Log: closed-form rules

use crate::symbolic::expr_tree::Expr;

impl Expr {
    /// Computes the symbolic derivative of the expression with respect to a
    /// variable, returning a new tree.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::var("x");
    /// let f = x.clone().ipow(2);
    /// let df_dx = f.differentiate("x"); // 2*x*1
    /// ```
    pub fn differentiate(&self, var: &str) -> Expr {
        match self {
            Expr::Num(_) | Expr::Differential(_) => Expr::num(0.0),
            Expr::Var(name) => {
                if name == var {
                    Expr::num(1.0)
                } else {
                    Expr::num(0.0)
                }
            }
            Expr::Sum { operands, signs } => {
                let mut ret_operands = Vec::new();
                let mut ret_signs = Vec::new();
                for (operand, sign) in operands.iter().zip(signs.iter()) {
                    // literal numbers contribute nothing
                    if matches!(operand, Expr::Num(_)) {
                        continue;
                    }
                    let derivative = operand.differentiate(var);
                    if derivative.is_zero() {
                        continue;
                    }
                    ret_operands.push(derivative);
                    ret_signs.push(*sign);
                }
                if ret_operands.is_empty() {
                    Expr::num(0.0)
                } else {
                    Expr::sum(ret_operands, ret_signs)
                }
            }
            Expr::Mult { operands, ops } => {
                let mut ret_terms = Vec::new();
                let mut ret_signs = Vec::new();
                // the generic product rule, one term per factor
                for (ii, operand) in operands.iter().enumerate() {
                    let local_derivative = operand.differentiate(var);
                    if local_derivative.is_zero() {
                        continue;
                    }

                    let mut term_operands = Vec::new();
                    let mut term_ops = Vec::new();
                    // a derivative equal to 1 adds nothing to the product
                    if !local_derivative.is_one() {
                        term_operands.push(local_derivative);
                        term_ops.push(true);
                    }
                    for (jj, other) in operands.iter().enumerate() {
                        if jj != ii {
                            term_operands.push(other.clone());
                            term_ops.push(ops[jj]);
                        }
                    }
                    if term_operands.is_empty() {
                        term_operands.push(Expr::num(1.0));
                        term_ops.push(true);
                    }

                    // a divided factor picks up the quotient-rule divisor
                    if !ops[ii] {
                        term_operands.push(Expr::IntegerPower(operand.clone().boxed(), 2));
                        term_ops.push(false);
                    }

                    ret_terms.push(Expr::mult(term_operands, term_ops));
                    ret_signs.push(ops[ii]);
                }
                if ret_terms.is_empty() {
                    Expr::num(0.0)
                } else {
                    Expr::sum(ret_terms, ret_signs)
                }
            }
            Expr::Negate(operand) => Expr::Negate(operand.differentiate(var).boxed()),
            Expr::Power(base, exponent) => {
                // g * f^(g-1) * f'; no logarithmic term for a variable exponent
                let exp_minus_one = Expr::sum(
                    vec![exponent.as_ref().clone(), Expr::num(1.0)],
                    vec![true, false],
                );
                Expr::mult(
                    vec![
                        base.differentiate(var),
                        exponent.as_ref().clone(),
                        Expr::Power(base.clone(), exp_minus_one.boxed()),
                    ],
                    vec![true, true, true],
                )
            }
            Expr::IntegerPower(operand, n) => match n {
                0 => Expr::num(0.0),
                1 => operand.differentiate(var),
                2 => Expr::mult(
                    vec![
                        Expr::num(2.0),
                        operand.as_ref().clone(),
                        operand.differentiate(var),
                    ],
                    vec![true, true, true],
                ),
                _ => Expr::mult(
                    vec![
                        Expr::num(*n as f64),
                        Expr::IntegerPower(operand.clone(), n - 1),
                        operand.differentiate(var),
                    ],
                    vec![true, true, true],
                ),
            },
            Expr::Sqrt(operand) => Expr::mult(
                vec![
                    Expr::Power(operand.clone(), Expr::num(-0.5).boxed()),
                    operand.differentiate(var),
                    Expr::num(0.5),
                ],
                vec![true, true, true],
            ),
            Expr::Exp(operand) => Expr::mult(
                vec![Expr::Exp(operand.clone()), operand.differentiate(var)],
                vec![true, true],
            ),
            Expr::Log(operand) => Expr::mult(
                vec![operand.as_ref().clone(), operand.differentiate(var)],
                vec![false, true],
            ),
        }
    }
}
