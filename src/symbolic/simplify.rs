//! # Algebraic Simplifier Module
//!
//! In-place simplification passes over `Expr` trees: exact zero/one
//! elimination and depth reduction of nested Sum/Mult nodes. Each pass
//! returns the number of eliminated operand entries; the count is telemetry,
//! not a correctness signal.
//!
//! The zero/one tests compare a fresh constant-folded double evaluation
//! against `0.0`/`1.0` by exact equality. An operand that merely evaluates
//! near zero (for example from catastrophic cancellation) is never
//! eliminated; any subtree containing a variable is never eliminated at all.

use crate::symbolic::expr_tree::Expr;
use num_complex::Complex64;

fn const_equals(node: &Expr, target: f64) -> bool {
    node.eval_constant_d() == Some(Complex64::new(target, 0.0))
}

impl Expr {
    /// Drops operands that evaluate exactly to zero.
    ///
    /// For a Sum, every zero operand is removed (keeping sign pairing); when
    /// all operands would be removed, a single literal `0` with add-sign is
    /// substituted instead. For a Mult, a single zero factor collapses the
    /// whole node to the literal `0`, discarding all other factors. Both
    /// recurse into the surviving operands afterward.
    ///
    /// Returns the number of eliminated operand entries.
    pub fn eliminate_zeros(&mut self) -> u32 {
        match self {
            Expr::Sum { operands, signs } => {
                assert!(
                    !operands.is_empty(),
                    "operands must not be empty to eliminate zeros"
                );

                let mut num_eliminated: u32 = 0;
                if operands.len() > 1 {
                    let is_zero: Vec<bool> =
                        operands.iter().map(|op| const_equals(op, 0.0)).collect();

                    let mut new_children = Vec::new();
                    let mut new_signs = Vec::new();
                    for (ii, operand) in std::mem::take(operands).into_iter().enumerate() {
                        if !is_zero[ii] {
                            new_children.push(operand);
                            new_signs.push(signs[ii]);
                        } else {
                            num_eliminated += 1;
                        }
                    }

                    if new_children.is_empty() {
                        new_children.push(Expr::num(0.0));
                        new_signs.push(true);
                        num_eliminated -= 1;
                    }

                    *operands = new_children;
                    *signs = new_signs;
                }

                // recurse over the remaining children
                for operand in operands.iter_mut() {
                    num_eliminated += operand.eliminate_zeros();
                }
                num_eliminated
            }
            Expr::Mult { operands, ops } => {
                assert!(
                    !operands.is_empty(),
                    "operands must not be empty to eliminate zeros"
                );

                // a single zero factor collapses the whole product
                let have_a_zero = operands.iter().any(|op| const_equals(op, 0.0));
                if have_a_zero {
                    let num_eliminated = (operands.len() - 1) as u32;
                    *operands = vec![Expr::num(0.0)];
                    *ops = vec![true];
                    return num_eliminated;
                }

                let mut num_eliminated: u32 = 0;
                for operand in operands.iter_mut() {
                    num_eliminated += operand.eliminate_zeros();
                }
                num_eliminated
            }
            _ => 0,
        }
    }

    /// Drops Mult factors that evaluate exactly to one.
    ///
    /// The last remaining factor is never dropped: when every factor would be
    /// removed, original operand index 0 is kept instead. A Sum has no
    /// one-elimination of its own (the additive identity is 0) and only
    /// recurses. Returns the number of eliminated operand entries.
    pub fn eliminate_ones(&mut self) -> u32 {
        match self {
            Expr::Sum { operands, .. } => {
                let mut num_eliminated: u32 = 0;
                for operand in operands.iter_mut() {
                    num_eliminated += operand.eliminate_ones();
                }
                num_eliminated
            }
            Expr::Mult { operands, ops } => {
                assert!(
                    !operands.is_empty(),
                    "operands must not be empty to eliminate ones"
                );

                let mut num_eliminated: u32 = 0;
                if operands.len() > 1 {
                    let is_one: Vec<bool> =
                        operands.iter().map(|op| const_equals(op, 1.0)).collect();

                    let fallback = (operands[0].clone(), ops[0]);
                    let mut new_children = Vec::new();
                    let mut new_ops = Vec::new();
                    for (ii, operand) in std::mem::take(operands).into_iter().enumerate() {
                        if !is_one[ii] {
                            new_children.push(operand);
                            new_ops.push(ops[ii]);
                        } else {
                            num_eliminated += 1;
                        }
                    }

                    if new_children.is_empty() {
                        new_children.push(fallback.0);
                        new_ops.push(fallback.1);
                        num_eliminated -= 1;
                    }

                    *operands = new_children;
                    *ops = new_ops;
                }

                for operand in operands.iter_mut() {
                    num_eliminated += operand.eliminate_ones();
                }
                num_eliminated
            }
            _ => 0,
        }
    }

    /// Splices directly nested Sum operands of a Sum into the parent, and
    /// folds a single-operand Sum inside a Mult into that Mult.
    ///
    /// Sign flags combine by XNOR: a subtracted subtracted operand becomes
    /// added. The Mult fold wraps the operand in `Negate` when its sign is
    /// subtract. One level only; no distribution.
    pub fn reduce_sub_sums(&mut self) -> u32 {
        match self {
            Expr::Sum { operands, signs } => {
                let mut new_children = Vec::new();
                let mut new_signs = Vec::new();
                let mut num_eliminated: u32 = 0;

                let old_signs = std::mem::take(signs);
                for (ii, operand) in std::mem::take(operands).into_iter().enumerate() {
                    match operand {
                        Expr::Sum {
                            operands: inner_operands,
                            signs: inner_signs,
                        } => {
                            // a nested sum: splice it into this one
                            for (inner, inner_sign) in
                                inner_operands.into_iter().zip(inner_signs.into_iter())
                            {
                                new_children.push(inner);
                                new_signs.push(inner_sign == old_signs[ii]);
                                num_eliminated += 1;
                            }
                        }
                        other => {
                            new_children.push(other);
                            new_signs.push(old_signs[ii]);
                        }
                    }
                }

                *operands = new_children;
                *signs = new_signs;
                num_eliminated
            }
            Expr::Mult { operands, ops } => {
                let mut new_children = Vec::new();
                let mut new_ops = Vec::new();
                let mut num_eliminated: u32 = 0;

                let old_ops = std::mem::take(ops);
                for (ii, operand) in std::mem::take(operands).into_iter().enumerate() {
                    match operand {
                        Expr::Sum {
                            operands: mut inner_operands,
                            signs: inner_signs,
                        } if inner_operands.len() == 1 => {
                            // single-operand sum: its operand folds into this product
                            let inner = inner_operands.pop().unwrap();
                            if inner_signs[0] {
                                new_children.push(inner);
                            } else {
                                new_children.push(Expr::Negate(inner.boxed()));
                            }
                            new_ops.push(old_ops[ii]);
                            num_eliminated += 1;
                        }
                        other => {
                            new_children.push(other);
                            new_ops.push(old_ops[ii]);
                        }
                    }
                }

                *operands = new_children;
                *ops = new_ops;
                num_eliminated
            }
            _ => 0,
        }
    }

    /// Splices directly nested Mult operands of a Mult into the parent, and
    /// folds a single-factor multiply-typed Mult inside a Sum into that Sum.
    ///
    /// Op flags combine by XNOR: a divided divisor becomes a multiplier.
    pub fn reduce_sub_mults(&mut self) -> u32 {
        match self {
            Expr::Sum { operands, signs } => {
                let mut new_children = Vec::new();
                let mut new_signs = Vec::new();
                let mut num_eliminated: u32 = 0;

                let old_signs = std::mem::take(signs);
                for (ii, operand) in std::mem::take(operands).into_iter().enumerate() {
                    match operand {
                        Expr::Mult {
                            operands: mut inner_operands,
                            ops: inner_ops,
                        } if inner_operands.len() == 1 && inner_ops[0] => {
                            // lone multiplicative factor: folds into this sum
                            new_children.push(inner_operands.pop().unwrap());
                            new_signs.push(old_signs[ii]);
                            num_eliminated += 1;
                        }
                        other => {
                            new_children.push(other);
                            new_signs.push(old_signs[ii]);
                        }
                    }
                }

                *operands = new_children;
                *signs = new_signs;
                num_eliminated
            }
            Expr::Mult { operands, ops } => {
                let mut new_children = Vec::new();
                let mut new_ops = Vec::new();
                let mut num_eliminated: u32 = 0;

                let old_ops = std::mem::take(ops);
                for (ii, operand) in std::mem::take(operands).into_iter().enumerate() {
                    match operand {
                        Expr::Mult {
                            operands: inner_operands,
                            ops: inner_ops,
                        } => {
                            // a nested product: splice it into this one
                            for (inner, inner_op) in
                                inner_operands.into_iter().zip(inner_ops.into_iter())
                            {
                                new_children.push(inner);
                                new_ops.push(inner_op == old_ops[ii]);
                                num_eliminated += 1;
                            }
                        }
                        other => {
                            new_children.push(other);
                            new_ops.push(old_ops[ii]);
                        }
                    }
                }

                *operands = new_children;
                *ops = new_ops;
                num_eliminated
            }
            _ => 0,
        }
    }

    /// Single entry point for tree-depth normalization.
    ///
    /// Reduces every operand bottom-up first, then splices and folds at this
    /// level until a pass eliminates nothing, so one call reaches the fixed
    /// point: a second `reduce_depth` on the same tree eliminates exactly 0
    /// additional operands.
    pub fn reduce_depth(&mut self) -> u32 {
        match self {
            Expr::Sum { .. } | Expr::Mult { .. } => {
                let mut num_eliminated: u32 = 0;

                if let Expr::Sum { operands, .. } | Expr::Mult { operands, .. } = self {
                    for operand in operands.iter_mut() {
                        num_eliminated += operand.reduce_depth();
                    }
                }

                loop {
                    let pass = self.reduce_sub_sums() + self.reduce_sub_mults();
                    num_eliminated += pass;
                    if pass == 0 {
                        break;
                    }
                }
                num_eliminated
            }
            _ => 0,
        }
    }
}
