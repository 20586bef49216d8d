//! Linear expressions over model variables.

use super::VarId;
use serde::Serialize;
use std::ops::{Add, Mul, Neg, Sub};

/// `Σ coefficient · variable + constant`
///
/// Terms keep the order they were added in and are never merged, so two
/// expressions built the same way compare equal term by term.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinearExpr {
    pub terms: Vec<(VarId, f64)>,
    pub constant: f64,
}

impl LinearExpr {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn constant(value: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant: value,
        }
    }

    /// `coefficient · var`
    pub fn term(var: VarId, coefficient: f64) -> Self {
        Self {
            terms: vec![(var, coefficient)],
            constant: 0.0,
        }
    }

    /// Sum of the given variables with unit coefficients
    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        vars.into_iter().map(|v| (v, 1.0)).collect()
    }

    pub fn plus_term(mut self, var: VarId, coefficient: f64) -> Self {
        self.terms.push((var, coefficient));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.constant == 0.0
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Value of the expression under a full assignment indexed by variable
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coef)| coef * values.get(var.index()).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }

    pub fn variables(&self) -> impl Iterator<Item = VarId> + '_ {
        self.terms.iter().map(|(var, _)| *var)
    }
}

impl FromIterator<(VarId, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarId, f64)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
            constant: 0.0,
        }
    }
}

impl Add for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: LinearExpr) -> LinearExpr {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
        self
    }
}

impl Sub for LinearExpr {
    type Output = LinearExpr;

    fn sub(self, rhs: LinearExpr) -> LinearExpr {
        self + (-rhs)
    }
}

impl Neg for LinearExpr {
    type Output = LinearExpr;

    fn neg(self) -> LinearExpr {
        self * -1.0
    }
}

impl Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(mut self, factor: f64) -> LinearExpr {
        for (_, coef) in &mut self.terms {
            *coef *= factor;
        }
        self.constant *= factor;
        self
    }
}

impl std::iter::Sum for LinearExpr {
    fn sum<I: Iterator<Item = LinearExpr>>(iter: I) -> Self {
        iter.fold(LinearExpr::zero(), |acc, e| acc + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate() {
        let x = VarId::new(0);
        let y = VarId::new(1);
        let expr = LinearExpr::term(x, 2.0).plus_term(y, -1.0) + LinearExpr::constant(5.0);
        assert_eq!(expr.evaluate(&[3.0, 4.0]), 7.0);
    }

    #[test]
    fn test_sub_negates_rhs() {
        let x = VarId::new(0);
        let y = VarId::new(1);
        let expr = LinearExpr::sum([x]) - LinearExpr::sum([y]);
        assert_eq!(expr.terms, vec![(x, 1.0), (y, -1.0)]);
    }

    #[test]
    fn test_sum_of_nothing_is_empty() {
        let expr: LinearExpr = Vec::<LinearExpr>::new().into_iter().sum();
        assert!(expr.is_empty());
        assert_eq!(expr.evaluate(&[]), 0.0);
    }
}
