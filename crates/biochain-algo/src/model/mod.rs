//! Solver-neutral MILP representation.
//!
//! A [`Model`] is a plain value: a list of variable definitions, one linear
//! objective to minimize and a list of linear constraints. It is assembled
//! through a [`ModelBuilder`], which checks that every expression only
//! references variables it created, and is immutable afterwards. Solver
//! backends translate it into their own API.

mod expr;
mod stats;

pub use expr::LinearExpr;
pub use stats::ModelStats;

use crate::PlanError;
use serde::Serialize;

/// Index of a variable inside its [`Model`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VarId(usize);

impl VarId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VarKind {
    Continuous,
    Binary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDef {
    pub name: String,
    pub kind: VarKind,
    pub lower: f64,
    /// `None` for no upper bound
    pub upper: Option<f64>,
}

impl VariableDef {
    pub fn continuous(name: impl Into<String>, lower: f64, upper: Option<f64>) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Continuous,
            lower,
            upper,
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Binary,
            lower: 0.0,
            upper: Some(1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sense {
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "==")]
    Eq,
}

impl Sense {
    pub fn symbol(self) -> &'static str {
        match self {
            Sense::Le => "<=",
            Sense::Ge => ">=",
            Sense::Eq => "==",
        }
    }

    /// Whether `lhs (sense) rhs` holds within `tolerance`
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Sense::Le => lhs <= rhs + tolerance,
            Sense::Ge => lhs >= rhs - tolerance,
            Sense::Eq => (lhs - rhs).abs() <= tolerance,
        }
    }
}

/// Which rule of the formulation produced a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintFamily {
    SourceSupply,
    FacilityThroughput,
    TransferBalance,
    GlobalBalance,
    ProductionGoal,
    SlotUsage,
    SlotOrder,
}

impl ConstraintFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintFamily::SourceSupply => "source-supply",
            ConstraintFamily::FacilityThroughput => "facility-throughput",
            ConstraintFamily::TransferBalance => "transfer-balance",
            ConstraintFamily::GlobalBalance => "global-balance",
            ConstraintFamily::ProductionGoal => "production-goal",
            ConstraintFamily::SlotUsage => "slot-usage",
            ConstraintFamily::SlotOrder => "slot-order",
        }
    }
}

/// `expr (sense) rhs`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constraint {
    pub name: String,
    pub family: ConstraintFamily,
    pub expr: LinearExpr,
    pub sense: Sense,
    pub rhs: f64,
}

impl Constraint {
    pub fn new(
        name: impl Into<String>,
        family: ConstraintFamily,
        expr: LinearExpr,
        sense: Sense,
        rhs: f64,
    ) -> Self {
        Self {
            name: name.into(),
            family,
            expr,
            sense,
            rhs,
        }
    }

    /// Signed amount by which `values` break the constraint (0 when satisfied)
    pub fn violation(&self, values: &[f64]) -> f64 {
        let lhs = self.expr.evaluate(values);
        match self.sense {
            Sense::Le => (lhs - self.rhs).max(0.0),
            Sense::Ge => (self.rhs - lhs).max(0.0),
            Sense::Eq => (lhs - self.rhs).abs(),
        }
    }
}

/// A complete minimization problem
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Model {
    variables: Vec<VariableDef>,
    objective: LinearExpr,
    constraints: Vec<Constraint>,
}

impl Model {
    pub fn variables(&self) -> &[VariableDef] {
        &self.variables
    }

    pub fn variable(&self, id: VarId) -> Option<&VariableDef> {
        self.variables.get(id.index())
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn stats(&self) -> ModelStats {
        ModelStats::of(self)
    }
}

/// Write side of a [`Model`]. Consumed by [`ModelBuilder::build`].
#[derive(Debug, Default)]
pub struct ModelBuilder {
    variables: Vec<VariableDef>,
    objective: LinearExpr,
    constraints: Vec<Constraint>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(&mut self, def: VariableDef) -> VarId {
        self.variables.push(def);
        VarId::new(self.variables.len() - 1)
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), PlanError> {
        self.check_references(&constraint.expr, &constraint.name)?;
        self.constraints.push(constraint);
        Ok(())
    }

    pub fn set_objective(&mut self, objective: LinearExpr) -> Result<(), PlanError> {
        self.check_references(&objective, "objective")?;
        self.objective = objective;
        Ok(())
    }

    pub fn build(self) -> Model {
        Model {
            variables: self.variables,
            objective: self.objective,
            constraints: self.constraints,
        }
    }

    fn check_references(&self, expr: &LinearExpr, context: &str) -> Result<(), PlanError> {
        match expr.variables().find(|v| v.index() >= self.variables.len()) {
            Some(var) => Err(PlanError::ModelBuild(format!(
                "{context} references variable #{} but only {} exist",
                var.index(),
                self.variables.len()
            ))),
            None => Ok(()),
        }
    }
}
