//! Structural summary of a model.

use super::{Model, VarKind};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// Counts and an objective fingerprint.
///
/// Two models built from the same inputs produce equal stats; the
/// fingerprint covers every objective coefficient bit for bit, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    pub continuous_variables: usize,
    pub binary_variables: usize,
    pub constraints: usize,
    /// Constraint count per family name
    pub constraints_by_family: BTreeMap<String, usize>,
    pub objective_terms: usize,
    pub objective_fingerprint: u64,
}

impl ModelStats {
    pub fn of(model: &Model) -> Self {
        let mut continuous_variables = 0;
        let mut binary_variables = 0;
        for var in model.variables() {
            match var.kind {
                VarKind::Continuous => continuous_variables += 1,
                VarKind::Binary => binary_variables += 1,
            }
        }

        let mut constraints_by_family = BTreeMap::new();
        for constraint in model.constraints() {
            *constraints_by_family
                .entry(constraint.family.as_str().to_string())
                .or_insert(0) += 1;
        }

        let mut hasher = DefaultHasher::new();
        for (var, coef) in &model.objective().terms {
            var.hash(&mut hasher);
            coef.to_bits().hash(&mut hasher);
        }
        model.objective().constant.to_bits().hash(&mut hasher);

        Self {
            continuous_variables,
            binary_variables,
            constraints: model.constraints().len(),
            constraints_by_family,
            objective_terms: model.objective().len(),
            objective_fingerprint: hasher.finish(),
        }
    }

    pub fn total_variables(&self) -> usize {
        self.continuous_variables + self.binary_variables
    }

    pub fn family_count(&self, family: &str) -> usize {
        self.constraints_by_family.get(family).copied().unwrap_or(0)
    }
}

impl std::fmt::Display for ModelStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Variables: {} ({} continuous, {} binary)",
            self.total_variables(),
            self.continuous_variables,
            self.binary_variables
        )?;
        writeln!(f, "Constraints: {}", self.constraints)?;
        for (family, count) in &self.constraints_by_family {
            writeln!(f, "  {family}: {count}")?;
        }
        write!(
            f,
            "Objective: {} terms (fingerprint {:016x})",
            self.objective_terms, self.objective_fingerprint
        )
    }
}
