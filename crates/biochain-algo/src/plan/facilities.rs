//! Facility decisions: one build binary per hub and plant.

use crate::model::{
    Constraint, ConstraintFamily, LinearExpr, ModelBuilder, Sense, VarId, VariableDef,
};
use crate::PlanError;
use biochain_core::units::Megagrams;
use biochain_core::{SiteKey, SiteKind, SupplyNetwork};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct FacilityDecision {
    pub site: SiteKey,
    /// 1 when the site is built
    pub var: VarId,
    pub capacity: Megagrams,
    pub activation_cost: f64,
}

/// Build decisions of every optional site, in network order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilityDecisions {
    decisions: Vec<FacilityDecision>,
    index: HashMap<SiteKey, usize>,
}

impl FacilityDecisions {
    /// Add one binary per transfer and facility site of `network`.
    pub fn create(network: &SupplyNetwork, builder: &mut ModelBuilder) -> Result<Self, PlanError> {
        let mut out = Self::default();
        for kind in [SiteKind::Transfer, SiteKind::Facility] {
            for site in network.sites_of_kind(kind) {
                let capacity = site.capacity.finite().ok_or_else(|| {
                    PlanError::Configuration(format!("{} needs a finite capacity", site.key))
                })?;
                let var = builder.add_variable(VariableDef::binary(format!("build[{}]", site.key)));
                out.index.insert(site.key, out.decisions.len());
                out.decisions.push(FacilityDecision {
                    site: site.key,
                    var,
                    capacity,
                    activation_cost: site.activation_cost,
                });
            }
        }
        Ok(out)
    }

    pub fn get(&self, site: &SiteKey) -> Option<&FacilityDecision> {
        self.index.get(site).map(|&i| &self.decisions[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &FacilityDecision> {
        self.decisions.iter()
    }

    pub fn of_kind(&self, kind: SiteKind) -> impl Iterator<Item = &FacilityDecision> {
        self.decisions.iter().filter(move |d| d.site.kind == kind)
    }

    pub fn activation_cost(&self, site: &SiteKey) -> Option<f64> {
        self.get(site).map(|d| d.activation_cost)
    }

    /// `flow <= capacity × build`: nothing passes an unbuilt site, and a built
    /// one is capped at its capacity.
    pub fn gate(&self, site: &SiteKey, flow: LinearExpr) -> Result<Constraint, PlanError> {
        let decision = self.get(site).ok_or_else(|| {
            PlanError::ModelBuild(format!("{site} has no build decision to gate on"))
        })?;
        Ok(Constraint::new(
            format!("throughput[{site}]"),
            ConstraintFamily::FacilityThroughput,
            flow.plus_term(decision.var, -decision.capacity.value()),
            Sense::Le,
            0.0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biochain_core::{Capacity, Site, SiteId};

    #[test]
    fn test_gate_encodes_capacity_times_decision() {
        let mut network = SupplyNetwork::new();
        network
            .add_site(Site::source(SiteId::new(1), Megagrams(50.0)))
            .unwrap();
        let plant = SiteKey::new(SiteKind::Facility, 2);
        network
            .add_site(Site::new(plant, Capacity::Finite(Megagrams(40.0)), 7.0))
            .unwrap();

        let mut builder = ModelBuilder::new();
        let flow = builder.add_variable(VariableDef::continuous("f", 0.0, None));
        let decisions = FacilityDecisions::create(&network, &mut builder).unwrap();
        assert_eq!(decisions.iter().count(), 1);
        assert_eq!(decisions.activation_cost(&plant), Some(7.0));

        let build = decisions.get(&plant).unwrap().var;
        let gate = decisions.gate(&plant, LinearExpr::term(flow, 1.0)).unwrap();
        // unbuilt: any flow violates
        let mut values = vec![0.0; 2];
        values[flow.index()] = 1.0;
        assert!(gate.violation(&values) > 0.0);
        // built: up to capacity
        values[build.index()] = 1.0;
        values[flow.index()] = 40.0;
        assert_eq!(gate.violation(&values), 0.0);
        values[flow.index()] = 41.0;
        assert!(gate.violation(&values) > 0.0);
    }

    #[test]
    fn test_gate_on_supplier_is_a_build_error() {
        let decisions = FacilityDecisions::default();
        let err = decisions
            .gate(&SiteKey::new(SiteKind::Source, 1), LinearExpr::zero())
            .unwrap_err();
        assert!(matches!(err, PlanError::ModelBuild(_)));
    }
}
