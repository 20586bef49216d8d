//! Scenario formulation: data + parameters + variant → model.

use super::constraints::assemble_constraints;
use super::facilities::FacilityDecisions;
use super::flows::{generate_flows, FlowAllocations};
use super::objective::{compose_objective, ObjectiveParts};
use super::params::{PlanParameters, ScenarioVariant};
use super::topology::build_topology;
use crate::model::{Model, ModelBuilder, ModelStats};
use crate::PlanError;
use biochain_core::data::NetworkData;
use biochain_core::{Diagnostics, SupplyNetwork};
use tracing::{debug, info};

/// A built model plus everything needed to read its solution back.
///
/// Built once per scenario run and never modified afterwards.
#[derive(Debug, Clone)]
pub struct PlanModel {
    pub variant: ScenarioVariant,
    pub params: PlanParameters,
    pub network: SupplyNetwork,
    pub flows: FlowAllocations,
    pub decisions: FacilityDecisions,
    pub objective: ObjectiveParts,
    pub model: Model,
}

impl PlanModel {
    pub fn stats(&self) -> ModelStats {
        self.model.stats()
    }
}

/// Build the model of one scenario from raw network data.
pub fn formulate(
    data: &NetworkData,
    params: &PlanParameters,
    variant: ScenarioVariant,
) -> Result<PlanModel, PlanError> {
    let network = build_topology(data, params, variant)?;
    formulate_network(network, params, variant)
}

/// Build the model over an already assembled network.
pub fn formulate_network(
    network: SupplyNetwork,
    params: &PlanParameters,
    variant: ScenarioVariant,
) -> Result<PlanModel, PlanError> {
    params.validate()?;
    reject_invalid(&network)?;

    let mut builder = ModelBuilder::new();
    let flows = generate_flows(&network, params.handling_policy, &mut builder)?;
    let decisions = FacilityDecisions::create(&network, &mut builder)?;
    debug!(
        flow_routes = flows.len(),
        decisions = decisions.iter().count(),
        variables = builder.num_variables(),
        "created decision variables"
    );

    assemble_constraints(&network, &flows, &decisions, params.goal_mass(), &mut builder)?;

    let objective = compose_objective(&network, &flows, &decisions, params.handling_policy);
    builder.set_objective(objective.total())?;

    let model = builder.build();
    let stats = model.stats();
    info!(
        variant = %variant,
        variables = stats.total_variables(),
        binaries = stats.binary_variables,
        constraints = stats.constraints,
        "formulated supply chain model"
    );

    Ok(PlanModel {
        variant,
        params: params.clone(),
        network,
        flows,
        decisions,
        objective,
        model,
    })
}

fn reject_invalid(network: &SupplyNetwork) -> Result<(), PlanError> {
    let mut diag = Diagnostics::new();
    network.validate_into(&mut diag);
    let result = match diag.errors().next() {
        None => Ok(()),
        Some(first) => Err(PlanError::Configuration(format!("invalid network: {first}"))),
    };
    result
}
