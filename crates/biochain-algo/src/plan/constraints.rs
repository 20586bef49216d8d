//! Constraint assembly.

use super::facilities::FacilityDecisions;
use super::flows::{FlowAllocation, FlowAllocations};
use crate::model::{Constraint, ConstraintFamily, LinearExpr, ModelBuilder, Sense};
use crate::PlanError;
use biochain_core::units::Megagrams;
use biochain_core::{SiteKind, SupplyNetwork};

/// Add every constraint family of the formulation to `builder`.
///
/// Per-site families only range over sites that exist, so a network without
/// hubs gets no transfer balance rows. The global balance and the production
/// goal are always emitted.
pub fn assemble_constraints(
    network: &SupplyNetwork,
    flows: &FlowAllocations,
    decisions: &FacilityDecisions,
    goal: Megagrams,
    builder: &mut ModelBuilder,
) -> Result<(), PlanError> {
    for site in network.sites_of_kind(SiteKind::Source) {
        let supply = site.capacity.finite().ok_or_else(|| {
            PlanError::Configuration(format!("{} needs a finite supply", site.key))
        })?;
        builder.add_constraint(Constraint::new(
            format!("supply[{}]", site.key),
            ConstraintFamily::SourceSupply,
            flows.outflow(network, &site.key)?,
            Sense::Le,
            supply.value(),
        ))?;
    }

    for kind in [SiteKind::Transfer, SiteKind::Facility] {
        for site in network.sites_of_kind(kind) {
            let inflow = flows.inflow(network, &site.key)?;
            builder.add_constraint(decisions.gate(&site.key, inflow)?)?;
        }
    }

    for site in network.sites_of_kind(SiteKind::Transfer) {
        let balance = flows.inflow(network, &site.key)? - flows.outflow(network, &site.key)?;
        builder.add_constraint(Constraint::new(
            format!("balance[{}]", site.key),
            ConstraintFamily::TransferBalance,
            balance,
            Sense::Eq,
            0.0,
        ))?;
    }

    let shipped = supply_outflow(network, flows)?;
    let delivered = facility_inflow(network, flows)?;

    builder.add_constraint(Constraint::new(
        "global_balance",
        ConstraintFamily::GlobalBalance,
        shipped - delivered.clone(),
        Sense::Eq,
        0.0,
    ))?;

    builder.add_constraint(Constraint::new(
        "production_goal",
        ConstraintFamily::ProductionGoal,
        delivered,
        Sense::Ge,
        goal.value(),
    ))?;

    for allocation in flows.iter() {
        let Some(capacity) = allocation.vehicle_capacity else {
            continue;
        };
        for (k, (slot, used)) in allocation.slots.iter().zip(&allocation.usage).enumerate() {
            builder.add_constraint(Constraint::new(
                format!("slot_usage[{}][{k}]", allocation.route.index()),
                ConstraintFamily::SlotUsage,
                LinearExpr::term(*slot, 1.0).plus_term(*used, -capacity.value()),
                Sense::Le,
                0.0,
            ))?;
        }
        order_slots(allocation, capacity, builder)?;
    }

    Ok(())
}

/// Slots of one route are interchangeable, so only the ordering where
/// dispatched slots come first and every slot before the last dispatched one
/// is full is kept: `used[k+1] <= used[k]` and `slot[k] >= capacity * used[k+1]`.
fn order_slots(
    allocation: &FlowAllocation,
    capacity: Megagrams,
    builder: &mut ModelBuilder,
) -> Result<(), PlanError> {
    let route = allocation.route.index();
    for (k, pair) in allocation.usage.windows(2).enumerate() {
        builder.add_constraint(Constraint::new(
            format!("slot_order[{route}][{k}]"),
            ConstraintFamily::SlotOrder,
            LinearExpr::term(pair[1], 1.0).plus_term(pair[0], -1.0),
            Sense::Le,
            0.0,
        ))?;
        builder.add_constraint(Constraint::new(
            format!("slot_fill[{route}][{k}]"),
            ConstraintFamily::SlotOrder,
            LinearExpr::term(allocation.slots[k], 1.0).plus_term(pair[1], -capacity.value()),
            Sense::Ge,
            0.0,
        ))?;
    }
    Ok(())
}

/// Everything leaving suppliers, the external market included
pub fn supply_outflow(
    network: &SupplyNetwork,
    flows: &FlowAllocations,
) -> Result<LinearExpr, PlanError> {
    [SiteKind::Source, SiteKind::ExternalSource]
        .into_iter()
        .flat_map(|kind| network.sites_of_kind(kind))
        .try_fold(LinearExpr::zero(), |acc, site| {
            Ok(acc + flows.outflow(network, &site.key)?)
        })
}

/// Everything reaching plants
pub fn facility_inflow(
    network: &SupplyNetwork,
    flows: &FlowAllocations,
) -> Result<LinearExpr, PlanError> {
    network
        .sites_of_kind(SiteKind::Facility)
        .try_fold(LinearExpr::zero(), |acc, site| {
            Ok(acc + flows.inflow(network, &site.key)?)
        })
}
