//! End-to-end solves of small networks with the default MILP backend.

use biochain_algo::plan::{
    formulate, solve_plan, verify_solution, HandlingCostPolicy, ModeParameters, PlanParameters,
    ScenarioVariant,
};
use biochain_algo::{MilpSolverKind, PlanError, SolveStatus};
use biochain_core::data::{ArcRecord, ArcSet, NetworkData};
use biochain_core::units::{Liters, LitersPerMegagram, Megagrams};
use biochain_core::{SiteKey, SiteKind};

const TOL: f64 = 1e-4;

/// Unit yield so liters and Mg coincide
fn params(goal: f64) -> PlanParameters {
    PlanParameters {
        truck: ModeParameters {
            vehicle_capacity: Megagrams(500.0),
            trip_handling_cost: 0.0,
        },
        train: ModeParameters {
            vehicle_capacity: Megagrams(20_000.0),
            trip_handling_cost: 0.0,
        },
        transfer_capacity: Megagrams(1500.0),
        transfer_activation_cost: 50.0,
        facility_capacity: Liters(2000.0),
        facility_activation_cost: 100.0,
        fuel_yield: LitersPerMegagram(1.0),
        production_goal: Liters(goal),
        external_unit_cost: 50.0,
        handling_policy: HandlingCostPolicy::PerDispatchedSlot,
    }
}

fn single_lane() -> NetworkData {
    NetworkData::new()
        .with_source(1, 1000.0)
        .with_facility(1)
        .with_arc(ArcSet::SourceToFacility, ArcRecord::new(1, 1, 1.0, 1.0))
}

fn two_hubs() -> NetworkData {
    NetworkData::new()
        .with_source(1, 1000.0)
        .with_transfer(1)
        .with_transfer(2)
        .with_facility(1)
        .with_arc(ArcSet::SourceToTransfer, ArcRecord::new(1, 1, 10.0, 1.0))
        .with_arc(ArcSet::SourceToTransfer, ArcRecord::new(1, 2, 20.0, 1.0))
        .with_arc(ArcSet::TransferToFacility, ArcRecord::new(1, 1, 10.0, 1.0))
        .with_arc(ArcSet::TransferToFacility, ArcRecord::new(2, 1, 10.0, 1.0))
}

fn backend() -> Box<dyn biochain_algo::SolverBackend> {
    MilpSolverKind::default().backend()
}

#[test]
fn direct_cost_without_handling() {
    let plan = formulate(&single_lane(), &params(800.0), ScenarioVariant::Direct).unwrap();
    let solution = solve_plan(&plan, backend().as_ref());

    assert_eq!(solution.status, SolveStatus::Optimal);
    assert!((solution.total_cost.unwrap() - 900.0).abs() < TOL);
    assert_eq!(solution.report_line(), "Minimal Total Cost: $900");
    assert!(verify_solution(&plan, &solution, TOL).is_empty());
}

#[test]
fn direct_cost_charges_each_dispatched_slot() {
    let mut p = params(800.0);
    p.truck.trip_handling_cost = 10.0;
    let plan = formulate(&single_lane(), &p, ScenarioVariant::Direct).unwrap();
    let solution = solve_plan(&plan, backend().as_ref());

    // 800 Mg needs two 500 Mg trips: 800 + 100 + 2 × 10
    assert!((solution.total_cost.unwrap() - 920.0).abs() < TOL);
    let costs = solution.costs.as_ref().unwrap();
    assert!((costs.handling - 20.0).abs() < TOL);
    assert!((costs.investment - 100.0).abs() < TOL);
    assert_eq!(solution.flows[0].used_slots, Some(2));
    assert!(verify_solution(&plan, &solution, TOL).is_empty());
}

#[test]
fn per_load_handling_is_proportional() {
    let mut p = params(800.0);
    p.truck.trip_handling_cost = 10.0;
    p.handling_policy = HandlingCostPolicy::PerLoad;
    let plan = formulate(&single_lane(), &p, ScenarioVariant::Direct).unwrap();
    let solution = solve_plan(&plan, backend().as_ref());

    // 800 + 800 × 10 / 500 + 100
    assert!((solution.total_cost.unwrap() - 916.0).abs() < TOL);
}

#[test]
fn facility_below_goal_is_infeasible() {
    let mut p = params(800.0);
    p.facility_capacity = Liters(500.0);
    let plan = formulate(&single_lane(), &p, ScenarioVariant::Direct).unwrap();
    let solution = solve_plan(&plan, backend().as_ref());

    assert_eq!(solution.status, SolveStatus::Infeasible);
    assert_eq!(solution.total_cost, None);
    assert_eq!(solution.report_line(), "No solution found.");
    assert_eq!(
        solution.into_result().unwrap_err(),
        PlanError::SolverStatus(SolveStatus::Infeasible)
    );
}

#[test]
fn hubbed_picks_cheaper_hub_and_balances() {
    let plan = formulate(&two_hubs(), &params(800.0), ScenarioVariant::Hubbed).unwrap();
    let solution = solve_plan(&plan, backend().as_ref());

    // 800 × (10 + 10) + 50 + 100
    assert!((solution.total_cost.unwrap() - 16_150.0).abs() < TOL);
    assert_eq!(
        solution.built_transfers,
        vec![SiteKey::new(SiteKind::Transfer, 1)]
    );
    assert_eq!(
        solution.built_facilities,
        vec![SiteKey::new(SiteKind::Facility, 1)]
    );
    assert!(solution.delivered >= solution.goal - TOL);

    for hub in [1, 2] {
        let key = SiteKey::new(SiteKind::Transfer, hub);
        let inbound: f64 = solution
            .flows
            .iter()
            .filter(|f| f.destination == key)
            .map(|f| f.quantity)
            .sum();
        let outbound: f64 = solution
            .flows
            .iter()
            .filter(|f| f.origin == key)
            .map(|f| f.quantity)
            .sum();
        assert!((inbound - outbound).abs() < TOL);
    }
    assert!(verify_solution(&plan, &solution, TOL).is_empty());
}

#[test]
fn external_market_covers_shortfall() {
    let data = NetworkData::new()
        .with_source(1, 100.0)
        .with_transfer(1)
        .with_facility(1)
        .with_arc(ArcSet::SourceToTransfer, ArcRecord::new(1, 1, 10.0, 1.0))
        .with_arc(ArcSet::TransferToFacility, ArcRecord::new(1, 1, 10.0, 1.0));

    let hubbed = formulate(&data, &params(300.0), ScenarioVariant::Hubbed).unwrap();
    assert_eq!(
        solve_plan(&hubbed, backend().as_ref()).status,
        SolveStatus::Infeasible
    );

    let plan = formulate(
        &data,
        &params(300.0),
        ScenarioVariant::HubbedWithExternalMarket,
    )
    .unwrap();
    let solution = solve_plan(&plan, backend().as_ref());

    // 100 × 10 + 200 × 50 + 300 × 10 + 50 + 100
    assert!((solution.total_cost.unwrap() - 14_150.0).abs() < TOL);
    assert!((solution.external_purchase - 200.0).abs() < TOL);
    let market = solution
        .flows
        .iter()
        .find(|f| f.origin.kind == SiteKind::ExternalSource)
        .unwrap();
    assert_eq!(market.origin.id.value(), 2);
    assert_eq!(market.used_slots, None);
    assert!(verify_solution(&plan, &solution, TOL).is_empty());
}

#[test]
fn hubbed_tag_without_hubs_is_configuration_error() {
    let err = formulate(&single_lane(), &params(800.0), ScenarioVariant::Hubbed).unwrap_err();
    assert!(matches!(err, PlanError::Configuration(_)));
}

#[test]
fn tampered_assignment_fails_verification() {
    let plan = formulate(&single_lane(), &params(800.0), ScenarioVariant::Direct).unwrap();
    let mut solution = solve_plan(&plan, backend().as_ref());
    if let Some(values) = solution.assignment.as_mut() {
        values.iter_mut().for_each(|v| *v = 0.0);
    }
    let violations = verify_solution(&plan, &solution, TOL);
    assert!(violations.iter().any(|v| v.subject == "production goal"));
}

/// Six suppliers feeding three hubs and two plants; every supplier can reach
/// every hub and every hub both plants.
fn regional() -> NetworkData {
    let mut data = NetworkData::new().with_facility(1).with_facility(2);
    for supplier in 1..=6 {
        data = data.with_source(supplier, 600.0);
    }
    for hub in 1..=3 {
        data = data.with_transfer(hub);
        for supplier in 1..=6 {
            let distance = 10.0 + ((supplier + 2 * hub) % 5) as f64 * 3.0;
            data = data.with_arc(
                ArcSet::SourceToTransfer,
                ArcRecord::new(supplier, hub, distance, 1.0),
            );
        }
        for plant in 1..=2 {
            let distance = 20.0 + ((hub + plant) % 3) as f64 * 5.0;
            data = data.with_arc(
                ArcSet::TransferToFacility,
                ArcRecord::new(hub, plant, distance, 0.5),
            );
        }
    }
    data
}

#[test]
fn regional_hubbed_network_solves_with_slot_handling() {
    let mut p = params(3000.0);
    p.truck.trip_handling_cost = 10.0;
    let plan = formulate(&regional(), &p, ScenarioVariant::Hubbed).unwrap();
    let solution = solve_plan(&plan, backend().as_ref());

    assert_eq!(solution.status, SolveStatus::Optimal);
    assert!(verify_solution(&plan, &solution, TOL).is_empty());
    assert!(solution.delivered >= 3000.0 - TOL);
    // 1500 Mg per hub and 2000 L per plant
    assert!(solution.built_transfers.len() >= 2);
    assert_eq!(solution.built_facilities.len(), 2);

    for flow in solution.flows.iter().filter(|f| f.origin.kind == SiteKind::Source) {
        let trips = ((flow.quantity - TOL) / 500.0).ceil().max(0.0) as usize;
        assert_eq!(flow.used_slots, Some(trips), "{flow:?}");
    }

    p.handling_policy = HandlingCostPolicy::PerLoad;
    let relaxed = formulate(&regional(), &p, ScenarioVariant::Hubbed).unwrap();
    let per_load = solve_plan(&relaxed, backend().as_ref());
    assert_eq!(per_load.status, SolveStatus::Optimal);
    assert!(solution.total_cost.unwrap() >= per_load.total_cost.unwrap() - TOL);
}
