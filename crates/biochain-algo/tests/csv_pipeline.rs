//! Load a data directory from disk and plan over it.

use biochain_algo::plan::{plan_supply_chain, PlanParameters, ScenarioVariant};
use biochain_algo::{MilpSolverKind, SolveStatus};
use biochain_core::units::{Liters, LitersPerMegagram};
use biochain_core::{SiteKey, SiteKind};
use biochain_io::load_data_dir;
use std::fs;
use tempfile::tempdir;

#[test]
fn solves_a_csv_data_set() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("suppliers.csv"), "id,supply\n1,600\n2,600\n").unwrap();
    fs::write(dir.path().join("plants.csv"), "id\n1\n2\n").unwrap();
    fs::write(
        dir.path().join("roads_s_p.csv"),
        "origin,destination,distance,rate\n1,1,5,1\n2,1,8,1\n1,2,30,1\n2,2,2,1\n",
    )
    .unwrap();

    let data = load_data_dir(dir.path()).unwrap().into_data().unwrap();
    let params = PlanParameters {
        facility_capacity: Liters(1000.0),
        production_goal: Liters(900.0),
        fuel_yield: LitersPerMegagram(1.0),
        facility_activation_cost: 10_000.0,
        ..PlanParameters::default()
    };

    let solution =
        plan_supply_chain(&data, &params, ScenarioVariant::Direct, MilpSolverKind::default())
            .unwrap();
    assert_eq!(solution.status, SolveStatus::Optimal);
    // one 500 Mg trip from each supplier into plant 1 beats opening both
    assert_eq!(
        solution.built_facilities,
        vec![SiteKey::new(SiteKind::Facility, 1)]
    );
    assert!((solution.total_cost.unwrap() - 35_700.0).abs() < 1e-4);
    assert!(solution.delivered >= 900.0 - 1e-4);
}
