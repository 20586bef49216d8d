//! Model inspection without solving.

use anyhow::{Context, Result};
use biochain_algo::plan::formulate;
use biochain_cli::PlanArgs;

use super::{load_data, parameters};

pub fn handle(args: &PlanArgs) -> Result<()> {
    let data = load_data(args)?;
    let params = parameters(args);
    let plan = formulate(&data, &params, args.variant)
        .with_context(|| format!("formulating {} scenario", args.variant))?;

    let network = plan.network.stats();
    println!("Scenario: {}", args.variant);
    println!(
        "Sites: {} suppliers, {} hubs, {} plants{}",
        network.num_sources,
        network.num_transfers,
        network.num_facilities,
        if network.has_external_source {
            " + external market"
        } else {
            ""
        }
    );
    println!(
        "Routes: {} ({} truck, {} train)",
        network.num_routes, network.num_truck_routes, network.num_train_routes
    );
    println!(
        "Supply: {:.2} Mg, goal {:.2} Mg",
        network.total_supply_mg,
        params.goal_mass().value()
    );
    println!("{}", plan.stats());
    Ok(())
}
