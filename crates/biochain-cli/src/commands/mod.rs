pub mod inspect;
pub mod run;
pub mod scenarios;
pub mod solve;
pub mod validate;

use anyhow::{Context, Result};
use biochain_algo::plan::PlanParameters;
use biochain_cli::PlanArgs;
use biochain_core::data::NetworkData;
use biochain_core::units::Liters;
use biochain_io::load_data_dir;

/// Default parameters with the command-line overrides applied
pub(crate) fn parameters(args: &PlanArgs) -> PlanParameters {
    let mut params = PlanParameters::default();
    if let Some(goal) = args.goal_liters {
        params.production_goal = Liters(goal);
    }
    if let Some(policy) = args.handling_policy {
        params.handling_policy = policy;
    }
    params
}

pub(crate) fn load_data(args: &PlanArgs) -> Result<NetworkData> {
    load_data_dir(&args.data)?
        .into_data()
        .with_context(|| format!("loading data set '{}'", args.data.display()))
}
