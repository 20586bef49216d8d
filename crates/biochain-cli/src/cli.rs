use biochain_algo::plan::{HandlingCostPolicy, ScenarioVariant};
use biochain_algo::MilpSolverKind;
use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "biochain", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Formulate and solve one scenario
    Solve {
        #[command(flatten)]
        plan: PlanArgs,
        /// MILP backend (defaults to the first one compiled in)
        #[arg(long)]
        solver: Option<MilpSolverKind>,
        /// Write the solution report as JSON
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        /// Print the full cost breakdown instead of the one-line result
        #[arg(long)]
        detailed: bool,
    },
    /// Solve every scenario of a scenario-set file
    Run {
        /// Scenario-set file (YAML or JSON)
        #[arg(long, value_hint = ValueHint::FilePath)]
        scenarios: PathBuf,
        /// Data directory for scenarios that do not name one
        #[arg(long, value_hint = ValueHint::DirPath)]
        data: Option<PathBuf>,
        /// Directory for per-scenario solutions and the run manifest
        #[arg(long, value_hint = ValueHint::DirPath)]
        out_dir: Option<PathBuf>,
    },
    /// Build a scenario model and print its size without solving
    Inspect {
        #[command(flatten)]
        plan: PlanArgs,
    },
    /// Check a data directory and report every problem found
    Validate {
        /// Directory holding the CSV tables
        #[arg(long, value_hint = ValueHint::DirPath)]
        data: PathBuf,
        /// Also check that the data supports this scenario variant
        #[arg(long)]
        variant: Option<ScenarioVariant>,
    },
    /// Scenario-set utilities
    Scenarios {
        #[command(subcommand)]
        command: ScenariosCommands,
    },
}

/// Data and parameter flags shared by commands that build a model
#[derive(clap::Args, Debug, Clone)]
pub struct PlanArgs {
    /// Directory holding the CSV tables
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub data: PathBuf,
    /// direct, hubbed or hubbed-with-external-market
    #[arg(long, default_value = "direct")]
    pub variant: ScenarioVariant,
    /// Fuel volume plants must produce, in liters
    #[arg(long)]
    pub goal_liters: Option<f64>,
    /// per-dispatched-slot or per-load
    #[arg(long)]
    pub handling_policy: Option<HandlingCostPolicy>,
}

#[derive(Subcommand, Debug)]
pub enum ScenariosCommands {
    /// Check that a scenario-set file resolves
    Validate {
        /// Scenario-set file (YAML or JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        spec: PathBuf,
    },
    /// List the resolved scenarios of a scenario-set file
    List {
        /// Scenario-set file (YAML or JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        spec: PathBuf,
    },
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
