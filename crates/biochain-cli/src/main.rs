use biochain_cli::cli::{Cli, Commands};
use clap::Parser;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

mod commands;

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("could not install log subscriber: {err}");
    }

    let result = match cli.command {
        Commands::Solve {
            plan,
            solver,
            out,
            detailed,
        } => commands::solve::handle(&plan, solver, out.as_deref(), detailed),
        Commands::Run {
            scenarios,
            data,
            out_dir,
        } => commands::run::handle(&scenarios, data.as_deref(), out_dir.as_deref()),
        Commands::Inspect { plan } => commands::inspect::handle(&plan),
        Commands::Validate { data, variant } => commands::validate::handle(&data, variant),
        Commands::Scenarios { command } => commands::scenarios::handle(&command),
    };

    if let Err(err) = result {
        error!("{err:#}");
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
