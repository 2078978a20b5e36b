use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use fcplan_model::{OptimizerConfig, Plan, optimize};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Correct syntax: fcplan inputFile outputFile";

#[derive(Parser, Debug)]
#[command(name = "fcplan")]
#[command(about = "Least-cost shipping plan from fulfillment centers to demand regions", long_about = None)]
struct Cli {
    /// Input workbook (FC sheet first, then Regions, Distances, Items, Demand)
    input: PathBuf,
    /// Output workbook (Summary, Solution, Capacity Constraints)
    output: PathBuf,
    /// Also print the plan as JSON
    #[arg(long)]
    json: bool,
    /// Show the LP solver log
    #[arg(long)]
    solver_output: bool,
    /// Log filter, e.g. info or fcplan_model=debug; RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    log_level: String,
}

enum Outcome {
    InputNotFound,
    Optimized(Plan),
}

enum Invocation {
    Run(Cli),
    Usage,
}

/// Anything but help, version or two paths is answered with the usage line.
fn parse_args<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Invocation::Run(cli)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => Err(e),
        Err(e) => {
            debug!(kind = ?e.kind(), "bad invocation");
            Ok(Invocation::Usage)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = match parse_args(std::env::args_os()) {
        Ok(Invocation::Run(cli)) => cli,
        Ok(Invocation::Usage) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Err(e) => e.exit(),
    };

    init_logging(&cli.log_level);

    match run(&cli)? {
        Outcome::InputNotFound => {
            println!("File \"{}\" not found!", cli.input.display());
        }
        Outcome::Optimized(plan) => {
            println!("Successfully optimized. Results in \"{}\"", cli.output.display());
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            }
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<Outcome> {
    if !cli.input.exists() {
        debug!(input = %cli.input.display(), "input file missing");
        return Ok(Outcome::InputNotFound);
    }

    let config = OptimizerConfig::default().with_solver_output(cli.solver_output);
    let plan = optimize(&cli.input, &cli.output, &config)
        .with_context(|| format!("failed to optimize {}", cli.input.display()))?;
    Ok(Outcome::Optimized(plan))
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
