//! Ohmgrid - DC analyzer for resistive networks with LEDs
//!
//! # Usage
//!
//! ```bash
//! ohmgrid circuit.net
//! ohmgrid circuit.net --ground gnd --format json
//! ohmgrid demo parallel-series -v
//! ```

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use ohmgrid_core::{
    circuit::Circuit,
    demos::Demo,
    error::Result,
    netlist,
    report::Report,
    solver::{SolverConfig, DEFAULT_MAX_ITERATIONS},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// DC operating-point analyzer for resistive networks with LEDs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the netlist file
    #[arg(value_name = "NETLIST")]
    netlist: Option<PathBuf>,

    #[command(flatten)]
    solve: SolveArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve one of the built-in example circuits
    Demo {
        #[arg(value_enum)]
        which: Demo,
    },
}

#[derive(clap::Args, Debug)]
struct SolveArgs {
    /// Reference node (overrides the netlist's .ground directive)
    #[arg(short, long, global = true)]
    ground: Option<String>,

    /// Maximum threshold-state iterations
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Fail instead of reporting a result whose LED states did not settle
    #[arg(long, global = true)]
    strict: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Human,
    /// JSON solution
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.solve.verbose);

    let (mut circuit, ground) = match (&cli.command, &cli.netlist) {
        (Some(Commands::Demo { which }), _) => {
            info!(demo = %which, "building demo circuit");
            (which.circuit()?, netlist::GROUND_NAME.to_string())
        }
        (None, Some(path)) => {
            let ast = netlist::parse_file(path)?;
            let ground = ast.ground_node().to_string();
            (Circuit::from_netlist(&ast)?, ground)
        }
        (None, None) => Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "a NETLIST path or the `demo` subcommand is required",
            )
            .exit(),
    };
    let ground = cli.solve.ground.clone().unwrap_or(ground);

    let config = SolverConfig::new()
        .with_max_iterations(cli.solve.max_iterations)
        .with_strict(cli.solve.strict);
    let solution = circuit.solve_with(&ground, &config)?;

    match cli.solve.format {
        OutputFormat::Human => println!("{}", Report::new(&solution)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&solution)?),
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
