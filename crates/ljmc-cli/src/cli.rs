use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The ljmc Developers",
    version,
    about = "ljmc CLI - Energy, virial and pressure of Lennard-Jones configurations using a cell-list Monte Carlo kernel.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate the energy, virial and pressure of a configuration.
    Energy(EnergyArgs),
    /// Write a face-centred cubic starting configuration as a CSV snapshot.
    Lattice(LatticeArgs),
}

/// Arguments for the `energy` subcommand.
#[derive(Args, Debug)]
pub struct EnergyArgs {
    /// Path to the run configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Path to a CSV snapshot (x,y,z in units of sigma).
    /// When omitted, an FCC lattice of `lattice.particles` particles is evaluated.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Override `system.box-length` from the config file.
    #[arg(short = 'L', long, value_name = "FLOAT")]
    pub box_length: Option<f64>,

    /// Override `system.cutoff` from the config file.
    #[arg(short = 'r', long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,

    /// Override `state.temperature` from the config file.
    #[arg(short = 'T', long, value_name = "FLOAT")]
    pub temperature: Option<f64>,

    /// Override `lattice.particles` from the config file.
    #[arg(short = 'n', long, value_name = "INT")]
    pub particles: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S system.cutoff=3.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `lattice` subcommand.
#[derive(Args, Debug)]
pub struct LatticeArgs {
    /// Number of particles to place.
    #[arg(short = 'n', long, required = true, value_name = "INT")]
    pub particles: usize,

    /// Side length of the cubic box in units of sigma.
    #[arg(short = 'L', long, required = true, value_name = "FLOAT")]
    pub box_length: f64,

    /// Path for the output CSV snapshot.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}
