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
    author = "The toymd developers",
    version,
    about = "toymd CLI - A minimal molecular dynamics engine with harmonic bonds and angles, Lennard-Jones interactions and Berendsen temperature coupling in a periodic box.",
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
    /// Run a molecular dynamics simulation of a structure in a periodic box.
    Run(RunArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    // --- Input Files ---
    /// Path to the input coordinates (PDB with a CRYST1 record).
    #[arg(short = 'c', long = "coordinates", required = true, value_name = "PATH")]
    pub coordinates: PathBuf,

    /// Path to the run parameter file in TOML format.
    #[arg(short = 'p', long = "parameters", required = true, value_name = "PATH")]
    pub parameters: PathBuf,

    /// Path to the force field file in TOML format.
    #[arg(short = 'f', long = "forcefield", required = true, value_name = "PATH")]
    pub forcefield: PathBuf,

    // --- Output Files ---
    /// Path of the multi-model trajectory file.
    #[arg(short = 'o', long, default_value = "traj.pdb", value_name = "PATH")]
    pub trajectory: PathBuf,

    /// Path of the final coordinates, written after the last step.
    #[arg(short = 'w', long = "outcoords", value_name = "PATH")]
    pub outcoords: Option<PathBuf>,

    /// Write per-step energies to a CSV file.
    #[arg(short = 'e', long, value_name = "PATH")]
    pub energy_log: Option<PathBuf>,

    // --- Parameter Overrides ---
    /// Override `number-of-steps` from the parameter file.
    #[arg(short = 'n', long, value_name = "INT")]
    pub steps: Option<usize>,

    /// Override `time-step` (ps) from the parameter file.
    #[arg(long, value_name = "FLOAT")]
    pub time_step: Option<f64>,

    /// Override the target `temperature` (K) from the parameter file.
    #[arg(short = 't', long, value_name = "FLOAT")]
    pub temperature: Option<f64>,

    /// Override the Lennard-Jones `cutoff` (nm) from the parameter file.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,

    /// Disable temperature coupling, even if it is enabled in the parameter file.
    #[arg(long)]
    pub no_thermostat: bool,

    /// Set a specific parameter value, overriding the parameter file.
    /// Can be used multiple times. Example: -S tau-T=0.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_arguments_parse_with_defaults() {
        let cli = Cli::parse_from([
            "toymd", "run", "-c", "in.pdb", "-p", "md.toml", "-f", "ff.toml",
        ]);
        let Commands::Run(args) = cli.command;
        assert_eq!(args.coordinates, PathBuf::from("in.pdb"));
        assert_eq!(args.trajectory, PathBuf::from("traj.pdb"));
        assert!(args.outcoords.is_none());
        assert!(args.set_values.is_empty());
        assert!(!args.no_thermostat);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn overrides_and_global_flags_are_collected() {
        let cli = Cli::parse_from([
            "toymd",
            "run",
            "-c",
            "in.pdb",
            "-p",
            "md.toml",
            "-f",
            "ff.toml",
            "-n",
            "50",
            "--cutoff",
            "0.9",
            "-S",
            "tau-T=0.5",
            "-S",
            "output-frequency=5",
            "-vv",
        ]);
        let Commands::Run(args) = cli.command;
        assert_eq!(args.steps, Some(50));
        assert_eq!(args.cutoff, Some(0.9));
        assert_eq!(args.set_values, vec!["tau-T=0.5", "output-frequency=5"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        let result = Cli::try_parse_from([
            "toymd", "run", "-c", "a", "-p", "b", "-f", "c", "-v", "-q",
        ]);
        assert!(result.is_err());
    }
}
