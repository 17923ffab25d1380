use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "gstate - ground-state energies of electronic and vibrational problems via qubit mappings and exact or variational eigensolvers.",
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

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the ground state of a problem description.
    Solve(SolveArgs),
    /// Map a problem onto qubits and summarize the resulting Hamiltonian.
    Inspect(InspectArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverChoice {
    /// Full diagonalization of the qubit Hamiltonian.
    Exact,
    /// Variational minimization over a parameterized trial state.
    Vqe,
}

/// Arguments for the `solve` subcommand.
#[derive(Args, Debug)]
pub struct SolveArgs {
    // --- Core Arguments ---
    /// Path to the problem description file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub descriptor: PathBuf,

    /// Path to the solver configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the full result as TOML.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write the energy of every variational evaluation as CSV.
    #[arg(long, value_name = "PATH")]
    pub history: Option<PathBuf>,

    /// Write the measured observables as CSV.
    #[arg(long, value_name = "PATH")]
    pub observables: Option<PathBuf>,

    // --- Overrides ---
    /// Override the qubit mapping (jordan-wigner, parity, bravyi-kitaev, direct).
    #[arg(short, long, value_name = "NAME")]
    pub mapping: Option<String>,

    /// Remove two qubits using the parity mapping's particle-number symmetries.
    #[arg(long)]
    pub two_qubit_reduction: bool,

    /// Override the eigensolver.
    #[arg(short, long, value_enum, value_name = "SOLVER")]
    pub solver: Option<SolverChoice>,

    /// Override the optimizer iteration budget of the variational solver.
    #[arg(long, value_name = "INT")]
    pub max_iterations: Option<u64>,

    /// Abort the solve after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S solver.vqe.optimizer=lbfgs
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the problem description file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub descriptor: PathBuf,

    /// Qubit mapping to apply. Defaults to the problem class's default mapping.
    #[arg(short, long, value_name = "NAME")]
    pub mapping: Option<String>,

    /// Remove two qubits using the parity mapping's particle-number symmetries.
    #[arg(long)]
    pub two_qubit_reduction: bool,

    /// Number of leading Pauli terms to print.
    #[arg(short, long, default_value_t = 10, value_name = "INT")]
    pub terms: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_arguments_are_parsed() {
        let cli = Cli::parse_from([
            "gstate",
            "solve",
            "-d",
            "h2.toml",
            "--solver",
            "vqe",
            "--mapping",
            "parity",
            "--two-qubit-reduction",
            "-S",
            "solver.vqe.optimizer=lbfgs",
            "filter.particle-number=2",
        ]);
        let Commands::Solve(args) = cli.command else {
            panic!("expected solve command");
        };
        assert_eq!(args.descriptor, PathBuf::from("h2.toml"));
        assert_eq!(args.solver, Some(SolverChoice::Vqe));
        assert_eq!(args.mapping.as_deref(), Some("parity"));
        assert!(args.two_qubit_reduction);
        assert_eq!(args.set_values.len(), 2);
    }

    #[test]
    fn inspect_defaults_to_ten_terms() {
        let cli = Cli::parse_from(["gstate", "-vv", "inspect", "-d", "h2.toml"]);
        assert_eq!(cli.verbose, 2);
        let Commands::Inspect(args) = cli.command else {
            panic!("expected inspect command");
        };
        assert_eq!(args.terms, 10);
        assert!(args.mapping.is_none());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["gstate", "-q", "-v", "inspect", "-d", "h2.toml"]);
        assert!(result.is_err());
    }
}
