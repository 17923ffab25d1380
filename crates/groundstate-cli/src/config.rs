pub mod defaults;

use crate::cli::{SolveArgs, SolverChoice};
use crate::error::{CliError, Result};
use crate::utils::parser;
use defaults::DefaultsConfig;
use groundstate::core::mapping::Mapping;
use groundstate::core::transformers::active_space::ActiveSpace;
use groundstate::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialActiveSpace {
    num_electrons: Option<usize>,
    num_spatial_orbitals: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialExactConfig {
    num_eigenvalues: Option<usize>,
    max_qubits: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialVariationalConfig {
    ansatz: Option<String>,
    reps: Option<usize>,
    optimizer: Option<String>,
    max_iterations: Option<u64>,
    tolerance: Option<f64>,
    initial_step: Option<f64>,
    gradient_step: Option<f64>,
    seed: Option<u64>,
    initial_point: Option<Vec<f64>>,
    max_qubits: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialSolverSection {
    #[serde(rename = "type")]
    kind: Option<String>,
    exact: Option<PartialExactConfig>,
    vqe: Option<PartialVariationalConfig>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialFilterConfig {
    match_problem_sector: Option<bool>,
    particle_number: Option<f64>,
    magnetization: Option<f64>,
    angular_momentum: Option<f64>,
    single_occupation_per_mode: Option<bool>,
}

/// Solver settings as read from a TOML file; every field is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialGroundStateConfig {
    mapping: Option<String>,
    two_qubit_reduction: Option<bool>,
    freeze_core: Option<bool>,
    timeout_seconds: Option<f64>,
    active_space: Option<PartialActiveSpace>,
    solver: Option<PartialSolverSection>,
    filter: Option<PartialFilterConfig>,
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}

fn parse_solver_kind(name: &str) -> Result<SolverChoice> {
    match name.trim().to_ascii_lowercase().as_str() {
        "exact" | "numpy" => Ok(SolverChoice::Exact),
        "vqe" | "variational" => Ok(SolverChoice::Vqe),
        _ => Err(CliError::Config(format!(
            "Unknown solver type '{}'. Expected 'exact' or 'vqe'.",
            name
        ))),
    }
}

impl PartialGroundStateConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(
        mut self,
        args: &SolveArgs,
        defaults: &DefaultsConfig,
    ) -> Result<core_config::GroundStateConfig> {
        self.apply_set_values(&args.set_values)?;

        let solver_section = self.solver.take().unwrap_or_default();
        let filter_config = self.filter.take().unwrap_or_default();

        let mut builder = core_config::GroundStateConfigBuilder::new()
            .two_qubit_reduction(
                args.two_qubit_reduction || self.two_qubit_reduction.unwrap_or(false),
            )
            .freeze_core(self.freeze_core.unwrap_or(false));

        if let Some(mapping) = Self::merge_mapping(args.mapping.as_deref(), self.mapping.as_deref())? {
            builder = builder.mapping(mapping);
        }
        if let Some(active_space) = Self::merge_active_space(self.active_space)? {
            builder = builder.active_space(active_space);
        }
        if let Some(timeout) = Self::merge_timeout(args.timeout.or(self.timeout_seconds))? {
            builder = builder.timeout(timeout);
        }

        let solver = Self::merge_solver(args, solver_section, defaults)?;
        let filter = Self::merge_filter(filter_config, defaults);

        builder
            .solver(solver)
            .filter(filter)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn merge_mapping(cli_val: Option<&str>, file_val: Option<&str>) -> Result<Option<Mapping>> {
        cli_val
            .or(file_val)
            .map(|name| parser::parse_mapping(name).map_err(|e| CliError::Argument(e.to_string())))
            .transpose()
    }

    fn merge_active_space(partial: Option<PartialActiveSpace>) -> Result<Option<ActiveSpace>> {
        let Some(partial) = partial else {
            return Ok(None);
        };
        let num_electrons = partial.num_electrons.ok_or_else(|| {
            CliError::Config("`active-space` requires `num-electrons`".to_string())
        })?;
        let num_spatial_orbitals = partial.num_spatial_orbitals.ok_or_else(|| {
            CliError::Config("`active-space` requires `num-spatial-orbitals`".to_string())
        })?;
        Ok(Some(ActiveSpace::new(num_electrons, num_spatial_orbitals)))
    }

    fn merge_timeout(seconds: Option<f64>) -> Result<Option<Duration>> {
        match seconds {
            None => Ok(None),
            Some(s) if s.is_finite() && s > 0.0 => Duration::try_from_secs_f64(s)
                .map(Some)
                .map_err(|e| CliError::Config(format!("Timeout of {} seconds is out of range: {}", s, e))),
            Some(s) => Err(CliError::Config(format!(
                "Timeout must be a positive number of seconds, got {}",
                s
            ))),
        }
    }

    fn merge_solver(
        args: &SolveArgs,
        section: PartialSolverSection,
        defaults: &DefaultsConfig,
    ) -> Result<core_config::SolverConfig> {
        let choice = match (args.solver, section.kind.as_deref()) {
            (Some(choice), _) => choice,
            (None, Some(name)) => parse_solver_kind(name)?,
            (None, None) => parse_solver_kind(defaults.solver)?,
        };

        match choice {
            SolverChoice::Exact => {
                let exact = section.exact.unwrap_or_default();
                let config = core_config::ExactSolverConfigBuilder::new()
                    .num_eigenvalues(exact.num_eigenvalues.unwrap_or(defaults.num_eigenvalues))
                    .max_qubits(exact.max_qubits.unwrap_or(defaults.exact_max_qubits))
                    .build()
                    .map_err(|e| CliError::Config(e.to_string()))?;
                Ok(core_config::SolverConfig::Exact(config))
            }
            SolverChoice::Vqe => {
                let vqe = section.vqe.unwrap_or_default();
                let reps = vqe.reps.unwrap_or(defaults.reps);
                let ansatz = parser::parse_ansatz(vqe.ansatz.as_deref().unwrap_or(defaults.ansatz), reps)
                    .map_err(|e| CliError::Config(e.to_string()))?;
                let optimizer =
                    parser::parse_optimizer(vqe.optimizer.as_deref().unwrap_or(defaults.optimizer))
                        .map_err(|e| CliError::Config(e.to_string()))?;
                let initial_point = match (vqe.initial_point, vqe.seed) {
                    (Some(values), _) => core_config::InitialPoint::Explicit(values),
                    (None, Some(seed)) => core_config::InitialPoint::Random { seed },
                    (None, None) => core_config::InitialPoint::Zeros,
                };
                let config = core_config::VariationalSolverConfigBuilder::new()
                    .ansatz(ansatz)
                    .optimizer(optimizer)
                    .initial_point(initial_point)
                    .max_iterations(
                        args.max_iterations
                            .or(vqe.max_iterations)
                            .unwrap_or(defaults.max_iterations),
                    )
                    .tolerance(vqe.tolerance.unwrap_or(defaults.tolerance))
                    .initial_step(vqe.initial_step.unwrap_or(defaults.initial_step))
                    .gradient_step(vqe.gradient_step.unwrap_or(defaults.gradient_step))
                    .max_qubits(vqe.max_qubits.unwrap_or(defaults.variational_max_qubits))
                    .build()
                    .map_err(|e| CliError::Config(e.to_string()))?;
                Ok(core_config::SolverConfig::Variational(config))
            }
        }
    }

    fn merge_filter(
        partial: PartialFilterConfig,
        defaults: &DefaultsConfig,
    ) -> core_config::FilterConfig {
        core_config::FilterConfig {
            match_problem_sector: partial
                .match_problem_sector
                .unwrap_or(defaults.match_problem_sector),
            particle_number: partial.particle_number,
            magnetization: partial.magnetization,
            angular_momentum: partial.angular_momentum,
            single_occupation_per_mode: partial.single_occupation_per_mode.unwrap_or(false),
        }
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value) =
                parser::parse_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;

            match key {
                "mapping" => self.mapping = Some(value.to_string()),
                "two-qubit-reduction" => self.two_qubit_reduction = Some(parse_value(key, value)?),
                "freeze-core" => self.freeze_core = Some(parse_value(key, value)?),
                "timeout-seconds" => self.timeout_seconds = Some(parse_value(key, value)?),
                "active-space.num-electrons" => {
                    self.active_space
                        .get_or_insert_with(Default::default)
                        .num_electrons = Some(parse_value(key, value)?);
                }
                "active-space.num-spatial-orbitals" => {
                    self.active_space
                        .get_or_insert_with(Default::default)
                        .num_spatial_orbitals = Some(parse_value(key, value)?);
                }
                "solver.type" => {
                    self.solver.get_or_insert_with(Default::default).kind = Some(value.to_string());
                }
                "solver.exact.num-eigenvalues" => {
                    self.exact_section().num_eigenvalues = Some(parse_value(key, value)?);
                }
                "solver.exact.max-qubits" => {
                    self.exact_section().max_qubits = Some(parse_value(key, value)?);
                }
                "solver.vqe.ansatz" => self.vqe_section().ansatz = Some(value.to_string()),
                "solver.vqe.reps" => self.vqe_section().reps = Some(parse_value(key, value)?),
                "solver.vqe.optimizer" => self.vqe_section().optimizer = Some(value.to_string()),
                "solver.vqe.max-iterations" => {
                    self.vqe_section().max_iterations = Some(parse_value(key, value)?);
                }
                "solver.vqe.tolerance" => {
                    self.vqe_section().tolerance = Some(parse_value(key, value)?);
                }
                "solver.vqe.initial-step" => {
                    self.vqe_section().initial_step = Some(parse_value(key, value)?);
                }
                "solver.vqe.gradient-step" => {
                    self.vqe_section().gradient_step = Some(parse_value(key, value)?);
                }
                "solver.vqe.seed" => self.vqe_section().seed = Some(parse_value(key, value)?),
                "solver.vqe.initial-point" => {
                    let values = value
                        .split(',')
                        .map(|v| parse_value(key, v.trim()))
                        .collect::<Result<Vec<f64>>>()?;
                    self.vqe_section().initial_point = Some(values);
                }
                "solver.vqe.max-qubits" => {
                    self.vqe_section().max_qubits = Some(parse_value(key, value)?);
                }
                "filter.match-problem-sector" => {
                    self.filter_section().match_problem_sector = Some(parse_value(key, value)?);
                }
                "filter.particle-number" => {
                    self.filter_section().particle_number = Some(parse_value(key, value)?);
                }
                "filter.magnetization" => {
                    self.filter_section().magnetization = Some(parse_value(key, value)?);
                }
                "filter.angular-momentum" => {
                    self.filter_section().angular_momentum = Some(parse_value(key, value)?);
                }
                "filter.single-occupation-per-mode" => {
                    self.filter_section().single_occupation_per_mode =
                        Some(parse_value(key, value)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    fn exact_section(&mut self) -> &mut PartialExactConfig {
        self.solver
            .get_or_insert_with(Default::default)
            .exact
            .get_or_insert_with(Default::default)
    }

    fn vqe_section(&mut self) -> &mut PartialVariationalConfig {
        self.solver
            .get_or_insert_with(Default::default)
            .vqe
            .get_or_insert_with(Default::default)
    }

    fn filter_section(&mut self) -> &mut PartialFilterConfig {
        self.filter.get_or_insert_with(Default::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use core_config::{AnsatzKind, InitialPoint, OptimizerKind, SolverConfig};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn write_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let file_path = dir.path().join("solver.toml");
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn solve_args(extra: &[&str]) -> SolveArgs {
        let mut argv = vec!["gstate", "solve", "-d", "h2.toml"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Solve(args) => args,
            other => panic!("expected solve command, got {other:?}"),
        }
    }

    fn merge(partial: PartialGroundStateConfig, extra: &[&str]) -> Result<core_config::GroundStateConfig> {
        partial.merge_with_cli(&solve_args(extra), &DefaultsConfig::default())
    }

    #[test]
    fn empty_config_falls_back_to_defaults() {
        let config = merge(PartialGroundStateConfig::default(), &[]).unwrap();
        assert_eq!(config.mapping, None);
        assert!(!config.two_qubit_reduction);
        assert!(config.filter.match_problem_sector);
        assert_eq!(config.timeout, None);
        match config.solver {
            SolverConfig::Exact(exact) => {
                assert_eq!(exact.num_eigenvalues, 1);
                assert_eq!(exact.max_qubits, 14);
            }
            other => panic!("unexpected solver {other:?}"),
        }
    }

    #[test]
    fn load_from_file_and_merge_with_defaults() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            mapping = "parity"
            two-qubit-reduction = true
            timeout-seconds = 30

            [active-space]
            num-electrons = 2
            num-spatial-orbitals = 2

            [solver]
            type = "vqe"

            [solver.vqe]
            optimizer = "lbfgs"
            seed = 42
            max-iterations = 250

            [filter]
            particle-number = 2.0
            "#,
        );
        let config = merge(PartialGroundStateConfig::from_file(&path).unwrap(), &[]).unwrap();

        assert_eq!(config.mapping, Some(Mapping::Parity));
        assert!(config.two_qubit_reduction);
        assert_eq!(config.active_space, Some(ActiveSpace::new(2, 2)));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.filter.particle_number, Some(2.0));
        match config.solver {
            SolverConfig::Variational(vqe) => {
                assert_eq!(vqe.optimizer, OptimizerKind::Lbfgs);
                assert_eq!(vqe.ansatz, AnsatzKind::Excitations);
                assert_eq!(vqe.initial_point, InitialPoint::Random { seed: 42 });
                assert_eq!(vqe.max_iterations, 250);
                assert_eq!(vqe.tolerance, 1e-8);
            }
            other => panic!("unexpected solver {other:?}"),
        }
    }

    #[test]
    fn cli_args_override_file_values() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            mapping = "bravyi-kitaev"
            timeout-seconds = 30

            [solver]
            type = "exact"

            [solver.vqe]
            max-iterations = 250
            "#,
        );
        let config = merge(
            PartialGroundStateConfig::from_file(&path).unwrap(),
            &[
                "--mapping",
                "jw",
                "--solver",
                "vqe",
                "--max-iterations",
                "10",
                "--timeout",
                "1.5",
            ],
        )
        .unwrap();

        assert_eq!(config.mapping, Some(Mapping::JordanWigner));
        assert_eq!(config.timeout, Some(Duration::from_millis(1500)));
        match config.solver {
            SolverConfig::Variational(vqe) => assert_eq!(vqe.max_iterations, 10),
            other => panic!("unexpected solver {other:?}"),
        }
    }

    #[test]
    fn set_value_overrides_file_and_defaults() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [solver]
            type = "vqe"

            [solver.vqe]
            ansatz = "excitations"
            "#,
        );
        let config = merge(
            PartialGroundStateConfig::from_file(&path).unwrap(),
            &[
                "-S",
                "solver.vqe.ansatz=real-amplitudes",
                "solver.vqe.reps=3",
                "solver.vqe.initial-point=0.1, 0.2",
                "filter.match-problem-sector=false",
            ],
        )
        .unwrap();

        assert!(!config.filter.match_problem_sector);
        match config.solver {
            SolverConfig::Variational(vqe) => {
                assert_eq!(vqe.ansatz, AnsatzKind::RealAmplitudes { reps: 3 });
                assert_eq!(vqe.initial_point, InitialPoint::Explicit(vec![0.1, 0.2]));
            }
            other => panic!("unexpected solver {other:?}"),
        }
    }

    #[test]
    fn unknown_set_key_is_rejected() {
        let err = merge(PartialGroundStateConfig::default(), &["-S", "solver.vqe.shots=100"])
            .unwrap_err();
        assert!(
            matches!(err, CliError::Config(msg) if msg.contains("Unsupported configuration key"))
        );
    }

    #[test]
    fn malformed_set_value_is_rejected() {
        let err = merge(PartialGroundStateConfig::default(), &["-S", "solver.vqe.reps=two"])
            .unwrap_err();
        assert!(matches!(err, CliError::Config(msg) if msg.contains("solver.vqe.reps")));
    }

    #[test]
    fn unknown_file_fields_are_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "shots = 1024\n");
        let err = PartialGroundStateConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { .. }));
    }

    #[test]
    fn incomplete_active_space_is_rejected() {
        let err = merge(
            PartialGroundStateConfig::default(),
            &["-S", "active-space.num-electrons=2"],
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Config(msg) if msg.contains("num-spatial-orbitals")));
    }

    #[test]
    fn builder_validation_surfaces_as_config_error() {
        let err = merge(
            PartialGroundStateConfig::default(),
            &["--mapping", "jordan-wigner", "--two-qubit-reduction"],
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Config(msg) if msg.contains("two_qubit_reduction")));
    }

    #[test]
    fn non_positive_timeout_is_rejected() {
        let err = merge(PartialGroundStateConfig::default(), &["--timeout", "0"]).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn out_of_range_timeout_is_rejected() {
        let err = merge(PartialGroundStateConfig::default(), &["--timeout", "1e20"]).unwrap_err();
        assert!(matches!(err, CliError::Config(msg) if msg.contains("out of range")));
    }
}
