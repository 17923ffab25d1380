use crate::cli::SolveArgs;
use crate::config::PartialGroundStateConfig;
use crate::config::defaults::DefaultsConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use groundstate::core::io::descriptor_file::load_descriptor;
use groundstate::core::io::trace::{write_energy_trace, write_observables};
use groundstate::engine::cancellation::CancellationToken;
use groundstate::engine::progress::ProgressReporter;
use groundstate::engine::result::GroundStateResult;
use groundstate::workflows;
use std::path::Path;
use tracing::{debug, info, warn};

pub async fn run(args: SolveArgs) -> Result<()> {
    let result = execute(&args, CliProgressHandler::new()).await?;
    println!("{}", result);
    Ok(())
}

async fn execute(args: &SolveArgs, progress_handler: CliProgressHandler) -> Result<GroundStateResult> {
    let partial = match &args.config {
        Some(path) => PartialGroundStateConfig::from_file(path)?,
        None => PartialGroundStateConfig::default(),
    };
    let config = partial.merge_with_cli(args, &DefaultsConfig::default())?;
    debug!("Final solver configuration: {:?}", config);

    info!("Loading problem description from {:?}", args.descriptor);
    let descriptor = load_descriptor(&args.descriptor)?;

    let cancellation = CancellationToken::new();
    let listener = {
        let token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling the solve.");
                token.cancel();
            }
        })
    };

    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let outcome = tokio::task::block_in_place(|| {
        workflows::ground_state::run(&descriptor, &config, &reporter, &cancellation)
    });
    listener.abort();
    let result = outcome?;

    if let Some(path) = &args.output {
        write_result(path, &result)?;
        info!("Result written to {:?}", path);
    }
    if let Some(path) = &args.history {
        if result.solver.energy_history.is_empty() {
            warn!("The exact solver records no convergence trace; writing an empty history.");
        }
        write_energy_trace(path, &result.solver.energy_history)?;
        info!("Convergence trace written to {:?}", path);
    }
    if let Some(path) = &args.observables {
        write_observables(path, &result.solver.aux_values)?;
        info!("Observables written to {:?}", path);
    }
    Ok(result)
}

fn write_result(path: &Path, result: &GroundStateResult) -> Result<()> {
    let content = toml::to_string(result)
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to serialize result: {}", e)))?;
    std::fs::write(path, content)?;
    Ok(())
}
