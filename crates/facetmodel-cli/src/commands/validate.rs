//! Implementation of the `facetmodel validate` command.

use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    cli::ValidateArgs,
    commands::metamodel_service,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    valid: bool,
    specifications: usize,
    failures: &'a [String],
}

/// Build the metamodel; any validation failure makes the command fail.
#[instrument(skip_all, fields(dir = %args.model.dir.display()))]
pub fn execute(args: ValidateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = metamodel_service(&args.model, &config);
    let model = service.build()?;
    let failures = model.failures().messages();

    if output.is_json() {
        output.json(&ValidationReport {
            valid: failures.is_empty(),
            specifications: model.len(),
            failures: &failures,
        })?;
    }

    if !failures.is_empty() {
        return Err(CliError::InvalidModel { failures });
    }

    info!(specifications = model.len(), "metamodel is valid");
    if !output.is_json() {
        output.success(&format!(
            "Metamodel is valid ({} specifications)",
            model.len()
        ))?;
    }
    Ok(())
}
