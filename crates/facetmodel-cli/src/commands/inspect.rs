//! Implementation of the `facetmodel inspect` command.

use serde::Serialize;
use tracing::instrument;

use facetmodel_core::{application::SpecificationSummary, domain::TypeName};

use crate::{
    cli::InspectArgs, commands::metamodel_service, config::AppConfig, error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct InspectReport<'a> {
    specifications: &'a [SpecificationSummary],
    failures: &'a [String],
}

/// Build the metamodel and print it.  Validation failures are reported as
/// warnings; use `validate` to turn them into a failing exit code.
#[instrument(skip_all, fields(dir = %args.model.dir.display()))]
pub fn execute(args: InspectArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = metamodel_service(&args.model, &config);
    let model = service.build()?;

    let summaries = match &args.type_name {
        Some(name) => vec![service.describe(&model, &TypeName::new(name.as_str()))?],
        None => service.summaries(&model),
    };
    let failures = model.failures().messages();

    if output.is_json() {
        return output.json(&InspectReport {
            specifications: &summaries,
            failures: &failures,
        });
    }

    for summary in &summaries {
        render(&output, summary, args.facets)?;
    }
    for failure in &failures {
        output.warning(failure)?;
    }
    output.print(&format!(
        "{} specification(s), {} validation failure(s)",
        summaries.len(),
        failures.len()
    ))?;
    Ok(())
}

fn render(output: &OutputManager, summary: &SpecificationSummary, facets: bool) -> CliResult<()> {
    let title = if summary.mixin {
        format!("{} (mixin)", summary.type_name)
    } else {
        summary.type_name.clone()
    };
    output.header(&title)?;
    if facets {
        for facet in &summary.facets {
            output.detail(&format!(
                "    {} [{}] {}",
                facet.facet_type, facet.precedence, facet.value
            ))?;
        }
    }

    for member in &summary.members {
        let origin = member
            .mixed_in
            .as_deref()
            .map(|m| format!("  (from {m})"))
            .unwrap_or_default();
        output.print(&format!("  {:<10} {}{origin}", member.kind, member.id))?;
        if facets {
            for facet in &member.facets {
                output.detail(&format!(
                    "      {} [{}] {}",
                    facet.facet_type, facet.precedence, facet.value
                ))?;
            }
        }
    }
    Ok(())
}
