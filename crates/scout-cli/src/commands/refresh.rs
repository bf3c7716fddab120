use serde::Serialize;

use scout_core::enums::ProfileKind;
use scout_refresh::{BatchCounts, BatchOptions, BatchReport};

use crate::cli::root_commands::RefreshArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::parse::parse_optional_enum;
use crate::commands::shared::rows::OutcomeRow;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct RefreshTableResponse {
    counts: BatchCounts,
    outcomes: Vec<OutcomeRow>,
}

/// Handle `scout refresh`.
pub async fn handle(args: &RefreshArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require_collaborators()?;
    let options = BatchOptions {
        kind: parse_optional_enum::<ProfileKind>(args.kind.as_deref(), "kind")?,
        company: args.company.clone(),
        limit: flags.limit,
        force: args.force,
    };

    let orchestrator = ctx.orchestrator()?;
    let report = tokio::select! {
        report = orchestrator.run_batch(&options) => report?,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted; unfinished profiles stay due for the next run");
            anyhow::bail!("refresh interrupted");
        }
    };

    if flags.format == OutputFormat::Table {
        print_table(&report, flags)
    } else {
        output(&report, flags.format)
    }
}

fn print_table(report: &BatchReport, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = RefreshTableResponse {
        counts: report.counts,
        outcomes: report.outcomes.iter().map(OutcomeRow::from).collect(),
    };
    output(&response.outcomes, flags.format)?;
    if !flags.quiet {
        println!();
        output(&response.counts, flags.format)?;
    }
    Ok(())
}
