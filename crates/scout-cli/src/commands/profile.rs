use scout_refresh::RefreshMode;

use crate::cli::root_commands::ProfileArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::parse::profile_ref;
use crate::commands::shared::rows::OutcomeRow;
use crate::context::AppContext;
use crate::output::output;

/// Handle `scout profile <kind> <id>`.
pub async fn handle(args: &ProfileArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.require_collaborators()?;
    let profile = profile_ref(&args.kind, args.id)?;
    let mode = if args.reclassify {
        RefreshMode::Reclassify
    } else {
        RefreshMode::Normal
    };

    let outcome = ctx.orchestrator()?.refresh_one(profile, mode).await?;
    if flags.format == OutputFormat::Table {
        output(&[OutcomeRow::from(&outcome)], flags.format)
    } else {
        output(&outcome, flags.format)
    }
}
