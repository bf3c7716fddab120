use scout_core::enums::{ProfileKind, ProfileStatus};
use scout_refresh::ReviewDecision;

use crate::cli::subcommands::ReviewCommands;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_optional_enum, profile_ref};
use crate::commands::shared::rows::{OutcomeRow, ReviewRow};
use crate::context::AppContext;
use crate::output::output;

/// Handle `scout review <action>`.
pub async fn handle(action: &ReviewCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ReviewCommands::List { kind } => list(kind.as_deref(), ctx, flags).await,
        ReviewCommands::Approve { kind, id, status } => {
            let override_status = parse_optional_enum::<ProfileStatus>(status.as_deref(), "status")?;
            decide(kind, *id, ReviewDecision::Approve { override_status }, ctx, flags).await
        }
        ReviewCommands::Reject { kind, id } => decide(kind, *id, ReviewDecision::Reject, ctx, flags).await,
    }
}

async fn list(kind: Option<&str>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let kind = parse_optional_enum::<ProfileKind>(kind, "kind")?;
    let mut pending = ctx.service.list_pending_reviews(kind).await?;
    pending.truncate(usize::try_from(effective_limit(flags.limit, 100))?);

    if flags.format == OutputFormat::Table {
        let rows: Vec<ReviewRow> = pending.iter().filter_map(ReviewRow::from_record).collect();
        output(&rows, flags.format)
    } else {
        output(&pending, flags.format)
    }
}

/// Resolving a review never reaches the providers, so no keys are required.
async fn decide(
    kind: &str,
    id: i64,
    decision: ReviewDecision,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let profile = profile_ref(kind, id)?;
    let outcome = ctx.orchestrator()?.resolve_review(profile, decision).await?;
    if flags.format == OutputFormat::Table {
        output(&[OutcomeRow::from(&outcome)], flags.format)
    } else {
        output(&outcome, flags.format)
    }
}
