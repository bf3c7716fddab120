use chrono::{DateTime, TimeDelta, Utc};

use scout_core::enums::ProfileKind;
use scout_db::repos::RecentFilter;

use crate::cli::root_commands::HistoryArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_optional_enum, profile_ref};
use crate::commands::shared::rows::TransitionRow;
use crate::context::AppContext;
use crate::output::output;

/// Handle `scout history`.
pub async fn handle(args: &HistoryArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let transitions = if let (Some(kind), Some(id)) = (args.kind.as_deref(), args.id) {
        ctx.service.list_transitions(profile_ref(kind, id)?).await?
    } else {
        let filter = RecentFilter {
            since: Some(since(Utc::now(), args.days)),
            kind: parse_optional_enum::<ProfileKind>(args.kind.as_deref(), "kind")?,
            include_currently_employed: args.include_employed,
            limit: Some(effective_limit(flags.limit, 50)),
        };
        ctx.service.list_recent_transitions(&filter).await?
    };

    if flags.format == OutputFormat::Table {
        let rows: Vec<TransitionRow> = transitions.iter().map(TransitionRow::from).collect();
        output(&rows, flags.format)
    } else {
        output(&transitions, flags.format)
    }
}

fn since(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_sub_signed(TimeDelta::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
