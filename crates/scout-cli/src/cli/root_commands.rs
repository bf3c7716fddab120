use clap::{Args, Subcommand};

use crate::cli::subcommands::ReviewCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Refresh every profile that is due.
    Refresh(RefreshArgs),
    /// Refresh one profile now.
    Profile(ProfileArgs),
    /// Outstanding human reviews.
    Review {
        #[command(subcommand)]
        action: ReviewCommands,
    },
    /// Status transition history.
    History(HistoryArgs),
}

#[derive(Clone, Debug, Args)]
pub struct RefreshArgs {
    /// Only this profile kind (stealth_founder, current_employee)
    #[arg(long)]
    pub kind: Option<String>,
    /// Only profiles tracked against this company
    #[arg(long)]
    pub company: Option<String>,
    /// Ignore the staleness threshold
    #[arg(long)]
    pub force: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ProfileArgs {
    /// stealth_founder or current_employee
    pub kind: String,
    pub id: i64,
    /// Ask the model even if the work history did not change
    #[arg(long)]
    pub reclassify: bool,
}

#[derive(Clone, Debug, Args)]
pub struct HistoryArgs {
    #[arg(long)]
    pub kind: Option<String>,
    /// Full history of one profile (requires --kind)
    #[arg(long, requires = "kind")]
    pub id: Option<i64>,
    /// Look-back window for recent history
    #[arg(long, default_value_t = 90)]
    pub days: u32,
    /// Include transitions into currently_employed
    #[arg(long)]
    pub include_employed: bool,
}
