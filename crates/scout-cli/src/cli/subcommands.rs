use clap::Subcommand;

/// Review commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ReviewCommands {
    /// List profiles waiting for a decision.
    List {
        #[arg(long)]
        kind: Option<String>,
    },
    /// Accept the proposal, optionally with a different status.
    Approve {
        kind: String,
        id: i64,
        #[arg(long)]
        status: Option<String>,
    },
    /// Dismiss the proposal.
    Reject { kind: String, id: i64 },
}
