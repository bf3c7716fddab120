use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ExperienceEntry;

/// The same ongoing role seen with a different company and/or title.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RoleDelta {
    pub previous: ExperienceEntry,
    pub current: ExperienceEntry,
    pub company_changed: bool,
    pub title_changed: bool,
}

/// Structured difference between a stored and a freshly fetched snapshot.
///
/// Produced by [`crate::diff::diff`]. Stored as the payload of pending
/// reviews and of recorded status transitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChangeDescriptor {
    #[serde(default)]
    pub added: Vec<ExperienceEntry>,
    #[serde(default)]
    pub removed: Vec<ExperienceEntry>,
    #[serde(default)]
    pub deltas: Vec<RoleDelta>,
    pub previous_role: Option<ExperienceEntry>,
    pub current_role: Option<ExperienceEntry>,
    pub material_change: bool,
}

impl ChangeDescriptor {
    /// True when no role was added, removed, or changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.deltas.is_empty()
    }

    /// One-line summary for logs and CLI output.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.added.is_empty() {
            let labels: Vec<String> = self.added.iter().map(ExperienceEntry::label).collect();
            parts.push(format!("added: {}", labels.join(", ")));
        }
        if !self.removed.is_empty() {
            let labels: Vec<String> = self.removed.iter().map(ExperienceEntry::label).collect();
            parts.push(format!("removed: {}", labels.join(", ")));
        }
        for delta in &self.deltas {
            parts.push(format!(
                "changed: {} -> {}",
                delta.previous.label(),
                delta.current.label()
            ));
        }
        if parts.is_empty() {
            "no role changes".to_string()
        } else {
            parts.join("; ")
        }
    }
}
