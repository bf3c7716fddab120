//! Cross-cutting error types.
//!
//! Errors raised by the pure pipeline pieces in this crate. Store, config,
//! and collaborator errors live in their own crates; they converge into
//! `anyhow` only in `scout-cli`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The approval gate received an event its current state does not accept.
    #[error("Invalid gate transition: {event} while {state}")]
    InvalidTransition { state: String, event: String },

    /// Data failed validation (format, ranges, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
