//! # scout-providers
//!
//! Production collaborators for the refresh pipeline:
//! - [`RapidApiFetcher`] pulls profile snapshots from the fresh-linkedin-profile-data
//!   API on RapidAPI.
//! - [`OpenAiStatusModel`] asks an OpenAI-compatible chat-completions endpoint
//!   for a `STATUS|CONFIDENCE` verdict.

mod http;
pub mod openai;
pub mod rapidapi;

pub use openai::{OpenAiStatusModel, StatusExample, parse_examples};
pub use rapidapi::RapidApiFetcher;
