//! # scout-core
//!
//! Core types and pure pipeline logic for the career-transition scout.
//!
//! This crate provides the pieces of the refresh pipeline that never touch
//! the network or the database:
//! - Entity structs for snapshots, profile records, and status transitions
//! - Closed enums for profile status, confidence, refresh status, and profile kind
//! - The snapshot differ producing a [`entities::ChangeDescriptor`]
//! - The approval gate state machine
//! - Founder signal detection and provider date-range parsing
//! - Cross-cutting error types

pub mod dates;
pub mod diff;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod gate;
pub mod signals;
