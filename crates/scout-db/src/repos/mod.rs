//! Repository methods on [`crate::service::ScoutService`].

pub mod profile;
pub mod transition;

pub use profile::DueFilter;
pub use transition::RecentFilter;
