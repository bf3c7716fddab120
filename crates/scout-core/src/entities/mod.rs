//! Entity structs for the refresh pipeline.
//!
//! Profiles and transitions map to tables in the libSQL store (`scout-db`).
//! Snapshots and change descriptors are stored as JSON columns. All persisted
//! structs derive `Serialize`, `Deserialize`, and `JsonSchema`.

mod change;
mod profile;
mod snapshot;
mod transition;

pub use change::{ChangeDescriptor, RoleDelta};
pub use profile::{NewProfile, PendingReview, ProfileRecord, ProfileRef};
pub use snapshot::{EducationEntry, ExperienceEntry, ProfileSnapshot};
pub use transition::{NewTransition, StatusTransition};

pub(crate) use snapshot::normalize;
