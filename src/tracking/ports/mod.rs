//! Port contracts for work-item tracking.
//!
//! Ports define infrastructure-agnostic interfaces used by tracking services.

pub mod directory;
pub mod repository;

pub use directory::{DirectoryError, DirectoryResult, OrganisationDirectory};
pub use repository::{
    AssigneeCheck, WorkItemRepository, WorkItemRepositoryError, WorkItemRepositoryResult,
};

#[cfg(test)]
pub use directory::MockOrganisationDirectory;
