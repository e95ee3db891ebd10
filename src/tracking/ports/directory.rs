//! Directory port for project, team, and company membership lookups.
//!
//! The directory is owned by an external collaborator; tracking only reads
//! from it.

use crate::tracking::domain::{OrgRef, PersonId, Project, ProjectId, Roster, TeamId};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory lookups.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Read-only organisation directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganisationDirectory: Send + Sync {
    /// Finds a project.
    ///
    /// Returns `None` when the project does not exist.
    async fn project(&self, id: ProjectId) -> DirectoryResult<Option<Project>>;

    /// Returns the assignable people for `org` within `project`.
    ///
    /// Returns `None` when `org` is not attached to the project: a team that
    /// does not work on it, or a company that does not own it.
    async fn roster(&self, project: ProjectId, org: OrgRef) -> DirectoryResult<Option<Roster>>;

    /// Returns the teams led by `person`.
    async fn teams_led_by(&self, person: PersonId) -> DirectoryResult<BTreeSet<TeamId>>;

    /// Returns the projects managed by `person`.
    async fn projects_managed_by(&self, person: PersonId) -> DirectoryResult<BTreeSet<ProjectId>>;
}

/// Errors returned by directory implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// Persistence-layer failure.
    #[error("directory lookup failed: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
