//! Repository port for work-item persistence and scoped queries.

use crate::tracking::domain::{
    OrgRef, PageWindow, PersonId, WorkItem, WorkItemCriteria, WorkItemId, WorkItemPage,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for work-item repository operations.
pub type WorkItemRepositoryResult<T> = Result<T, WorkItemRepositoryError>;

/// Whether an update must re-confirm the assignee against the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneeCheck {
    /// The assignee was set or changed by this write.
    Required,
    /// The assignee is unchanged; people who have since left the roster keep
    /// their existing assignments.
    Unchanged,
}

/// Work-item persistence contract.
///
/// Writes that carry an assignee must confirm, within the same transaction
/// or lock as the write itself, that the assignee is on the roster of the
/// item's project and organisation.
#[async_trait]
pub trait WorkItemRepository: Send + Sync {
    /// Stores a new work item.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemRepositoryError::DuplicateWorkItem`] when the
    /// identifier already exists or
    /// [`WorkItemRepositoryError::AssigneeNotEligible`] when the assignee is
    /// not on the roster at commit time.
    async fn store(&self, item: &WorkItem) -> WorkItemRepositoryResult<()>;

    /// Persists changes to an existing work item. Last write wins.
    ///
    /// The roster is consulted only when `check` is
    /// [`AssigneeCheck::Required`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemRepositoryError::NotFound`] when the item does not
    /// exist or [`WorkItemRepositoryError::AssigneeNotEligible`] when a
    /// required check finds the assignee off the roster at commit time.
    async fn update(&self, item: &WorkItem, check: AssigneeCheck) -> WorkItemRepositoryResult<()>;

    /// Finds a work item by identifier.
    ///
    /// Returns `None` when the item does not exist.
    async fn find_by_id(&self, id: WorkItemId) -> WorkItemRepositoryResult<Option<WorkItem>>;

    /// Deletes a work item.
    ///
    /// Returns `false` when the item did not exist.
    async fn delete(&self, id: WorkItemId) -> WorkItemRepositoryResult<bool>;

    /// Returns items matching `criteria`, newest first with ties broken by
    /// identifier, together with the number of matches before `window` is
    /// applied. A `None` window returns every match.
    async fn query(
        &self,
        criteria: &WorkItemCriteria,
        window: Option<PageWindow>,
    ) -> WorkItemRepositoryResult<WorkItemPage>;
}

/// Errors returned by work-item repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkItemRepositoryError {
    /// A work item with the same identifier already exists.
    #[error("duplicate work item identifier: {0}")]
    DuplicateWorkItem(WorkItemId),

    /// The work item was not found.
    #[error("work item not found: {0}")]
    NotFound(WorkItemId),

    /// The assignee was not on the organisation's roster at commit time.
    #[error("person {assignee} is not on the roster of {org}")]
    AssigneeNotEligible {
        /// Rejected assignee.
        assignee: PersonId,
        /// Organisation whose roster was checked.
        org: OrgRef,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkItemRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
