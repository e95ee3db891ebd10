//! Service-level error taxonomy.

use crate::tracking::{
    domain::{OrgKind, OrgRef, Role, WorkItemDomainError, WorkItemId},
    ports::{DirectoryError, WorkItemRepositoryError},
};
use thiserror::Error;

/// Coarse classification of a [`TrackingError`], suitable for mapping onto
/// transport status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request was malformed or violated a business rule.
    Validation,
    /// The item does not exist or is outside the caller's scope.
    NotFound,
    /// The caller lacks authority for the operation.
    Forbidden,
    /// The request conflicts with the current state.
    Conflict,
    /// An internal failure occurred.
    Internal,
}

/// Reason an operation was denied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    /// The role may not create items for this kind of organisation.
    #[error("role {role} cannot create work items for a {}", kind.as_str())]
    CreateNotPermitted {
        /// Caller role.
        role: Role,
        /// Organisation kind requested.
        kind: OrgKind,
    },
    /// The caller does not manage the organisation.
    #[error("caller does not manage {0}")]
    OutsideManagedOrg(OrgRef),
    /// Only admins and managers delete items.
    #[error("role {0} cannot delete work items")]
    DeleteNotPermitted(Role),
    /// The caller may not transfer this item.
    #[error("caller cannot transfer this work item")]
    TransferNotPermitted,
    /// The caller may not edit the requested fields.
    #[error("caller cannot edit the requested fields of this work item")]
    EditNotPermitted,
    /// The caller may not change the status of this item.
    #[error("caller cannot change the status of this work item")]
    StatusNotPermitted,
    /// The caller may not log hours on this item.
    #[error("caller cannot log hours on this work item")]
    HoursNotPermitted,
}

/// Errors returned by tracking services.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] WorkItemDomainError),
    /// The item does not exist or is not visible to the caller.
    #[error("work item not found: {0}")]
    NotFound(WorkItemId),
    /// The caller is not allowed to perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(#[from] Denial),
    /// The request conflicts with stored state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Storage or directory failure. Details are logged, not surfaced.
    #[error("internal error")]
    Internal,
}

impl TrackingError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Internal => ErrorKind::Internal,
        }
    }
}

impl From<WorkItemRepositoryError> for TrackingError {
    fn from(err: WorkItemRepositoryError) -> Self {
        match err {
            WorkItemRepositoryError::DuplicateWorkItem(id) => {
                Self::Conflict(format!("work item {id} already exists"))
            }
            WorkItemRepositoryError::NotFound(id) => Self::NotFound(id),
            WorkItemRepositoryError::AssigneeNotEligible { assignee, org } => {
                Self::Validation(WorkItemDomainError::IneligibleAssignee { assignee, org })
            }
            WorkItemRepositoryError::Persistence(source) => {
                tracing::error!(error = %source, "work-item repository failure");
                Self::Internal
            }
        }
    }
}

impl From<DirectoryError> for TrackingError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Persistence(source) => {
                tracing::error!(error = %source, "organisation directory failure");
                Self::Internal
            }
        }
    }
}

/// Result type for tracking service operations.
pub type TrackingResult<T> = Result<T, TrackingError>;
