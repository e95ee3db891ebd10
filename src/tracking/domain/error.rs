//! Error types for work-item domain validation and parsing.

use super::{OrgRef, PersonId, ProjectId, Role};
use thiserror::Error;

/// Errors returned while constructing or validating domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkItemDomainError {
    /// The work-item title is empty after trimming.
    #[error("work item title must not be empty")]
    EmptyTitle,

    /// The work-item title exceeds the maximum length.
    #[error("work item title must be at most {0} characters")]
    TitleTooLong(usize),

    /// The status value is not one of the fixed workflow statuses.
    #[error("unknown status '{0}', expected one of: To Do, In Progress, Blocked, Done")]
    UnknownStatus(String),

    /// The priority value is not recognised.
    #[error("unknown priority '{0}', expected one of: Low, Medium, High, Critical")]
    UnknownPriority(String),

    /// The item type is blank.
    #[error("item type must not be empty")]
    EmptyItemType,

    /// A custom item type name exceeds the maximum length.
    #[error("item type must be at most {0} characters")]
    ItemTypeTooLong(usize),

    /// The hours value is negative, malformed, or too precise.
    #[error("invalid hours value '{0}', expected a non-negative number with at most two decimals")]
    InvalidHours(String),

    /// Logged hours must be strictly positive.
    #[error("logged hours must be greater than zero")]
    ZeroHoursLogged,

    /// Adding hours would overflow the stored total.
    #[error("hours total is out of range")]
    HoursOverflow,

    /// The role string is not recognised.
    #[error("unknown role '{0}'")]
    UnknownRole(String),

    /// A customer-side role was supplied without a company, or an internal
    /// role with one.
    #[error("role {0} does not match the supplied company affiliation")]
    AffiliationMismatch(Role),

    /// The due-date range has its start after its end.
    #[error("due date range is inverted")]
    InvertedDueRange,

    /// An update request carried no fields.
    #[error("update request contains no fields")]
    EmptyUpdate,

    /// The referenced project does not exist.
    #[error("unknown project: {0}")]
    UnknownProject(ProjectId),

    /// The organisation is not attached to the project.
    #[error("{org} is not part of project {project}")]
    OrganisationNotInProject {
        /// Project the item was filed under.
        project: ProjectId,
        /// Organisation that does not belong to it.
        org: OrgRef,
    },

    /// The person is not an eligible assignee for the organisation.
    #[error("person {assignee} cannot be assigned work in {org}")]
    IneligibleAssignee {
        /// Rejected assignee.
        assignee: PersonId,
        /// Organisation the assignee was checked against.
        org: OrgRef,
    },
}
