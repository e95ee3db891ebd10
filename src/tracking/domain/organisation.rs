//! Read-only directory records used for eligibility checks.

use super::{CompanyId, OrgRef, PersonId, ProjectId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Project as known to the organisation directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    customer: Option<CompanyId>,
    manager: Option<PersonId>,
}

impl Project {
    /// Creates an internal project with no owning customer.
    #[must_use]
    pub const fn internal(id: ProjectId) -> Self {
        Self {
            id,
            customer: None,
            manager: None,
        }
    }

    /// Creates a project owned by a customer company.
    #[must_use]
    pub const fn for_customer(id: ProjectId, customer: CompanyId) -> Self {
        Self {
            id,
            customer: Some(customer),
            manager: None,
        }
    }

    /// Sets the project's manager.
    #[must_use]
    pub const fn with_manager(mut self, manager: PersonId) -> Self {
        self.manager = Some(manager);
        self
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the customer company that owns the project, if any.
    #[must_use]
    pub const fn customer(&self) -> Option<CompanyId> {
        self.customer
    }

    /// Returns the project's manager, if any.
    #[must_use]
    pub const fn manager(&self) -> Option<PersonId> {
        self.manager
    }
}

/// People who may be assigned work for a (project, organisation) pair.
///
/// For a team this is the team's membership; for a customer company it is
/// the company's staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    project: ProjectId,
    org: OrgRef,
    members: BTreeSet<PersonId>,
}

impl Roster {
    /// Creates a roster snapshot.
    #[must_use]
    pub fn new(
        project: ProjectId,
        org: OrgRef,
        members: impl IntoIterator<Item = PersonId>,
    ) -> Self {
        Self {
            project,
            org,
            members: members.into_iter().collect(),
        }
    }

    /// Returns the project the roster applies to.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the organisation the roster belongs to.
    #[must_use]
    pub const fn org(&self) -> OrgRef {
        self.org
    }

    /// Returns `true` when `person` is on the roster.
    #[must_use]
    pub fn admits(&self, person: PersonId) -> bool {
        self.members.contains(&person)
    }

    /// Returns the assignable people, optionally without the current
    /// assignee so a transfer can never be a no-op.
    #[must_use]
    pub fn assignable(&self, excluding: Option<PersonId>) -> BTreeSet<PersonId> {
        self.members
            .iter()
            .copied()
            .filter(|person| Some(*person) != excluding)
            .collect()
    }
}
