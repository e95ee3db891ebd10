//! Visibility scope resolution.
//!
//! Maps a caller identity and a query intent to a [`ScopePredicate`]: the
//! subset of work items the caller may read or act upon. Resolution is pure;
//! the directory facts it needs are gathered up front into a
//! [`ScopeContext`].

use super::{CompanyId, Identity, OrgRef, PersonId, ProjectId, Role, TeamId, WorkItem};
use std::collections::BTreeSet;

/// View a caller is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryIntent {
    /// Everything the caller may see.
    Browse,
    /// Items assigned to the caller.
    MyTasks,
    /// Items the caller is assigner of record for.
    AssignedByMe,
}

/// Directory facts about the caller needed to resolve visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeContext {
    led_teams: BTreeSet<TeamId>,
    managed_projects: BTreeSet<ProjectId>,
}

impl ScopeContext {
    /// Creates an empty context for callers with no leadership relations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the teams the caller leads.
    #[must_use]
    pub fn with_led_teams(mut self, teams: impl IntoIterator<Item = TeamId>) -> Self {
        self.led_teams = teams.into_iter().collect();
        self
    }

    /// Sets the projects the caller manages.
    #[must_use]
    pub fn with_managed_projects(mut self, projects: impl IntoIterator<Item = ProjectId>) -> Self {
        self.managed_projects = projects.into_iter().collect();
        self
    }

    /// Returns the teams the caller leads.
    #[must_use]
    pub const fn led_teams(&self) -> &BTreeSet<TeamId> {
        &self.led_teams
    }

    /// Returns the projects the caller manages.
    #[must_use]
    pub const fn managed_projects(&self) -> &BTreeSet<ProjectId> {
        &self.managed_projects
    }

    /// Returns `true` when the caller leads `team`.
    #[must_use]
    pub fn leads(&self, team: TeamId) -> bool {
        self.led_teams.contains(&team)
    }
}

/// Row-level predicate over work items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopePredicate {
    /// Matches every item.
    Everything,
    /// Matches no item.
    Nothing,
    /// Items assigned to the person.
    AssigneeIs(PersonId),
    /// Items whose assigner of record is the person.
    AssignerIs(PersonId),
    /// Internal items owned by one of the teams.
    TeamIn(BTreeSet<TeamId>),
    /// Customer items owned by the company.
    CompanyIs(CompanyId),
    /// Items filed under one of the projects.
    ProjectIn(BTreeSet<ProjectId>),
    /// Items matching every predicate.
    AllOf(Vec<ScopePredicate>),
    /// Items matching at least one predicate.
    AnyOf(Vec<ScopePredicate>),
}

impl ScopePredicate {
    /// Evaluates the predicate against an item.
    #[must_use]
    pub fn matches(&self, item: &WorkItem) -> bool {
        match self {
            Self::Everything => true,
            Self::Nothing => false,
            Self::AssigneeIs(person) => item.assignee() == Some(*person),
            Self::AssignerIs(person) => item.assigner() == *person,
            Self::TeamIn(teams) => item.org().team().is_some_and(|team| teams.contains(&team)),
            Self::CompanyIs(company) => item.org() == OrgRef::Company(*company),
            Self::ProjectIn(projects) => projects.contains(&item.project()),
            Self::AllOf(parts) => parts.iter().all(|part| part.matches(item)),
            Self::AnyOf(parts) => parts.iter().any(|part| part.matches(item)),
        }
    }

    /// Returns the conjunction of `self` and `other`.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Everything, rhs) => rhs,
            (lhs, Self::Everything) => lhs,
            (Self::Nothing, _) | (_, Self::Nothing) => Self::Nothing,
            (Self::AllOf(mut parts), Self::AllOf(more)) => {
                parts.extend(more);
                Self::AllOf(parts)
            }
            (Self::AllOf(mut parts), rhs) => {
                parts.push(rhs);
                Self::AllOf(parts)
            }
            (lhs, rhs) => Self::AllOf(vec![lhs, rhs]),
        }
    }
}

/// Resolves the visibility predicate for `identity` and `intent`.
///
/// Admins and managers see everything; team leads see their teams' items and
/// items assigned to them; customer heads see their company's items; plain
/// employees see only their own assignments. `MyTasks` always narrows to the
/// caller's assignments and `AssignedByMe` to items they assigned.
#[must_use]
pub fn resolve_scope(
    identity: &Identity,
    context: &ScopeContext,
    intent: QueryIntent,
) -> ScopePredicate {
    let me = identity.person();
    match (identity.role(), intent) {
        (Role::Employee | Role::CustomerEmployee, QueryIntent::AssignedByMe) => {
            ScopePredicate::AssignerIs(me)
        }
        (_, QueryIntent::Browse) => base_scope(identity, context),
        (_, QueryIntent::MyTasks) => {
            base_scope(identity, context).and(ScopePredicate::AssigneeIs(me))
        }
        (_, QueryIntent::AssignedByMe) => {
            base_scope(identity, context).and(ScopePredicate::AssignerIs(me))
        }
    }
}

fn base_scope(identity: &Identity, context: &ScopeContext) -> ScopePredicate {
    let me = identity.person();
    match identity.role() {
        Role::Admin | Role::Manager => ScopePredicate::Everything,
        Role::TeamLead => ScopePredicate::AnyOf(vec![
            ScopePredicate::TeamIn(context.led_teams().clone()),
            ScopePredicate::AssigneeIs(me),
        ]),
        Role::CustomerHead => identity
            .company()
            .map_or(ScopePredicate::Nothing, ScopePredicate::CompanyIs),
        Role::Employee | Role::CustomerEmployee => ScopePredicate::AssigneeIs(me),
    }
}
