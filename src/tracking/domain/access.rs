//! Per-item authority of a caller.

use super::{Identity, OrgRef, Role, ScopeContext, WorkItem};

/// What a caller may change on a specific work item, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Authority {
    /// No write access.
    None,
    /// Current assignee: may move status and log hours.
    Work,
    /// Assigner of record: may edit the item's fields.
    Edit,
    /// Management authority over the item's team or company: may also
    /// transfer it.
    Manage,
}

/// Computes the caller's authority over `item`.
#[must_use]
pub fn authority(identity: &Identity, context: &ScopeContext, item: &WorkItem) -> Authority {
    if manages(identity, context, item) {
        return Authority::Manage;
    }
    let me = identity.person();
    if item.assigner() == me {
        Authority::Edit
    } else if item.assignee() == Some(me) {
        Authority::Work
    } else {
        Authority::None
    }
}

/// Returns `true` when the caller holds management authority over the
/// organisation that owns `item`.
#[must_use]
pub fn manages(identity: &Identity, context: &ScopeContext, item: &WorkItem) -> bool {
    manages_org(identity, context, item.org())
}

/// Returns `true` when the caller holds management authority over `org`.
#[must_use]
pub fn manages_org(identity: &Identity, context: &ScopeContext, org: OrgRef) -> bool {
    match (identity.role(), org) {
        (Role::Admin | Role::Manager, _) => true,
        (Role::TeamLead, OrgRef::Team(team)) => context.leads(team),
        (Role::CustomerHead, OrgRef::Company(company)) => identity.company() == Some(company),
        _ => false,
    }
}
