//! Domain model for work-item tracking.
//!
//! Holds the work-item aggregate, the caller identity model, and the pure
//! rules that decide visibility, authority, and assignment eligibility. No
//! infrastructure concern crosses this boundary.

mod access;
mod error;
mod identity;
mod ids;
mod organisation;
mod query;
mod scope;
mod summary;
mod values;
mod work_item;

pub use access::{Authority, authority, manages, manages_org};
pub use error::WorkItemDomainError;
pub use identity::{Identity, Role, Side};
pub use ids::{CompanyId, OrgKind, OrgRef, PersonId, ProjectId, TeamId, WorkItemId};
pub use organisation::{Project, Roster};
pub use query::{
    PageInfo, PageWindow, Pagination, WorkItemCriteria, WorkItemFilter, WorkItemPage,
};
pub use scope::{QueryIntent, ScopeContext, ScopePredicate, resolve_scope};
pub use summary::{Dashboard, WorkItemStatistics};
pub use values::{Hours, ItemType, Priority, Status};
pub use work_item::{MAX_TITLE_CHARS, NewWorkItem, PersistedWorkItemData, WorkItem, WorkItemChanges};
