//! Listing filters, pagination, and query criteria.

use super::{
    ItemType, OrgKind, OrgRef, PersonId, Priority, ProjectId, ScopePredicate, Status, WorkItem,
    WorkItemDomainError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Conjunctive filter over work-item fields. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemFilter {
    /// Owning project.
    pub project: Option<ProjectId>,
    /// Owning team or company.
    pub org: Option<OrgRef>,
    /// Internal or customer items only.
    pub org_kind: Option<OrgKind>,
    /// Current assignee.
    pub assignee: Option<PersonId>,
    /// Assigner of record.
    pub assigner: Option<PersonId>,
    /// Workflow status.
    pub status: Option<Status>,
    /// Priority.
    pub priority: Option<Priority>,
    /// Item type.
    pub item_type: Option<ItemType>,
    /// Earliest due date, inclusive.
    pub due_from: Option<NaiveDate>,
    /// Latest due date, inclusive.
    pub due_to: Option<NaiveDate>,
}

impl WorkItemFilter {
    /// Creates a filter that matches everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to a project.
    #[must_use]
    pub const fn with_project(mut self, project: ProjectId) -> Self {
        self.project = Some(project);
        self
    }

    /// Restricts to an owning team or company.
    #[must_use]
    pub const fn with_org(mut self, org: OrgRef) -> Self {
        self.org = Some(org);
        self
    }

    /// Restricts to internal or customer items.
    #[must_use]
    pub const fn with_org_kind(mut self, kind: OrgKind) -> Self {
        self.org_kind = Some(kind);
        self
    }

    /// Restricts to an assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: PersonId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Restricts to an assigner.
    #[must_use]
    pub const fn with_assigner(mut self, assigner: PersonId) -> Self {
        self.assigner = Some(assigner);
        self
    }

    /// Restricts to a status.
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to a priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts to an item type.
    #[must_use]
    pub fn with_item_type(mut self, item_type: ItemType) -> Self {
        self.item_type = Some(item_type);
        self
    }

    /// Restricts to items due within the inclusive range.
    #[must_use]
    pub const fn with_due_between(
        mut self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Self {
        self.due_from = from;
        self.due_to = to;
        self
    }

    /// Checks the filter for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemDomainError::InvertedDueRange`] when `due_from` is
    /// after `due_to`.
    pub fn validate(&self) -> Result<(), WorkItemDomainError> {
        match (self.due_from, self.due_to) {
            (Some(from), Some(to)) if from > to => Err(WorkItemDomainError::InvertedDueRange),
            _ => Ok(()),
        }
    }

    /// Evaluates the filter against an item. Items without a due date never
    /// match a due-date bound.
    #[must_use]
    pub fn matches(&self, item: &WorkItem) -> bool {
        self.project.is_none_or(|project| item.project() == project)
            && self.org.is_none_or(|org| item.org() == org)
            && self.org_kind.is_none_or(|kind| item.org().kind() == kind)
            && self.assignee.is_none_or(|assignee| item.assignee() == Some(assignee))
            && self.assigner.is_none_or(|assigner| item.assigner() == assigner)
            && self.status.is_none_or(|status| item.status() == status)
            && self.priority.is_none_or(|priority| item.priority() == priority)
            && self
                .item_type
                .as_ref()
                .is_none_or(|item_type| item.item_type() == item_type)
            && self.matches_due_range(item)
    }

    fn matches_due_range(&self, item: &WorkItem) -> bool {
        if self.due_from.is_none() && self.due_to.is_none() {
            return true;
        }
        item.due_date().is_some_and(|due| {
            self.due_from.is_none_or(|from| due >= from) && self.due_to.is_none_or(|to| due <= to)
        })
    }
}

/// Requested page, before clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    page: Option<u64>,
    limit: Option<u64>,
}

impl Pagination {
    /// Requests `page` (1-based) with `limit` items per page.
    #[must_use]
    pub const fn new(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Requests the first page with the configured default size.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            page: None,
            limit: None,
        }
    }

    /// Clamps the request into a usable window. Out-of-range values are
    /// pulled back into bounds rather than rejected.
    #[must_use]
    pub fn clamp(self, default_limit: u64, max_limit: u64) -> PageWindow {
        let ceiling = max_limit.max(1);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, ceiling);
        let page = self.page.unwrap_or(1).max(1);
        PageWindow { page, limit }
    }
}

/// Clamped page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    page: u64,
    limit: u64,
}

impl PageWindow {
    /// Returns the 1-based page number.
    #[must_use]
    pub const fn page(self) -> u64 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(self) -> u64 {
        self.limit
    }

    /// Returns the number of items before this page.
    #[must_use]
    pub const fn offset(self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Pagination metadata returned with a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Page returned, 1-based.
    pub current_page: u64,
    /// Page size used.
    pub items_per_page: u64,
    /// Items matching scope and filter before pagination.
    pub total_items: u64,
    /// Number of pages needed for `total_items`.
    pub total_pages: u64,
}

impl PageInfo {
    /// Builds pagination metadata for `window` over `total_items`.
    #[must_use]
    pub const fn new(window: PageWindow, total_items: u64) -> Self {
        Self {
            current_page: window.page,
            items_per_page: window.limit,
            total_items,
            total_pages: total_items.div_ceil(window.limit),
        }
    }
}

/// Scope and filter handed to the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItemCriteria {
    /// Visibility predicate resolved for the caller.
    pub scope: ScopePredicate,
    /// Caller-supplied filter.
    pub filter: WorkItemFilter,
}

impl WorkItemCriteria {
    /// Creates criteria from a scope and filter.
    #[must_use]
    pub const fn new(scope: ScopePredicate, filter: WorkItemFilter) -> Self {
        Self { scope, filter }
    }

    /// Evaluates scope and filter against an item.
    #[must_use]
    pub fn matches(&self, item: &WorkItem) -> bool {
        self.scope.matches(item) && self.filter.matches(item)
    }
}

/// Page of work items with the pre-pagination match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkItemPage {
    /// Items on the page, newest first.
    pub items: Vec<WorkItem>,
    /// Total items matching the criteria.
    pub total: u64,
}
