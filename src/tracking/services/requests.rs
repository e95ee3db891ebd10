//! Request payloads accepted by the work-item service.
//!
//! Enumerated and numeric fields arrive as text, as they would from a
//! transport binding, and are parsed into domain values by the service.

use crate::tracking::domain::{
    Hours, ItemType, NewWorkItem, OrgRef, PersonId, Priority, ProjectId, Status,
    WorkItemChanges, WorkItemDomainError,
};
use chrono::NaiveDate;

/// Request payload for creating a work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWorkItemRequest {
    project: ProjectId,
    org: OrgRef,
    title: String,
    assignee: Option<PersonId>,
    description: Option<String>,
    item_type: Option<String>,
    priority: Option<String>,
    status: Option<String>,
    due_date: Option<NaiveDate>,
    hours_estimated: Option<String>,
}

impl CreateWorkItemRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(project: ProjectId, org: OrgRef, title: impl Into<String>) -> Self {
        Self {
            project,
            org,
            title: title.into(),
            assignee: None,
            description: None,
            item_type: None,
            priority: None,
            status: None,
            due_date: None,
            hours_estimated: None,
        }
    }

    /// Sets the initial assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: PersonId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the item type, e.g. `"Bug"`.
    #[must_use]
    pub fn with_item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    /// Sets the priority, e.g. `"High"`.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the initial status, e.g. `"In Progress"`.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the estimate, e.g. `"4.5"`.
    #[must_use]
    pub fn with_hours_estimated(mut self, hours: impl Into<String>) -> Self {
        self.hours_estimated = Some(hours.into());
        self
    }

    /// Returns the target project.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the target organisation.
    #[must_use]
    pub const fn org(&self) -> OrgRef {
        self.org
    }

    pub(super) fn into_fields(self) -> Result<NewWorkItem, WorkItemDomainError> {
        let mut fields = NewWorkItem::new(self.project, self.org, self.title);
        fields.assignee = self.assignee;
        fields.description = self.description;
        fields.due_date = self.due_date;
        if let Some(text) = self.item_type {
            fields.item_type = ItemType::parse(&text)?;
        }
        if let Some(text) = self.priority {
            fields.priority = Priority::try_from(text.as_str())?;
        }
        if let Some(text) = self.status {
            fields.status = Status::try_from(text.as_str())?;
        }
        if let Some(text) = self.hours_estimated {
            fields.hours_estimated = Hours::parse(&text)?;
        }
        Ok(fields)
    }
}

/// Request payload for a partial work-item update.
///
/// Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateWorkItemRequest {
    title: Option<String>,
    description: Option<Option<String>>,
    item_type: Option<String>,
    priority: Option<String>,
    status: Option<String>,
    due_date: Option<Option<NaiveDate>>,
    hours_estimated: Option<String>,
    hours_spent: Option<String>,
    assignee: Option<Option<PersonId>>,
}

impl UpdateWorkItemRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    /// Removes the description.
    #[must_use]
    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    /// Replaces the item type.
    #[must_use]
    pub fn with_item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Replaces the status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Replaces the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(Some(due_date));
        self
    }

    /// Removes the due date.
    #[must_use]
    pub const fn clear_due_date(mut self) -> Self {
        self.due_date = Some(None);
        self
    }

    /// Replaces the estimate.
    #[must_use]
    pub fn with_hours_estimated(mut self, hours: impl Into<String>) -> Self {
        self.hours_estimated = Some(hours.into());
        self
    }

    /// Overwrites the logged-hours total.
    #[must_use]
    pub fn with_hours_spent(mut self, hours: impl Into<String>) -> Self {
        self.hours_spent = Some(hours.into());
        self
    }

    /// Replaces the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: PersonId) -> Self {
        self.assignee = Some(Some(assignee));
        self
    }

    /// Leaves the item unassigned.
    #[must_use]
    pub const fn unassign(mut self) -> Self {
        self.assignee = Some(None);
        self
    }

    pub(super) fn into_changes(self) -> Result<WorkItemChanges, WorkItemDomainError> {
        let changes = WorkItemChanges {
            title: self.title,
            description: self.description,
            item_type: self
                .item_type
                .map(|text| ItemType::parse(&text))
                .transpose()?,
            priority: self
                .priority
                .map(|text| Priority::try_from(text.as_str()))
                .transpose()?,
            status: self
                .status
                .map(|text| Status::try_from(text.as_str()))
                .transpose()?,
            due_date: self.due_date,
            hours_estimated: self.hours_estimated.map(|text| Hours::parse(&text)).transpose()?,
            hours_spent: self.hours_spent.map(|text| Hours::parse(&text)).transpose()?,
            assignee: self.assignee,
        };
        if changes.is_empty() {
            return Err(WorkItemDomainError::EmptyUpdate);
        }
        Ok(changes)
    }
}
