//! Work-item aggregate root.

use super::{
    Hours, ItemType, OrgRef, PersonId, Priority, ProjectId, Status, WorkItemDomainError,
    WorkItemId,
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Work-item aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    id: WorkItemId,
    project: ProjectId,
    org: OrgRef,
    assignee: Option<PersonId>,
    assigner: PersonId,
    title: String,
    description: Option<String>,
    item_type: ItemType,
    priority: Priority,
    status: Status,
    due_date: Option<NaiveDate>,
    hours_estimated: Hours,
    hours_spent: Hours,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Validated field set for a work item that has not been created yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkItem {
    /// Owning project.
    pub project: ProjectId,
    /// Owning team or customer company.
    pub org: OrgRef,
    /// Initial assignee, if any.
    pub assignee: Option<PersonId>,
    /// Short summary of the work.
    pub title: String,
    /// Optional free-text detail.
    pub description: Option<String>,
    /// Kind of work.
    pub item_type: ItemType,
    /// Urgency.
    pub priority: Priority,
    /// Initial status.
    pub status: Status,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Initial estimate.
    pub hours_estimated: Hours,
}

impl NewWorkItem {
    /// Creates a field set with defaults for everything but the required
    /// fields.
    #[must_use]
    pub fn new(project: ProjectId, org: OrgRef, title: impl Into<String>) -> Self {
        Self {
            project,
            org,
            assignee: None,
            title: title.into(),
            description: None,
            item_type: ItemType::default(),
            priority: Priority::default(),
            status: Status::default(),
            due_date: None,
            hours_estimated: Hours::ZERO,
        }
    }
}

/// Parameter object for reconstructing a persisted work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedWorkItemData {
    /// Persisted identifier.
    pub id: WorkItemId,
    /// Persisted project.
    pub project: ProjectId,
    /// Persisted organisation.
    pub org: OrgRef,
    /// Persisted assignee.
    pub assignee: Option<PersonId>,
    /// Persisted assigner of record.
    pub assigner: PersonId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted item type.
    pub item_type: ItemType,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted status.
    pub status: Status,
    /// Persisted due date.
    pub due_date: Option<NaiveDate>,
    /// Persisted estimate.
    pub hours_estimated: Hours,
    /// Persisted logged hours.
    pub hours_spent: Hours,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a work item.
///
/// `None` leaves a field untouched. Nested options clear nullable fields
/// when set to `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkItemChanges {
    /// New title.
    pub title: Option<String>,
    /// New or cleared description.
    pub description: Option<Option<String>>,
    /// New item type.
    pub item_type: Option<ItemType>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New status.
    pub status: Option<Status>,
    /// New or cleared due date.
    pub due_date: Option<Option<NaiveDate>>,
    /// New estimate.
    pub hours_estimated: Option<Hours>,
    /// New logged-hours total.
    pub hours_spent: Option<Hours>,
    /// New assignee, or `Some(None)` to unassign.
    pub assignee: Option<Option<PersonId>>,
}

impl WorkItemChanges {
    /// Returns `true` when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns `true` when the change touches anything other than the
    /// progress fields an assignee may edit (`status`, `hours_spent`).
    #[must_use]
    pub const fn touches_management_fields(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.item_type.is_some()
            || self.priority.is_some()
            || self.due_date.is_some()
            || self.hours_estimated.is_some()
            || self.assignee.is_some()
    }
}

impl WorkItem {
    /// Creates a new work item, stamping the assigner and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemDomainError::EmptyTitle`] when the title is blank and
    /// [`WorkItemDomainError::TitleTooLong`] when it exceeds
    /// [`MAX_TITLE_CHARS`].
    pub fn create(
        fields: NewWorkItem,
        assigner: PersonId,
        clock: &impl Clock,
    ) -> Result<Self, WorkItemDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: WorkItemId::new(),
            project: fields.project,
            org: fields.org,
            assignee: fields.assignee,
            assigner,
            title: normalize_title(&fields.title)?,
            description: normalize_description(fields.description),
            item_type: fields.item_type,
            priority: fields.priority,
            status: fields.status,
            due_date: fields.due_date,
            hours_estimated: fields.hours_estimated,
            hours_spent: Hours::ZERO,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a work item from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWorkItemData) -> Self {
        Self {
            id: data.id,
            project: data.project,
            org: data.org,
            assignee: data.assignee,
            assigner: data.assigner,
            title: data.title,
            description: data.description,
            item_type: data.item_type,
            priority: data.priority,
            status: data.status,
            due_date: data.due_date,
            hours_estimated: data.hours_estimated,
            hours_spent: data.hours_spent,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the work-item identifier.
    #[must_use]
    pub const fn id(&self) -> WorkItemId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project(&self) -> ProjectId {
        self.project
    }

    /// Returns the owning team or company.
    #[must_use]
    pub const fn org(&self) -> OrgRef {
        self.org
    }

    /// Returns the current assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<PersonId> {
        self.assignee
    }

    /// Returns the assigner of record.
    #[must_use]
    pub const fn assigner(&self) -> PersonId {
        self.assigner
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the item type.
    #[must_use]
    pub const fn item_type(&self) -> &ItemType {
        &self.item_type
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the estimated hours.
    #[must_use]
    pub const fn hours_estimated(&self) -> Hours {
        self.hours_estimated
    }

    /// Returns the logged hours.
    #[must_use]
    pub const fn hours_spent(&self) -> Hours {
        self.hours_spent
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the item is past its due date and not done.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != Status::Done && self.due_date.is_some_and(|due| due < today)
    }

    /// Moves the item to `status`. Every status is reachable from every
    /// other, including reopening a done item.
    pub fn set_status(&mut self, status: Status, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Adds logged hours.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemDomainError::ZeroHoursLogged`] for a zero amount and
    /// [`WorkItemDomainError::HoursOverflow`] if the total overflows.
    pub fn log_hours(
        &mut self,
        hours: Hours,
        clock: &impl Clock,
    ) -> Result<(), WorkItemDomainError> {
        if hours.is_zero() {
            return Err(WorkItemDomainError::ZeroHoursLogged);
        }
        self.hours_spent = self.hours_spent.checked_add(hours)?;
        self.touch(clock);
        Ok(())
    }

    /// Hands the item to a new assignee. The assigner of record is kept.
    pub fn reassign(&mut self, assignee: PersonId, clock: &impl Clock) {
        self.assignee = Some(assignee);
        self.touch(clock);
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemDomainError::EmptyUpdate`] when `changes` is empty
    /// and [`WorkItemDomainError::EmptyTitle`] for a blank title. The item is
    /// left untouched on error.
    pub fn apply(
        &mut self,
        changes: WorkItemChanges,
        clock: &impl Clock,
    ) -> Result<(), WorkItemDomainError> {
        if changes.is_empty() {
            return Err(WorkItemDomainError::EmptyUpdate);
        }
        let title = changes.title.as_deref().map(normalize_title).transpose()?;

        if let Some(new_title) = title {
            self.title = new_title;
        }
        if let Some(description) = changes.description {
            self.description = normalize_description(description);
        }
        if let Some(item_type) = changes.item_type {
            self.item_type = item_type;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = due_date;
        }
        if let Some(hours) = changes.hours_estimated {
            self.hours_estimated = hours;
        }
        if let Some(hours) = changes.hours_spent {
            self.hours_spent = hours;
        }
        if let Some(assignee) = changes.assignee {
            self.assignee = assignee;
        }
        self.touch(clock);
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Longest title accepted, in characters.
pub const MAX_TITLE_CHARS: usize = 255;

fn normalize_title(title: &str) -> Result<String, WorkItemDomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(WorkItemDomainError::EmptyTitle);
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(WorkItemDomainError::TitleTooLong(MAX_TITLE_CHARS));
    }
    Ok(trimmed.to_owned())
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
