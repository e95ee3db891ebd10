//! Diesel row models for work-item persistence.

use super::schema::{projects, work_items};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for work-item records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = work_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkItemRow {
    /// Work-item identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Organisation discriminator.
    pub org_kind: String,
    /// Owning team.
    pub team_id: Option<uuid::Uuid>,
    /// Owning company.
    pub company_id: Option<uuid::Uuid>,
    /// Current assignee.
    pub assignee_id: Option<uuid::Uuid>,
    /// Assigner of record.
    pub assigner_id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Item type name.
    pub item_type: String,
    /// Priority name.
    pub priority: String,
    /// Status name.
    pub status: String,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Estimate in hundredths of an hour.
    pub hours_estimated: i64,
    /// Logged time in hundredths of an hour.
    pub hours_spent: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for work-item records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = work_items)]
pub struct NewWorkItemRow {
    /// Work-item identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Organisation discriminator.
    pub org_kind: String,
    /// Owning team.
    pub team_id: Option<uuid::Uuid>,
    /// Owning company.
    pub company_id: Option<uuid::Uuid>,
    /// Current assignee.
    pub assignee_id: Option<uuid::Uuid>,
    /// Assigner of record.
    pub assigner_id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Item type name.
    pub item_type: String,
    /// Priority name.
    pub priority: String,
    /// Status name.
    pub status: String,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Estimate in hundredths of an hour.
    pub hours_estimated: i64,
    /// Logged time in hundredths of an hour.
    pub hours_spent: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset for the mutable work-item columns.
///
/// Project, organisation, assigner, and creation time are never rewritten.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = work_items)]
#[diesel(treat_none_as_null = true)]
pub struct WorkItemChangeset {
    /// Current assignee.
    pub assignee_id: Option<uuid::Uuid>,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Item type name.
    pub item_type: String,
    /// Priority name.
    pub priority: String,
    /// Status name.
    pub status: String,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Estimate in hundredths of an hour.
    pub hours_estimated: i64,
    /// Logged time in hundredths of an hour.
    pub hours_spent: i64,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for directory projects.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Owning customer company.
    pub customer_company_id: Option<uuid::Uuid>,
    /// Project manager.
    pub manager_id: Option<uuid::Uuid>,
}

/// Row count returned by listing count queries.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub struct CountRow {
    /// Number of matching rows.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub total: i64,
}
