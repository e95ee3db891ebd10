//! Aggregate views over scoped work items.

use super::{Hours, Priority, Status, WorkItem};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts and hour totals over a set of work items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkItemStatistics {
    /// Number of items.
    pub total: u64,
    /// Items in `To Do`.
    pub to_do: u64,
    /// Items in `In Progress`.
    pub in_progress: u64,
    /// Items in `Blocked`.
    pub blocked: u64,
    /// Items in `Done`.
    pub done: u64,
    /// Unfinished items past their due date.
    pub overdue: u64,
    /// Item counts keyed by priority.
    pub by_priority: BTreeMap<Priority, u64>,
    /// Sum of estimates.
    pub hours_estimated: Hours,
    /// Sum of logged hours.
    pub hours_spent: Hours,
}

impl WorkItemStatistics {
    /// Folds `items` into statistics; `today` decides what is overdue.
    #[must_use]
    pub fn collect<'a>(items: impl IntoIterator<Item = &'a WorkItem>, today: NaiveDate) -> Self {
        items.into_iter().fold(Self::default(), |mut stats, item| {
            stats.total += 1;
            match item.status() {
                Status::ToDo => stats.to_do += 1,
                Status::InProgress => stats.in_progress += 1,
                Status::Blocked => stats.blocked += 1,
                Status::Done => stats.done += 1,
            }
            if item.is_overdue(today) {
                stats.overdue += 1;
            }
            *stats.by_priority.entry(item.priority()).or_default() += 1;
            stats.hours_estimated = stats.hours_estimated.saturating_add(item.hours_estimated());
            stats.hours_spent = stats.hours_spent.saturating_add(item.hours_spent());
            stats
        })
    }
}

/// Work items grouped by the caller's relationship to them.
///
/// Sections that do not apply to the caller's role are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    /// Items assigned to the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_tasks: Option<Vec<WorkItem>>,
    /// Items the caller assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_by_me: Option<Vec<WorkItem>>,
    /// Items of the teams the caller leads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_tasks: Option<Vec<WorkItem>>,
    /// Items of the projects the caller manages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_tasks: Option<Vec<WorkItem>>,
    /// Items of the caller's customer company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_tasks: Option<Vec<WorkItem>>,
}
