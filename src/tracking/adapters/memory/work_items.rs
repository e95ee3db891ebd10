//! In-memory work-item repository.

use async_trait::async_trait;
use std::cmp::Reverse;

use super::{InMemoryTrackingStore, store::TrackingState};
use crate::tracking::{
    domain::{PageWindow, WorkItem, WorkItemCriteria, WorkItemId, WorkItemPage},
    ports::{AssigneeCheck, WorkItemRepository, WorkItemRepositoryError, WorkItemRepositoryResult},
};

/// Confirms the item's assignee is on its roster in the locked snapshot.
fn check_assignee(state: &TrackingState, item: &WorkItem) -> WorkItemRepositoryResult<()> {
    let Some(assignee) = item.assignee() else {
        return Ok(());
    };
    let admitted = state
        .roster(item.project(), item.org())
        .is_some_and(|roster| roster.admits(assignee));
    if admitted {
        Ok(())
    } else {
        Err(WorkItemRepositoryError::AssigneeNotEligible {
            assignee,
            org: item.org(),
        })
    }
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[async_trait]
impl WorkItemRepository for InMemoryTrackingStore {
    async fn store(&self, item: &WorkItem) -> WorkItemRepositoryResult<()> {
        let mut state = self.write().map_err(WorkItemRepositoryError::persistence)?;
        if state.items.contains_key(&item.id()) {
            return Err(WorkItemRepositoryError::DuplicateWorkItem(item.id()));
        }
        check_assignee(&state, item)?;
        state.items.insert(item.id(), item.clone());
        Ok(())
    }

    async fn update(&self, item: &WorkItem, check: AssigneeCheck) -> WorkItemRepositoryResult<()> {
        let mut state = self.write().map_err(WorkItemRepositoryError::persistence)?;
        if !state.items.contains_key(&item.id()) {
            return Err(WorkItemRepositoryError::NotFound(item.id()));
        }
        if check == AssigneeCheck::Required {
            check_assignee(&state, item)?;
        }
        state.items.insert(item.id(), item.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: WorkItemId) -> WorkItemRepositoryResult<Option<WorkItem>> {
        let state = self.read().map_err(WorkItemRepositoryError::persistence)?;
        Ok(state.items.get(&id).cloned())
    }

    async fn delete(&self, id: WorkItemId) -> WorkItemRepositoryResult<bool> {
        let mut state = self.write().map_err(WorkItemRepositoryError::persistence)?;
        Ok(state.items.remove(&id).is_some())
    }

    async fn query(
        &self,
        criteria: &WorkItemCriteria,
        window: Option<PageWindow>,
    ) -> WorkItemRepositoryResult<WorkItemPage> {
        let state = self.read().map_err(WorkItemRepositoryError::persistence)?;
        let mut matches: Vec<&WorkItem> = state
            .items
            .values()
            .filter(|item| criteria.matches(item))
            .collect();
        matches.sort_by_key(|item| (Reverse(item.created_at()), item.id()));

        let total = u64::try_from(matches.len()).map_err(WorkItemRepositoryError::persistence)?;
        let (skip, take) = window.map_or((0, usize::MAX), |page| {
            (to_usize(page.offset()), to_usize(page.limit()))
        });
        let items = matches.into_iter().skip(skip).take(take).cloned().collect();
        Ok(WorkItemPage { items, total })
    }
}
