//! In-memory organisation directory lookups.

use async_trait::async_trait;
use std::collections::BTreeSet;

use super::InMemoryTrackingStore;
use crate::tracking::{
    domain::{OrgRef, PersonId, Project, ProjectId, Roster, TeamId},
    ports::{DirectoryError, DirectoryResult, OrganisationDirectory},
};

#[async_trait]
impl OrganisationDirectory for InMemoryTrackingStore {
    async fn project(&self, id: ProjectId) -> DirectoryResult<Option<Project>> {
        let state = self.read().map_err(DirectoryError::persistence)?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn roster(&self, project: ProjectId, org: OrgRef) -> DirectoryResult<Option<Roster>> {
        let state = self.read().map_err(DirectoryError::persistence)?;
        Ok(state.roster(project, org))
    }

    async fn teams_led_by(&self, person: PersonId) -> DirectoryResult<BTreeSet<TeamId>> {
        let state = self.read().map_err(DirectoryError::persistence)?;
        Ok(state
            .team_leads
            .iter()
            .filter(|(_, lead)| **lead == person)
            .map(|(team, _)| *team)
            .collect())
    }

    async fn projects_managed_by(&self, person: PersonId) -> DirectoryResult<BTreeSet<ProjectId>> {
        let state = self.read().map_err(DirectoryError::persistence)?;
        Ok(state
            .projects
            .values()
            .filter(|project| project.manager() == Some(person))
            .map(Project::id)
            .collect())
    }
}
