//! `PostgreSQL` organisation directory lookups.

use super::{
    PostgresTrackingStore,
    membership::{load_project, load_roster},
    schema::{projects, teams},
};
use crate::tracking::{
    domain::{OrgRef, PersonId, Project, ProjectId, Roster, TeamId},
    ports::{DirectoryError, DirectoryResult, OrganisationDirectory},
};
use async_trait::async_trait;
use diesel::prelude::*;
use std::collections::BTreeSet;

#[async_trait]
impl OrganisationDirectory for PostgresTrackingStore {
    async fn project(&self, id: ProjectId) -> DirectoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            load_project(connection, id).map_err(DirectoryError::persistence)
        })
        .await
    }

    async fn roster(&self, project: ProjectId, org: OrgRef) -> DirectoryResult<Option<Roster>> {
        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .repeatable_read()
                .read_only()
                .run(|tx| load_roster(tx, project, org))
                .map_err(DirectoryError::persistence)
        })
        .await
    }

    async fn teams_led_by(&self, person: PersonId) -> DirectoryResult<BTreeSet<TeamId>> {
        self.run_blocking(move |connection| {
            let ids: Vec<uuid::Uuid> = teams::table
                .filter(teams::lead_id.eq(person.into_inner()))
                .select(teams::id)
                .load(connection)
                .map_err(DirectoryError::persistence)?;
            Ok(ids.into_iter().map(TeamId::from_uuid).collect())
        })
        .await
    }

    async fn projects_managed_by(&self, person: PersonId) -> DirectoryResult<BTreeSet<ProjectId>> {
        self.run_blocking(move |connection| {
            let ids: Vec<uuid::Uuid> = projects::table
                .filter(projects::manager_id.eq(person.into_inner()))
                .select(projects::id)
                .load(connection)
                .map_err(DirectoryError::persistence)?;
            Ok(ids.into_iter().map(ProjectId::from_uuid).collect())
        })
        .await
    }
}
