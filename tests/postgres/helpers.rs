//! Seeded database fixtures for `PostgreSQL` adapter tests.

pub use super::cluster::BoxError;
use super::cluster::{PostgresCluster, TemporaryDatabase, shared_cluster};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_types;
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use uuid::Uuid;
use worktrack::tracking::{
    adapters::postgres::{PostgresTrackingStore, TrackingPgPool},
    domain::{CompanyId, Identity, OrgRef, PersonId, ProjectId, Role, TeamId, WorkItem},
    services::{CreateWorkItemRequest, TrackingAggregator, WorkItemService},
};

/// Schema applied to the template database.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_work_tracking/up.sql");

/// Template database holding the migrated schema.
pub const TEMPLATE_DB: &str = "worktrack_test_template";

/// Service type wired to the `PostgreSQL` store.
pub type PgService = WorkItemService<PostgresTrackingStore, PostgresTrackingStore, DefaultClock>;

/// Aggregator type wired to the `PostgreSQL` store.
pub type PgAggregator =
    TrackingAggregator<PostgresTrackingStore, PostgresTrackingStore, DefaultClock>;

/// The organisation used throughout the in-memory suite, persisted in its
/// own database: one internal project staffed by teams A and B and one
/// customer project owned by company X.
pub struct PgOrganisation {
    pub store: Arc<PostgresTrackingStore>,
    pub project: ProjectId,
    pub customer_project: ProjectId,
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub company_x: CompanyId,
    pub manager: Identity,
    pub lead: Identity,
    pub emp7: Identity,
    pub emp8: Identity,
    pub emp55: Identity,
    pub head: Identity,
    pub staff: Identity,
    url: String,
    _database: TemporaryDatabase,
}

fn internal(role: Role) -> Result<Identity, BoxError> {
    Identity::internal(PersonId::new(), role).map_err(|err| Box::new(err) as BoxError)
}

fn customer(role: Role, company: CompanyId) -> Result<Identity, BoxError> {
    Identity::customer(PersonId::new(), role, company).map_err(|err| Box::new(err) as BoxError)
}

fn apply_migrations(url: &str) -> Result<(), BoxError> {
    let mut connection = PgConnection::establish(url).map_err(|err| Box::new(err) as BoxError)?;
    connection
        .batch_execute(CREATE_SCHEMA_SQL)
        .map_err(|err| Box::new(err) as BoxError)
}

async fn blocking<T, F>(f: F) -> Result<T, BoxError>
where
    F: FnOnce() -> Result<T, BoxError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| Box::new(err) as BoxError)?
}

impl PgOrganisation {
    async fn seed(cluster: PostgresCluster) -> Result<Self, BoxError> {
        let (database, pool) = blocking(move || {
            cluster.ensure_template(TEMPLATE_DB, apply_migrations)?;
            let name = format!("worktrack_{}", Uuid::new_v4().simple());
            let database = cluster.temporary_database(&name, TEMPLATE_DB)?;
            let manager = ConnectionManager::<PgConnection>::new(database.url());
            let pool: TrackingPgPool = Pool::builder()
                .max_size(4)
                .build(manager)
                .map_err(|err| Box::new(err) as BoxError)?;
            Ok((database, pool))
        })
        .await?;
        let url = database.url().to_owned();

        let project = ProjectId::new();
        let customer_project = ProjectId::new();
        let team_a = TeamId::new();
        let team_b = TeamId::new();
        let company_x = CompanyId::new();
        let organisation = Self {
            store: Arc::new(PostgresTrackingStore::new(pool)),
            project,
            customer_project,
            team_a,
            team_b,
            company_x,
            manager: internal(Role::Manager)?,
            lead: internal(Role::TeamLead)?,
            emp7: internal(Role::Employee)?,
            emp8: internal(Role::Employee)?,
            emp55: internal(Role::Employee)?,
            head: customer(Role::CustomerHead, company_x)?,
            staff: customer(Role::CustomerEmployee, company_x)?,
            url,
            _database: database,
        };
        organisation.seed_directory().await?;
        Ok(organisation)
    }

    async fn seed_directory(&self) -> Result<(), BoxError> {
        let project = self.project.into_inner();
        let customer_project = self.customer_project.into_inner();
        let team_a = self.team_a.into_inner();
        let team_b = self.team_b.into_inner();
        let company = self.company_x.into_inner();
        let manager = self.manager.person().into_inner();
        let lead = self.lead.person();
        let team_a_members = [lead, self.emp7.person(), self.emp8.person()];
        let team_b_member = self.emp55.person();
        let company_staff = [self.head.person(), self.staff.person()];

        self.with_connection(move |connection| {
            diesel::sql_query(concat!(
                "INSERT INTO projects (id, customer_company_id, manager_id) ",
                "VALUES ($1, NULL, $2), ($3, $4, NULL)",
            ))
            .bind::<sql_types::Uuid, _>(project)
            .bind::<sql_types::Uuid, _>(manager)
            .bind::<sql_types::Uuid, _>(customer_project)
            .bind::<sql_types::Uuid, _>(company)
            .execute(connection)?;
            diesel::sql_query("INSERT INTO teams (id, lead_id) VALUES ($1, $2), ($3, NULL)")
                .bind::<sql_types::Uuid, _>(team_a)
                .bind::<sql_types::Uuid, _>(lead.into_inner())
                .bind::<sql_types::Uuid, _>(team_b)
                .execute(connection)?;
            diesel::sql_query(
                "INSERT INTO project_teams (project_id, team_id) VALUES ($1, $2), ($1, $3)",
            )
            .bind::<sql_types::Uuid, _>(project)
            .bind::<sql_types::Uuid, _>(team_a)
            .bind::<sql_types::Uuid, _>(team_b)
            .execute(connection)?;
            for person in team_a_members {
                insert_member(connection, team_a, person)?;
            }
            insert_member(connection, team_b, team_b_member)?;
            for person in company_staff {
                diesel::sql_query(
                    "INSERT INTO customer_staff (company_id, person_id) VALUES ($1, $2)",
                )
                .bind::<sql_types::Uuid, _>(company)
                .bind::<sql_types::Uuid, _>(person.into_inner())
                .execute(connection)?;
            }
            Ok(())
        })
        .await
    }

    /// Runs raw SQL against this organisation's database.
    pub async fn with_connection<T, F>(&self, f: F) -> Result<T, BoxError>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let url = self.url.clone();
        blocking(move || {
            let mut connection =
                PgConnection::establish(&url).map_err(|err| Box::new(err) as BoxError)?;
            f(&mut connection).map_err(|err| Box::new(err) as BoxError)
        })
        .await
    }

    /// Removes `person` from team A, as the directory collaborator would.
    pub async fn remove_from_team_a(&self, person: PersonId) -> Result<(), BoxError> {
        let team = self.team_a.into_inner();
        self.with_connection(move |connection| {
            diesel::sql_query("DELETE FROM team_members WHERE team_id = $1 AND person_id = $2")
                .bind::<sql_types::Uuid, _>(team)
                .bind::<sql_types::Uuid, _>(person.into_inner())
                .execute(connection)
                .map(drop)
        })
        .await
    }

    /// Builds a service over the store.
    pub fn service(&self) -> PgService {
        WorkItemService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.store),
            Arc::new(DefaultClock),
        )
    }

    /// Builds an aggregator over the store.
    pub fn aggregator(&self) -> PgAggregator {
        TrackingAggregator::new(self.service())
    }

    /// Creates a team A item assigned to `assignee`.
    pub async fn team_item(
        &self,
        creator: &Identity,
        assignee: &Identity,
        title: &str,
    ) -> Result<WorkItem, BoxError> {
        let request = CreateWorkItemRequest::new(self.project, OrgRef::Team(self.team_a), title)
            .with_assignee(assignee.person());
        self.service()
            .create(creator, request)
            .await
            .map_err(|err| Box::new(err) as BoxError)
    }
}

fn insert_member(
    connection: &mut PgConnection,
    team: Uuid,
    person: PersonId,
) -> QueryResult<usize> {
    diesel::sql_query("INSERT INTO team_members (team_id, person_id) VALUES ($1, $2)")
        .bind::<sql_types::Uuid, _>(team)
        .bind::<sql_types::Uuid, _>(person.into_inner())
        .execute(connection)
}

/// Seeded organisation in a fresh database, or `None` when no cluster is
/// available on this host.
#[fixture]
pub async fn pg_organisation() -> Result<Option<PgOrganisation>, BoxError> {
    let Some(cluster) = shared_cluster().await else {
        return Ok(None);
    };
    PgOrganisation::seed(cluster).await.map(Some)
}
