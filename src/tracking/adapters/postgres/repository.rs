//! `PostgreSQL` repository implementation for work-item storage.

use super::{
    membership::lock_membership,
    models::{NewWorkItemRow, WorkItemChangeset, WorkItemRow},
    schema::work_items,
    sql::{count_matching, load_matching},
};
use crate::tracking::{
    domain::{
        CompanyId, Hours, ItemType, OrgKind, OrgRef, PageWindow, PersistedWorkItemData, PersonId,
        Priority, ProjectId, Status, TeamId, WorkItem, WorkItemCriteria, WorkItemId,
        WorkItemPage,
    },
    ports::{
        AssigneeCheck, DirectoryError, WorkItemRepository, WorkItemRepositoryError,
        WorkItemRepositoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::io;

/// `PostgreSQL` connection pool type used by tracking adapters.
pub type TrackingPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed work-item store and organisation directory.
#[derive(Debug, Clone)]
pub struct PostgresTrackingStore {
    pool: TrackingPgPool,
}

/// Error types that can absorb connection and runtime failures.
pub(super) trait PersistenceFailure: Send + 'static {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

impl PersistenceFailure for WorkItemRepositoryError {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for DirectoryError {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl From<DieselError> for WorkItemRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl PostgresTrackingStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TrackingPgPool) -> Self {
        Self { pool }
    }

    /// Runs `f` on a pooled connection inside the blocking thread pool. The
    /// connection goes back to the pool when `f` returns, on every path.
    pub(super) async fn run_blocking<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: PersistenceFailure,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(E::from_failure)?;
            f(&mut connection)
        })
        .await
        .map_err(E::from_failure)?
    }
}

#[async_trait]
impl WorkItemRepository for PostgresTrackingStore {
    async fn store(&self, item: &WorkItem) -> WorkItemRepositoryResult<()> {
        let item_id = item.id();
        let guard = assignee_guard(item);
        let new_row = to_new_row(item)?;

        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                ensure_assignee_admitted(tx, guard)?;
                diesel::insert_into(work_items::table)
                    .values(&new_row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            WorkItemRepositoryError::DuplicateWorkItem(item_id)
                        }
                        _ => WorkItemRepositoryError::persistence(err),
                    })?;
                Ok(())
            })
        })
        .await
    }

    async fn update(&self, item: &WorkItem, check: AssigneeCheck) -> WorkItemRepositoryResult<()> {
        let item_id = item.id();
        let guard = match check {
            AssigneeCheck::Required => assignee_guard(item),
            AssigneeCheck::Unchanged => None,
        };
        let changeset = to_changeset(item)?;

        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                ensure_assignee_admitted(tx, guard)?;
                let affected = diesel::update(work_items::table.find(item_id.into_inner()))
                    .set(&changeset)
                    .execute(tx)?;
                if affected == 0 {
                    return Err(WorkItemRepositoryError::NotFound(item_id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: WorkItemId) -> WorkItemRepositoryResult<Option<WorkItem>> {
        self.run_blocking(move |connection| {
            let row = work_items::table
                .find(id.into_inner())
                .select(WorkItemRow::as_select())
                .first::<WorkItemRow>(connection)
                .optional()?;
            row.map(row_to_work_item).transpose()
        })
        .await
    }

    async fn delete(&self, id: WorkItemId) -> WorkItemRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let affected =
                diesel::delete(work_items::table.find(id.into_inner())).execute(connection)?;
            Ok(affected > 0)
        })
        .await
    }

    async fn query(
        &self,
        criteria: &WorkItemCriteria,
        window: Option<PageWindow>,
    ) -> WorkItemRepositoryResult<WorkItemPage> {
        let lookup = criteria.clone();
        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .repeatable_read()
                .read_only()
                .run(|tx| {
                    let count = count_matching(tx, &lookup)?;
                    let rows = load_matching(tx, &lookup, window)?;
                    let items = rows
                        .into_iter()
                        .map(row_to_work_item)
                        .collect::<WorkItemRepositoryResult<Vec<_>>>()?;
                    let total =
                        u64::try_from(count).map_err(WorkItemRepositoryError::persistence)?;
                    Ok(WorkItemPage { items, total })
                })
        })
        .await
    }
}

/// Project, organisation, and assignee that a write must re-validate.
#[derive(Debug, Clone, Copy)]
struct AssigneeGuard {
    project: ProjectId,
    org: OrgRef,
    assignee: PersonId,
}

fn assignee_guard(item: &WorkItem) -> Option<AssigneeGuard> {
    item.assignee().map(|assignee| AssigneeGuard {
        project: item.project(),
        org: item.org(),
        assignee,
    })
}

fn ensure_assignee_admitted(
    connection: &mut PgConnection,
    guard: Option<AssigneeGuard>,
) -> WorkItemRepositoryResult<()> {
    let Some(AssigneeGuard {
        project,
        org,
        assignee,
    }) = guard
    else {
        return Ok(());
    };
    if lock_membership(connection, project, org, assignee)? {
        Ok(())
    } else {
        Err(WorkItemRepositoryError::AssigneeNotEligible { assignee, org })
    }
}

fn hours_to_column(hours: Hours) -> WorkItemRepositoryResult<i64> {
    i64::try_from(hours.hundredths()).map_err(WorkItemRepositoryError::persistence)
}

fn hours_from_column(value: i64) -> WorkItemRepositoryResult<Hours> {
    u64::try_from(value)
        .map(Hours::from_hundredths)
        .map_err(WorkItemRepositoryError::persistence)
}

fn to_new_row(item: &WorkItem) -> WorkItemRepositoryResult<NewWorkItemRow> {
    let org = item.org();
    Ok(NewWorkItemRow {
        id: item.id().into_inner(),
        project_id: item.project().into_inner(),
        org_kind: org.kind().as_str().to_owned(),
        team_id: org.team().map(TeamId::into_inner),
        company_id: org.company().map(CompanyId::into_inner),
        assignee_id: item.assignee().map(PersonId::into_inner),
        assigner_id: item.assigner().into_inner(),
        title: item.title().to_owned(),
        description: item.description().map(str::to_owned),
        item_type: item.item_type().as_str().to_owned(),
        priority: item.priority().as_str().to_owned(),
        status: item.status().as_str().to_owned(),
        due_date: item.due_date(),
        hours_estimated: hours_to_column(item.hours_estimated())?,
        hours_spent: hours_to_column(item.hours_spent())?,
        created_at: item.created_at(),
        updated_at: item.updated_at(),
    })
}

fn to_changeset(item: &WorkItem) -> WorkItemRepositoryResult<WorkItemChangeset> {
    Ok(WorkItemChangeset {
        assignee_id: item.assignee().map(PersonId::into_inner),
        title: item.title().to_owned(),
        description: item.description().map(str::to_owned),
        item_type: item.item_type().as_str().to_owned(),
        priority: item.priority().as_str().to_owned(),
        status: item.status().as_str().to_owned(),
        due_date: item.due_date(),
        hours_estimated: hours_to_column(item.hours_estimated())?,
        hours_spent: hours_to_column(item.hours_spent())?,
        updated_at: item.updated_at(),
    })
}

fn org_from_columns(
    kind: &str,
    team_id: Option<uuid::Uuid>,
    company_id: Option<uuid::Uuid>,
) -> WorkItemRepositoryResult<OrgRef> {
    let org = match (team_id, company_id) {
        (Some(team), None) if kind == OrgKind::Team.as_str() => {
            Some(OrgRef::Team(TeamId::from_uuid(team)))
        }
        (None, Some(company)) if kind == OrgKind::CustomerCompany.as_str() => {
            Some(OrgRef::Company(CompanyId::from_uuid(company)))
        }
        _ => None,
    };
    org.ok_or_else(|| {
        WorkItemRepositoryError::persistence(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("inconsistent organisation columns for kind '{kind}'"),
        ))
    })
}

fn row_to_work_item(row: WorkItemRow) -> WorkItemRepositoryResult<WorkItem> {
    let WorkItemRow {
        id,
        project_id,
        org_kind,
        team_id,
        company_id,
        assignee_id,
        assigner_id,
        title,
        description,
        item_type,
        priority,
        status,
        due_date,
        hours_estimated,
        hours_spent,
        created_at,
        updated_at,
    } = row;

    let data = PersistedWorkItemData {
        id: WorkItemId::from_uuid(id),
        project: ProjectId::from_uuid(project_id),
        org: org_from_columns(&org_kind, team_id, company_id)?,
        assignee: assignee_id.map(PersonId::from_uuid),
        assigner: PersonId::from_uuid(assigner_id),
        title,
        description,
        item_type: ItemType::parse(&item_type).map_err(WorkItemRepositoryError::persistence)?,
        priority: Priority::try_from(priority.as_str())
            .map_err(WorkItemRepositoryError::persistence)?,
        status: Status::try_from(status.as_str()).map_err(WorkItemRepositoryError::persistence)?,
        due_date,
        hours_estimated: hours_from_column(hours_estimated)?,
        hours_spent: hours_from_column(hours_spent)?,
        created_at,
        updated_at,
    };
    Ok(WorkItem::from_persisted(data))
}
