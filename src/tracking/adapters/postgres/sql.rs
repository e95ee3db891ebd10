//! SQL rendering of scoped work-item criteria.
//!
//! Scope predicates are arbitrary AND/OR trees, so listing queries are built
//! as boxed raw SQL with positional binds rather than through the typed DSL.

use super::models::{CountRow, WorkItemRow};
use crate::tracking::domain::{OrgRef, PageWindow, ScopePredicate, WorkItemCriteria, WorkItemFilter};
use chrono::NaiveDate;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types;

const SELECT_ROWS: &str = concat!(
    "SELECT id, project_id, org_kind, team_id, company_id, assignee_id, assigner_id, title, ",
    "description, item_type, priority, status, due_date, hours_estimated, hours_spent, ",
    "created_at, updated_at FROM work_items"
);

const SELECT_COUNT: &str = "SELECT COUNT(*) AS total FROM work_items";

/// Positional bind value.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Bind {
    Uuid(uuid::Uuid),
    UuidArray(Vec<uuid::Uuid>),
    Text(String),
    Date(NaiveDate),
    BigInt(i64),
}

/// `WHERE` clause text with the binds its placeholders refer to.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct WhereClause {
    sql: String,
    binds: Vec<Bind>,
}

impl WhereClause {
    fn placeholder(&mut self, bind: Bind) -> String {
        self.binds.push(bind);
        format!("${}", self.binds.len())
    }

    fn render_scope(&mut self, scope: &ScopePredicate) -> String {
        match scope {
            ScopePredicate::Everything => "TRUE".to_owned(),
            ScopePredicate::Nothing => "FALSE".to_owned(),
            ScopePredicate::AssigneeIs(person) => {
                format!("assignee_id = {}", self.placeholder(Bind::Uuid(person.into_inner())))
            }
            ScopePredicate::AssignerIs(person) => {
                format!("assigner_id = {}", self.placeholder(Bind::Uuid(person.into_inner())))
            }
            ScopePredicate::TeamIn(teams) => {
                let ids = teams.iter().map(|team| team.into_inner()).collect();
                format!("team_id = ANY({})", self.placeholder(Bind::UuidArray(ids)))
            }
            ScopePredicate::CompanyIs(company) => {
                format!("company_id = {}", self.placeholder(Bind::Uuid(company.into_inner())))
            }
            ScopePredicate::ProjectIn(projects) => {
                let ids = projects.iter().map(|project| project.into_inner()).collect();
                format!("project_id = ANY({})", self.placeholder(Bind::UuidArray(ids)))
            }
            ScopePredicate::AllOf(parts) => self.render_group(parts, " AND ", "TRUE"),
            ScopePredicate::AnyOf(parts) => self.render_group(parts, " OR ", "FALSE"),
        }
    }

    fn render_group(&mut self, parts: &[ScopePredicate], joiner: &str, empty: &str) -> String {
        if parts.is_empty() {
            return empty.to_owned();
        }
        let rendered: Vec<String> = parts.iter().map(|part| self.render_scope(part)).collect();
        format!("({})", rendered.join(joiner))
    }

    fn render_filter(&mut self, filter: &WorkItemFilter) -> Vec<String> {
        let mut conditions = Vec::new();
        if let Some(project) = filter.project {
            let slot = self.placeholder(Bind::Uuid(project.into_inner()));
            conditions.push(format!("project_id = {slot}"));
        }
        match filter.org {
            Some(OrgRef::Team(team)) => {
                let slot = self.placeholder(Bind::Uuid(team.into_inner()));
                conditions.push(format!("team_id = {slot}"));
            }
            Some(OrgRef::Company(company)) => {
                let slot = self.placeholder(Bind::Uuid(company.into_inner()));
                conditions.push(format!("company_id = {slot}"));
            }
            None => {}
        }
        if let Some(kind) = filter.org_kind {
            let slot = self.placeholder(Bind::Text(kind.as_str().to_owned()));
            conditions.push(format!("org_kind = {slot}"));
        }
        if let Some(assignee) = filter.assignee {
            let slot = self.placeholder(Bind::Uuid(assignee.into_inner()));
            conditions.push(format!("assignee_id = {slot}"));
        }
        if let Some(assigner) = filter.assigner {
            let slot = self.placeholder(Bind::Uuid(assigner.into_inner()));
            conditions.push(format!("assigner_id = {slot}"));
        }
        if let Some(status) = filter.status {
            let slot = self.placeholder(Bind::Text(status.as_str().to_owned()));
            conditions.push(format!("status = {slot}"));
        }
        if let Some(priority) = filter.priority {
            let slot = self.placeholder(Bind::Text(priority.as_str().to_owned()));
            conditions.push(format!("priority = {slot}"));
        }
        if let Some(item_type) = filter.item_type.as_ref() {
            let slot = self.placeholder(Bind::Text(item_type.as_str().to_owned()));
            conditions.push(format!("item_type = {slot}"));
        }
        if let Some(from) = filter.due_from {
            let slot = self.placeholder(Bind::Date(from));
            conditions.push(format!("due_date >= {slot}"));
        }
        if let Some(to) = filter.due_to {
            let slot = self.placeholder(Bind::Date(to));
            conditions.push(format!("due_date <= {slot}"));
        }
        conditions
    }

    /// Renders scope and filter into a single conjunctive `WHERE` clause.
    pub(super) fn from_criteria(criteria: &WorkItemCriteria) -> Self {
        let mut clause = Self::default();
        let mut conditions = vec![clause.render_scope(&criteria.scope)];
        conditions.extend(clause.render_filter(&criteria.filter));
        clause.sql = format!(" WHERE {}", conditions.join(" AND "));
        clause
    }

    fn paginate(&mut self, window: PageWindow) {
        let limit = self.placeholder(Bind::BigInt(saturating_i64(window.limit())));
        let offset = self.placeholder(Bind::BigInt(saturating_i64(window.offset())));
        self.sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
    }

    pub(super) fn sql(&self) -> &str {
        &self.sql
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn bound_query(prefix: &str, clause: &WhereClause) -> BoxedSqlQuery<'static, Pg, SqlQuery> {
    let mut query = diesel::sql_query(prefix).into_boxed::<Pg>().sql(clause.sql());
    for bind in clause.binds.iter().cloned() {
        query = match bind {
            Bind::Uuid(value) => query.bind::<sql_types::Uuid, _>(value),
            Bind::UuidArray(values) => query.bind::<sql_types::Array<sql_types::Uuid>, _>(values),
            Bind::Text(value) => query.bind::<sql_types::Text, _>(value),
            Bind::Date(value) => query.bind::<sql_types::Date, _>(value),
            Bind::BigInt(value) => query.bind::<sql_types::BigInt, _>(value),
        };
    }
    query
}

/// Counts rows matching `criteria`.
pub(super) fn count_matching(
    connection: &mut PgConnection,
    criteria: &WorkItemCriteria,
) -> QueryResult<i64> {
    let clause = WhereClause::from_criteria(criteria);
    let row = bound_query(SELECT_COUNT, &clause).get_result::<CountRow>(connection)?;
    Ok(row.total)
}

/// Loads rows matching `criteria` in listing order, optionally paginated.
pub(super) fn load_matching(
    connection: &mut PgConnection,
    criteria: &WorkItemCriteria,
    window: Option<PageWindow>,
) -> QueryResult<Vec<WorkItemRow>> {
    let mut clause = WhereClause::from_criteria(criteria);
    clause.sql.push_str(" ORDER BY created_at DESC, id ASC");
    if let Some(page) = window {
        clause.paginate(page);
    }
    bound_query(SELECT_ROWS, &clause).load::<WorkItemRow>(connection)
}
