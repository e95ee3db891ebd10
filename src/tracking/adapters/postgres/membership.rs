//! Membership queries shared by the directory and the write path.

use super::{
    models::ProjectRow,
    schema::{customer_staff, project_teams, projects, team_members},
};
use crate::tracking::domain::{CompanyId, OrgRef, PersonId, Project, ProjectId, Roster};
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;

pub(super) fn load_project(
    connection: &mut PgConnection,
    id: ProjectId,
) -> QueryResult<Option<Project>> {
    let row = projects::table
        .find(id.into_inner())
        .select(ProjectRow::as_select())
        .first::<ProjectRow>(connection)
        .optional()?;
    Ok(row.map(project_from_row))
}

pub(super) fn project_from_row(row: ProjectRow) -> Project {
    let id = ProjectId::from_uuid(row.id);
    let project = row.customer_company_id.map_or_else(
        || Project::internal(id),
        |company| Project::for_customer(id, CompanyId::from_uuid(company)),
    );
    let Some(manager) = row.manager_id else {
        return project;
    };
    project.with_manager(PersonId::from_uuid(manager))
}

/// Returns `true` when `org` is attached to `project`.
fn org_attached(
    connection: &mut PgConnection,
    project: &Project,
    org: OrgRef,
) -> QueryResult<bool> {
    match org {
        OrgRef::Team(team) => diesel::select(exists(
            project_teams::table
                .filter(project_teams::project_id.eq(project.id().into_inner()))
                .filter(project_teams::team_id.eq(team.into_inner())),
        ))
        .get_result(connection),
        OrgRef::Company(company) => Ok(project.customer() == Some(company)),
    }
}

pub(super) fn load_roster(
    connection: &mut PgConnection,
    project_id: ProjectId,
    org: OrgRef,
) -> QueryResult<Option<Roster>> {
    let Some(project) = load_project(connection, project_id)? else {
        return Ok(None);
    };
    if !org_attached(connection, &project, org)? {
        return Ok(None);
    }
    let members: Vec<uuid::Uuid> = match org {
        OrgRef::Team(team) => team_members::table
            .filter(team_members::team_id.eq(team.into_inner()))
            .select(team_members::person_id)
            .load(connection)?,
        OrgRef::Company(company) => customer_staff::table
            .filter(customer_staff::company_id.eq(company.into_inner()))
            .select(customer_staff::person_id)
            .load(connection)?,
    };
    Ok(Some(Roster::new(
        project_id,
        org,
        members.into_iter().map(PersonId::from_uuid),
    )))
}

/// Checks that `person` may be assigned work in `org` for `project`,
/// taking share locks on the rows that grant eligibility so they cannot be
/// removed before the surrounding transaction commits.
pub(super) fn lock_membership(
    connection: &mut PgConnection,
    project_id: ProjectId,
    org: OrgRef,
    person: PersonId,
) -> QueryResult<bool> {
    let locked = projects::table
        .find(project_id.into_inner())
        .select(ProjectRow::as_select())
        .for_share()
        .first::<ProjectRow>(connection)
        .optional()?
        .map(project_from_row);
    let Some(project) = locked else {
        return Ok(false);
    };

    match org {
        OrgRef::Team(team) => {
            let attached = project_teams::table
                .filter(project_teams::project_id.eq(project.id().into_inner()))
                .filter(project_teams::team_id.eq(team.into_inner()))
                .select(project_teams::team_id)
                .for_share()
                .first::<uuid::Uuid>(connection)
                .optional()?
                .is_some();
            if !attached {
                return Ok(false);
            }
            let member = team_members::table
                .filter(team_members::team_id.eq(team.into_inner()))
                .filter(team_members::person_id.eq(person.into_inner()))
                .select(team_members::person_id)
                .for_share()
                .first::<uuid::Uuid>(connection)
                .optional()?;
            Ok(member.is_some())
        }
        OrgRef::Company(company) => {
            if project.customer() != Some(company) {
                return Ok(false);
            }
            let member = customer_staff::table
                .filter(customer_staff::company_id.eq(company.into_inner()))
                .filter(customer_staff::person_id.eq(person.into_inner()))
                .select(customer_staff::person_id)
                .for_share()
                .first::<uuid::Uuid>(connection)
                .optional()?;
            Ok(member.is_some())
        }
    }
}
