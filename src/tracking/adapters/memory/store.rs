//! Shared state and directory seeding for the in-memory tracking store.

use std::collections::{BTreeSet, HashMap};
use std::io;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::tracking::{
    domain::{CompanyId, OrgRef, PersonId, Project, ProjectId, Roster, TeamId, WorkItem, WorkItemId},
    ports::{DirectoryError, DirectoryResult},
};

/// Thread-safe in-memory work-item store and organisation directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackingStore {
    state: Arc<RwLock<TrackingState>>,
}

#[derive(Debug, Default)]
pub(super) struct TrackingState {
    pub(super) items: HashMap<WorkItemId, WorkItem>,
    pub(super) projects: HashMap<ProjectId, Project>,
    pub(super) project_teams: HashMap<ProjectId, BTreeSet<TeamId>>,
    pub(super) team_members: HashMap<TeamId, BTreeSet<PersonId>>,
    pub(super) team_leads: HashMap<TeamId, PersonId>,
    pub(super) company_staff: HashMap<CompanyId, BTreeSet<PersonId>>,
}

impl TrackingState {
    /// Resolves the roster for `org` within `project` from the current
    /// membership tables.
    pub(super) fn roster(&self, project: ProjectId, org: OrgRef) -> Option<Roster> {
        let record = self.projects.get(&project)?;
        let members = match org {
            OrgRef::Team(team) => {
                let attached = self
                    .project_teams
                    .get(&project)
                    .is_some_and(|teams| teams.contains(&team));
                if !attached {
                    return None;
                }
                self.team_members.get(&team)
            }
            OrgRef::Company(company) => {
                if record.customer() != Some(company) {
                    return None;
                }
                self.company_staff.get(&company)
            }
        };
        Some(Roster::new(
            project,
            org,
            members.into_iter().flatten().copied(),
        ))
    }
}

impl InMemoryTrackingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn read(&self) -> io::Result<RwLockReadGuard<'_, TrackingState>> {
        self.state
            .read()
            .map_err(|err| io::Error::other(err.to_string()))
    }

    pub(super) fn write(&self) -> io::Result<RwLockWriteGuard<'_, TrackingState>> {
        self.state
            .write()
            .map_err(|err| io::Error::other(err.to_string()))
    }

    fn seed(&self, apply: impl FnOnce(&mut TrackingState)) -> DirectoryResult<()> {
        let mut state = self.write().map_err(DirectoryError::persistence)?;
        apply(&mut state);
        Ok(())
    }

    /// Registers or replaces a project.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Persistence`] when the lock is poisoned.
    pub fn add_project(&self, project: Project) -> DirectoryResult<()> {
        self.seed(|state| {
            state.projects.insert(project.id(), project);
        })
    }

    /// Attaches a team to a project so its members become assignable there.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Persistence`] when the lock is poisoned.
    pub fn attach_team(&self, project: ProjectId, team: TeamId) -> DirectoryResult<()> {
        self.seed(|state| {
            state.project_teams.entry(project).or_default().insert(team);
        })
    }

    /// Adds an employee to a team.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Persistence`] when the lock is poisoned.
    pub fn add_team_member(&self, team: TeamId, person: PersonId) -> DirectoryResult<()> {
        self.seed(|state| {
            state.team_members.entry(team).or_default().insert(person);
        })
    }

    /// Removes an employee from a team.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Persistence`] when the lock is poisoned.
    pub fn remove_team_member(&self, team: TeamId, person: PersonId) -> DirectoryResult<()> {
        self.seed(|state| {
            if let Some(members) = state.team_members.get_mut(&team) {
                members.remove(&person);
            }
        })
    }

    /// Sets the lead of a team.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Persistence`] when the lock is poisoned.
    pub fn set_team_lead(&self, team: TeamId, person: PersonId) -> DirectoryResult<()> {
        self.seed(|state| {
            state.team_leads.insert(team, person);
        })
    }

    /// Adds a staff member to a customer company.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Persistence`] when the lock is poisoned.
    pub fn add_customer_staff(&self, company: CompanyId, person: PersonId) -> DirectoryResult<()> {
        self.seed(|state| {
            state.company_staff.entry(company).or_default().insert(person);
        })
    }
}
