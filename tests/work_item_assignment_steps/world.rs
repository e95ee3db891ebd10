//! Shared world state for work-item assignment BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use worktrack::tracking::{
    adapters::memory::InMemoryTrackingStore,
    domain::{
        CompanyId, Dashboard, Identity, OrgRef, PersonId, Project, ProjectId, Role, TeamId,
        WorkItem, WorkItemId,
    },
    services::{
        CreateWorkItemRequest, TrackingAggregator, TrackingError, WorkItemListing,
        WorkItemService,
    },
};

/// Service type used by the BDD world.
pub type TestService = WorkItemService<InMemoryTrackingStore, InMemoryTrackingStore, DefaultClock>;

/// Aggregator type used by the BDD world.
pub type TestAggregator =
    TrackingAggregator<InMemoryTrackingStore, InMemoryTrackingStore, DefaultClock>;

/// Scenario world for work-item assignment behaviour tests.
pub struct WorkItemWorld {
    pub service: TestService,
    pub aggregator: TestAggregator,
    pub project: ProjectId,
    pub customer_project: ProjectId,
    pub team_a: TeamId,
    pub company_x: CompanyId,
    pub people: HashMap<String, Identity>,
    pub current_item: Option<WorkItem>,
    pub company_items: Vec<WorkItemId>,
    pub last_result: Option<Result<WorkItem, TrackingError>>,
    pub last_listing: Option<WorkItemListing>,
    pub last_dashboard: Option<Dashboard>,
}

fn seed_person(
    people: &mut HashMap<String, Identity>,
    name: &str,
    role: Role,
    company: Option<CompanyId>,
) -> PersonId {
    let identity = match company {
        Some(id) => Identity::customer(PersonId::new(), role, id),
        None => Identity::internal(PersonId::new(), role),
    }
    .expect("role matches affiliation");
    people.insert(name.to_owned(), identity);
    identity.person()
}

impl WorkItemWorld {
    /// Creates a world with a seeded organisation: team A (Lead, Emp7, Emp8,
    /// Emp99) and team B (Emp55) on one internal project, and company X
    /// (Head, Staff) owning a customer project.
    #[must_use]
    pub fn new() -> Self {
        let store = InMemoryTrackingStore::new();
        let project = ProjectId::new();
        let customer_project = ProjectId::new();
        let team_a = TeamId::new();
        let team_b = TeamId::new();
        let company_x = CompanyId::new();
        let mut people = HashMap::new();

        let manager = seed_person(&mut people, "Manager", Role::Manager, None);
        let lead = seed_person(&mut people, "Lead", Role::TeamLead, None);
        let team_a_members = [
            lead,
            seed_person(&mut people, "Emp7", Role::Employee, None),
            seed_person(&mut people, "Emp8", Role::Employee, None),
            seed_person(&mut people, "Emp99", Role::Employee, None),
        ];
        let emp55 = seed_person(&mut people, "Emp55", Role::Employee, None);
        let company_staff = [
            seed_person(&mut people, "Head", Role::CustomerHead, Some(company_x)),
            seed_person(&mut people, "Staff", Role::CustomerEmployee, Some(company_x)),
        ];

        store
            .add_project(Project::internal(project).with_manager(manager))
            .expect("seed project");
        store
            .add_project(Project::for_customer(customer_project, company_x))
            .expect("seed customer project");
        store.attach_team(project, team_a).expect("attach team A");
        store.attach_team(project, team_b).expect("attach team B");
        store.set_team_lead(team_a, lead).expect("seed lead");
        for person in team_a_members {
            store.add_team_member(team_a, person).expect("seed team A");
        }
        store.add_team_member(team_b, emp55).expect("seed team B");
        for person in company_staff {
            store
                .add_customer_staff(company_x, person)
                .expect("seed company staff");
        }

        let service = || {
            WorkItemService::new(
                Arc::new(store.clone()),
                Arc::new(store.clone()),
                Arc::new(DefaultClock),
            )
        };

        Self {
            service: service(),
            aggregator: TrackingAggregator::new(service()),
            project,
            customer_project,
            team_a,
            company_x,
            people,
            current_item: None,
            company_items: Vec::new(),
            last_result: None,
            last_listing: None,
            last_dashboard: None,
        }
    }

    /// Looks up a seeded person by scenario name.
    pub fn person(&self, name: &str) -> Result<Identity, eyre::Report> {
        self.people
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown person {name} in scenario"))
    }

    /// Returns the work item the scenario is operating on.
    pub fn item(&self) -> Result<&WorkItem, eyre::Report> {
        self.current_item
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing work item in scenario world"))
    }

    /// Builds a team A creation request assigned to `assignee`.
    pub fn team_request(&self, title: &str, assignee: &Identity) -> CreateWorkItemRequest {
        CreateWorkItemRequest::new(self.project, OrgRef::Team(self.team_a), title)
            .with_assignee(assignee.person())
    }

    /// Records the outcome of a mutating operation, keeping the last
    /// successful item as the scenario's current item.
    pub fn record(&mut self, result: Result<WorkItem, TrackingError>) {
        if let Ok(ref updated) = result {
            self.current_item = Some(updated.clone());
        }
        self.last_result = Some(result);
    }
}

impl Default for WorkItemWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> WorkItemWorld {
    WorkItemWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
