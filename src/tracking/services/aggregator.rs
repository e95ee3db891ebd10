//! Dashboard and statistics views over a caller's scope.

use super::{TrackingResult, WorkItemService};
use crate::tracking::{
    domain::{
        Dashboard, Identity, ProjectId, QueryIntent, Role, ScopeContext, ScopePredicate,
        WorkItem, WorkItemFilter, WorkItemStatistics,
    },
    ports::{OrganisationDirectory, WorkItemRepository},
};
use mockable::Clock;
use tracing::debug;

/// Read-only aggregate views.
///
/// Every section is a query over the caller's own visibility scope, so a
/// dashboard never shows more than a listing would.
pub struct TrackingAggregator<R, D, C>
where
    R: WorkItemRepository,
    D: OrganisationDirectory,
    C: Clock + Send + Sync,
{
    items: WorkItemService<R, D, C>,
}

impl<R, D, C> TrackingAggregator<R, D, C>
where
    R: WorkItemRepository,
    D: OrganisationDirectory,
    C: Clock + Send + Sync,
{
    /// Creates an aggregator reading through `items`.
    #[must_use]
    pub const fn new(items: WorkItemService<R, D, C>) -> Self {
        Self { items }
    }

    /// Builds the role-shaped dashboard for `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackingError::Internal`] when storage or the
    /// directory fails.
    pub async fn dashboard(&self, identity: &Identity) -> TrackingResult<Dashboard> {
        let context = self.items.scope_context(identity).await?;
        let mut dashboard = Dashboard::default();

        match identity.role() {
            Role::Employee | Role::CustomerEmployee => {
                dashboard.my_tasks = Some(self.my_tasks(identity, &context).await?);
            }
            Role::TeamLead => {
                dashboard.my_tasks = Some(self.my_tasks(identity, &context).await?);
                let teams = ScopePredicate::TeamIn(context.led_teams().clone());
                dashboard.team_tasks = Some(self.browse(identity, &context, teams).await?);
                dashboard.assigned_by_me = Some(self.assigned_by_me(identity, &context).await?);
            }
            Role::Manager => {
                dashboard.assigned_by_me = Some(self.assigned_by_me(identity, &context).await?);
                let projects = ScopePredicate::ProjectIn(context.managed_projects().clone());
                dashboard.project_tasks = Some(self.browse(identity, &context, projects).await?);
            }
            Role::CustomerHead => {
                dashboard.my_tasks = Some(self.my_tasks(identity, &context).await?);
                let company = identity
                    .company()
                    .map_or(ScopePredicate::Nothing, ScopePredicate::CompanyIs);
                dashboard.company_tasks = Some(self.browse(identity, &context, company).await?);
                dashboard.assigned_by_me = Some(self.assigned_by_me(identity, &context).await?);
            }
            Role::Admin => {
                dashboard.my_tasks = Some(self.my_tasks(identity, &context).await?);
                dashboard.assigned_by_me = Some(self.assigned_by_me(identity, &context).await?);
            }
        }

        debug!(actor = %identity.person(), role = %identity.role(), "dashboard built");
        Ok(dashboard)
    }

    /// Computes statistics over the items `identity` can see, optionally
    /// restricted to one project.
    ///
    /// The totals agree with an unpaginated [`WorkItemService::list`] using
    /// the same filter.
    ///
    /// # Errors
    ///
    /// Returns [`super::TrackingError::Internal`] when storage or the
    /// directory fails.
    pub async fn statistics(
        &self,
        identity: &Identity,
        project: Option<ProjectId>,
    ) -> TrackingResult<WorkItemStatistics> {
        let context = self.items.scope_context(identity).await?;
        let filter = project.map_or_else(WorkItemFilter::new, |id| {
            WorkItemFilter::new().with_project(id)
        });
        let visible = self
            .items
            .scoped_items(
                identity,
                &context,
                QueryIntent::Browse,
                ScopePredicate::Everything,
                filter,
            )
            .await?;
        let today = self.items.clock().utc().date_naive();
        Ok(WorkItemStatistics::collect(&visible, today))
    }

    async fn my_tasks(
        &self,
        identity: &Identity,
        context: &ScopeContext,
    ) -> TrackingResult<Vec<WorkItem>> {
        self.items
            .scoped_items(
                identity,
                context,
                QueryIntent::MyTasks,
                ScopePredicate::Everything,
                WorkItemFilter::new(),
            )
            .await
    }

    async fn assigned_by_me(
        &self,
        identity: &Identity,
        context: &ScopeContext,
    ) -> TrackingResult<Vec<WorkItem>> {
        self.items
            .scoped_items(
                identity,
                context,
                QueryIntent::AssignedByMe,
                ScopePredicate::Everything,
                WorkItemFilter::new(),
            )
            .await
    }

    async fn browse(
        &self,
        identity: &Identity,
        context: &ScopeContext,
        narrowing: ScopePredicate,
    ) -> TrackingResult<Vec<WorkItem>> {
        self.items
            .scoped_items(
                identity,
                context,
                QueryIntent::Browse,
                narrowing,
                WorkItemFilter::new(),
            )
            .await
    }
}
