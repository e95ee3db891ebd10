//! Work-item orchestration: creation, edits, workflow, and transfer.

use super::{
    CreateWorkItemRequest, Denial, TrackingConfig, TrackingError, TrackingResult,
    UpdateWorkItemRequest,
};
use crate::tracking::{
    domain::{
        Authority, Hours, Identity, OrgRef, PageInfo, Pagination, PersonId, ProjectId,
        QueryIntent, Role, Roster, ScopeContext, ScopePredicate, Status, WorkItem,
        WorkItemCriteria, WorkItemDomainError, WorkItemFilter, WorkItemId, authority, manages,
        manages_org, resolve_scope,
    },
    ports::{AssigneeCheck, OrganisationDirectory, WorkItemRepository},
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tracing target for status-change audit events.
pub const AUDIT_TARGET: &str = "worktrack::audit";

/// One page of a work-item listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkItemListing {
    /// Items on the requested page.
    pub items: Vec<WorkItem>,
    /// Pagination metadata.
    pub pagination: PageInfo,
}

/// Work-item orchestration service.
#[derive(Clone)]
pub struct WorkItemService<R, D, C>
where
    R: WorkItemRepository,
    D: OrganisationDirectory,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    directory: Arc<D>,
    clock: Arc<C>,
    config: TrackingConfig,
}

impl<R, D, C> WorkItemService<R, D, C>
where
    R: WorkItemRepository,
    D: OrganisationDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(repository: Arc<R>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            repository,
            directory,
            clock,
            config: TrackingConfig::default(),
        }
    }

    /// Replaces the service configuration.
    #[must_use]
    pub const fn with_config(mut self, config: TrackingConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> TrackingConfig {
        self.config
    }

    /// Creates a work item on behalf of `identity`, who becomes its
    /// assigner.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Forbidden`] when the caller may not create
    /// items for the organisation, and [`TrackingError::Validation`] for
    /// malformed fields, an unknown project, an organisation outside the
    /// project, or an ineligible assignee.
    pub async fn create(
        &self,
        identity: &Identity,
        request: CreateWorkItemRequest,
    ) -> TrackingResult<WorkItem> {
        let org = request.org();
        let role = identity.role();
        if !role.can_create(org.kind()) {
            return Err(deny(
                identity,
                Denial::CreateNotPermitted {
                    role,
                    kind: org.kind(),
                },
            ));
        }
        let context = self.scope_context(identity).await?;
        if !manages_org(identity, &context, org) {
            return Err(deny(identity, Denial::OutsideManagedOrg(org)));
        }

        let fields = request.into_fields()?;
        let roster = self.roster_for(fields.project, fields.org).await?;
        if let Some(assignee) = fields.assignee {
            ensure_admitted(&roster, assignee)?;
        }

        let item = WorkItem::create(fields, identity.person(), &*self.clock)?;
        self.repository.store(&item).await?;
        info!(
            item = %item.id(),
            project = %item.project(),
            org = %item.org(),
            actor = %identity.person(),
            "work item created"
        );
        Ok(item)
    }

    /// Returns a work item visible to `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::NotFound`] when the item does not exist or
    /// lies outside the caller's scope.
    pub async fn get(&self, identity: &Identity, id: WorkItemId) -> TrackingResult<WorkItem> {
        let context = self.scope_context(identity).await?;
        let item = self.load_visible(identity, &context, id).await?;
        debug!(item = %id, actor = %identity.person(), "work item read");
        Ok(item)
    }

    /// Applies a partial update.
    ///
    /// Assignees may change only `status` and `hours_spent`; every other
    /// field needs the assigner or management authority. The assigner of
    /// record never changes.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Validation`] for an empty or malformed
    /// update or an ineligible new assignee, [`TrackingError::NotFound`]
    /// when the item does not exist or is out of scope, and
    /// [`TrackingError::Forbidden`] when the caller lacks authority for the
    /// requested fields.
    pub async fn update(
        &self,
        identity: &Identity,
        id: WorkItemId,
        request: UpdateWorkItemRequest,
    ) -> TrackingResult<WorkItem> {
        let changes = request.into_changes()?;
        let context = self.scope_context(identity).await?;
        let required = if changes.touches_management_fields() {
            Authority::Edit
        } else {
            Authority::Work
        };
        let mut item = self
            .load_mutable(identity, &context, id, required, Denial::EditNotPermitted)
            .await?;

        let check = match changes.assignee {
            Some(Some(assignee)) if item.assignee() != Some(assignee) => {
                let roster = self.roster_for(item.project(), item.org()).await?;
                ensure_admitted(&roster, assignee)?;
                AssigneeCheck::Required
            }
            _ => AssigneeCheck::Unchanged,
        };

        item.apply(changes, &*self.clock)?;
        self.repository.update(&item, check).await?;
        info!(item = %id, actor = %identity.person(), "work item updated");
        Ok(item)
    }

    /// Permanently deletes a work item.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Forbidden`] for roles other than admin and
    /// manager and [`TrackingError::NotFound`] when the item does not exist
    /// or lies outside the caller's scope.
    pub async fn delete(&self, identity: &Identity, id: WorkItemId) -> TrackingResult<()> {
        let role = identity.role();
        if !role.can_delete() {
            return Err(deny(identity, Denial::DeleteNotPermitted(role)));
        }
        let context = self.scope_context(identity).await?;
        self.load_visible(identity, &context, id).await?;
        if !self.repository.delete(id).await? {
            return Err(TrackingError::NotFound(id));
        }
        info!(item = %id, actor = %identity.person(), "work item deleted");
        Ok(())
    }

    /// Lists work items visible to `identity` that match `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Validation`] for an inverted due-date range.
    pub async fn list(
        &self,
        identity: &Identity,
        filter: WorkItemFilter,
        pagination: Pagination,
    ) -> TrackingResult<WorkItemListing> {
        self.list_for(identity, QueryIntent::Browse, filter, pagination)
            .await
    }

    /// Lists work items for a specific view of the caller's scope, such as
    /// their own assignments.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Validation`] for an inverted due-date range.
    pub async fn list_for(
        &self,
        identity: &Identity,
        intent: QueryIntent,
        filter: WorkItemFilter,
        pagination: Pagination,
    ) -> TrackingResult<WorkItemListing> {
        filter.validate()?;
        let context = self.scope_context(identity).await?;
        let scope = resolve_scope(identity, &context, intent);
        let window = pagination.clamp(self.config.default_page_size, self.config.max_page_size);
        let page = self
            .repository
            .query(&WorkItemCriteria::new(scope, filter), Some(window))
            .await?;
        debug!(
            actor = %identity.person(),
            page = window.page(),
            total = page.total,
            "work items listed"
        );
        Ok(WorkItemListing {
            items: page.items,
            pagination: PageInfo::new(window, page.total),
        })
    }

    /// Moves a work item to a new status. Any status may follow any other.
    ///
    /// Each transition is recorded as an audit event on [`AUDIT_TARGET`].
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Validation`] for an unknown status,
    /// [`TrackingError::NotFound`] when the item does not exist or is out of
    /// scope, and [`TrackingError::Forbidden`] when the caller is neither assignee,
    /// assigner, nor a manager of the item's organisation.
    pub async fn set_status(
        &self,
        identity: &Identity,
        id: WorkItemId,
        status: &str,
    ) -> TrackingResult<WorkItem> {
        let target = Status::try_from(status)?;
        let context = self.scope_context(identity).await?;
        let mut item = self
            .load_mutable(identity, &context, id, Authority::Work, Denial::StatusNotPermitted)
            .await?;

        let previous = item.status();
        item.set_status(target, &*self.clock);
        self.repository
            .update(&item, AssigneeCheck::Unchanged)
            .await?;
        info!(
            target: AUDIT_TARGET,
            item = %id,
            actor = %identity.person(),
            from = %previous,
            to = %target,
            "status changed"
        );
        Ok(item)
    }

    /// Adds `hours` to the item's logged total.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Validation`] for a malformed or zero amount,
    /// [`TrackingError::NotFound`] when the item does not exist or is out of scope, and
    /// [`TrackingError::Forbidden`] when the caller has no working authority
    /// over the item.
    pub async fn log_hours(
        &self,
        identity: &Identity,
        id: WorkItemId,
        hours: &str,
    ) -> TrackingResult<WorkItem> {
        let amount = Hours::parse(hours)?;
        let context = self.scope_context(identity).await?;
        let mut item = self
            .load_mutable(identity, &context, id, Authority::Work, Denial::HoursNotPermitted)
            .await?;

        item.log_hours(amount, &*self.clock)?;
        self.repository
            .update(&item, AssigneeCheck::Unchanged)
            .await?;
        info!(
            item = %id,
            actor = %identity.person(),
            hours = %amount,
            total = %item.hours_spent(),
            "hours logged"
        );
        Ok(item)
    }

    /// Hands a work item to another member of its team or company.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::NotFound`] when the item does not exist or
    /// lies outside the caller's scope, [`TrackingError::Forbidden`] when the
    /// caller does not manage the item's organisation, and
    /// [`TrackingError::Validation`] when `new_assignee` is not an eligible
    /// candidate (including the current assignee).
    pub async fn transfer(
        &self,
        identity: &Identity,
        id: WorkItemId,
        new_assignee: PersonId,
    ) -> TrackingResult<WorkItem> {
        let (mut item, roster) = self.transfer_target(identity, id).await?;
        let previous = item.assignee();
        if !roster.assignable(previous).contains(&new_assignee) {
            return Err(WorkItemDomainError::IneligibleAssignee {
                assignee: new_assignee,
                org: item.org(),
            }
            .into());
        }

        item.reassign(new_assignee, &*self.clock);
        self.repository
            .update(&item, AssigneeCheck::Required)
            .await?;
        info!(
            item = %id,
            actor = %identity.person(),
            from = ?previous,
            to = %new_assignee,
            "work item transferred"
        );
        Ok(item)
    }

    /// Lists the people a work item may be transferred to.
    ///
    /// # Errors
    ///
    /// Fails like [`Self::transfer`] when the caller may not transfer the
    /// item.
    pub async fn transfer_candidates(
        &self,
        identity: &Identity,
        id: WorkItemId,
    ) -> TrackingResult<Vec<PersonId>> {
        let (item, roster) = self.transfer_target(identity, id).await?;
        Ok(roster.assignable(item.assignee()).into_iter().collect())
    }

    /// Lists the people new work in `org` for `project` may be assigned to.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Forbidden`] when the caller may not create
    /// items for the organisation and [`TrackingError::Validation`] when the
    /// project is unknown or the organisation is not part of it.
    pub async fn list_assignable(
        &self,
        identity: &Identity,
        project: ProjectId,
        org: OrgRef,
    ) -> TrackingResult<Vec<PersonId>> {
        let role = identity.role();
        if !role.can_create(org.kind()) {
            return Err(deny(
                identity,
                Denial::CreateNotPermitted {
                    role,
                    kind: org.kind(),
                },
            ));
        }
        let context = self.scope_context(identity).await?;
        if !manages_org(identity, &context, org) {
            return Err(deny(identity, Denial::OutsideManagedOrg(org)));
        }
        let roster = self.roster_for(project, org).await?;
        Ok(roster.assignable(None).into_iter().collect())
    }

    /// Loads the directory facts that scope resolution needs for the caller.
    pub(super) async fn scope_context(&self, identity: &Identity) -> TrackingResult<ScopeContext> {
        let person = identity.person();
        let context = match identity.role() {
            Role::TeamLead => {
                ScopeContext::new().with_led_teams(self.directory.teams_led_by(person).await?)
            }
            Role::Manager => ScopeContext::new()
                .with_managed_projects(self.directory.projects_managed_by(person).await?),
            Role::Admin | Role::Employee | Role::CustomerHead | Role::CustomerEmployee => {
                ScopeContext::new()
            }
        };
        Ok(context)
    }

    /// Returns every item in the caller's `intent` view that also satisfies
    /// `narrowing` and `filter`, newest first.
    pub(super) async fn scoped_items(
        &self,
        identity: &Identity,
        context: &ScopeContext,
        intent: QueryIntent,
        narrowing: ScopePredicate,
        filter: WorkItemFilter,
    ) -> TrackingResult<Vec<WorkItem>> {
        let scope = resolve_scope(identity, context, intent).and(narrowing);
        let page = self
            .repository
            .query(&WorkItemCriteria::new(scope, filter), None)
            .await?;
        Ok(page.items)
    }

    pub(super) fn clock(&self) -> &C {
        &self.clock
    }

    async fn load_existing(&self, id: WorkItemId) -> TrackingResult<WorkItem> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TrackingError::NotFound(id))
    }

    async fn load_visible(
        &self,
        identity: &Identity,
        context: &ScopeContext,
        id: WorkItemId,
    ) -> TrackingResult<WorkItem> {
        let item = self.load_existing(id).await?;
        if resolve_scope(identity, context, QueryIntent::Browse).matches(&item) {
            Ok(item)
        } else {
            debug!(item = %id, actor = %identity.person(), "work item outside caller scope");
            Err(TrackingError::NotFound(id))
        }
    }

    /// Loads an item the caller may mutate. Authority is checked before
    /// scope: no claim on the item is `Forbidden`, a claim on an item outside
    /// the caller's scope is `NotFound`.
    async fn load_mutable(
        &self,
        identity: &Identity,
        context: &ScopeContext,
        id: WorkItemId,
        required: Authority,
        denial: Denial,
    ) -> TrackingResult<WorkItem> {
        let item = self.load_existing(id).await?;
        if authority(identity, context, &item) < required {
            return Err(deny(identity, denial));
        }
        if !resolve_scope(identity, context, QueryIntent::Browse).matches(&item) {
            debug!(item = %id, actor = %identity.person(), "work item outside caller scope");
            return Err(TrackingError::NotFound(id));
        }
        Ok(item)
    }

    async fn roster_for(&self, project: ProjectId, org: OrgRef) -> TrackingResult<Roster> {
        if self.directory.project(project).await?.is_none() {
            return Err(WorkItemDomainError::UnknownProject(project).into());
        }
        self.directory
            .roster(project, org)
            .await?
            .ok_or_else(|| WorkItemDomainError::OrganisationNotInProject { project, org }.into())
    }

    async fn transfer_target(
        &self,
        identity: &Identity,
        id: WorkItemId,
    ) -> TrackingResult<(WorkItem, Roster)> {
        if !identity.role().can_transfer() {
            return Err(deny(identity, Denial::TransferNotPermitted));
        }
        let context = self.scope_context(identity).await?;
        let item = self.load_visible(identity, &context, id).await?;
        if !manages(identity, &context, &item) {
            return Err(deny(identity, Denial::TransferNotPermitted));
        }
        let roster = self.roster_for(item.project(), item.org()).await?;
        Ok((item, roster))
    }
}

fn ensure_admitted(roster: &Roster, assignee: PersonId) -> Result<(), WorkItemDomainError> {
    if roster.admits(assignee) {
        Ok(())
    } else {
        Err(WorkItemDomainError::IneligibleAssignee {
            assignee,
            org: roster.org(),
        })
    }
}

fn deny(identity: &Identity, denial: Denial) -> TrackingError {
    warn!(
        actor = %identity.person(),
        role = %identity.role(),
        reason = %denial,
        "operation denied"
    );
    TrackingError::Forbidden(denial)
}
