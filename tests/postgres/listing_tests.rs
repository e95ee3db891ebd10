//! Scoped, paginated listing on `PostgreSQL`.

use super::helpers::{BoxError, PgOrganisation, pg_organisation};
use rstest::rstest;
use worktrack::tracking::{
    domain::{OrgRef, Pagination, Status, WorkItemFilter},
    services::CreateWorkItemRequest,
};

impl PgOrganisation {
    async fn seed_team_items(&self, done: usize, open: usize) -> Result<(), BoxError> {
        let service = self.service();
        for index in 0..done + open {
            let status = if index < done { "Done" } else { "To Do" };
            let request = CreateWorkItemRequest::new(
                self.project,
                OrgRef::Team(self.team_a),
                format!("Task {index}"),
            )
            .with_assignee(self.emp7.person())
            .with_status(status);
            service.create(&self.manager, request).await?;
        }
        Ok(())
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_pages_report_filtered_totals(
    #[future] pg_organisation: Result<Option<PgOrganisation>, BoxError>,
) -> Result<(), BoxError> {
    let Some(org) = pg_organisation.await? else {
        return Ok(());
    };
    org.seed_team_items(25, 5).await?;
    let service = org.service();
    let done = WorkItemFilter::new().with_status(Status::Done);

    let first = service
        .list(&org.manager, done.clone(), Pagination::new(1, 10))
        .await?;
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.pagination.total_items, 25);
    assert_eq!(first.pagination.total_pages, 3);
    assert!(first.items.iter().all(|item| item.status() == Status::Done));

    let last = service
        .list(&org.manager, done.clone(), Pagination::new(3, 10))
        .await?;
    assert_eq!(last.items.len(), 5);
    assert_eq!(last.pagination.total_items, 25);

    let beyond = service
        .list(&org.manager, done, Pagination::new(4, 10))
        .await?;
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.pagination.total_items, 25);

    let mut seen = first
        .items
        .iter()
        .chain(&last.items)
        .map(|item| item.id())
        .collect::<Vec<_>>();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 15);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_listing_respects_caller_scope(
    #[future] pg_organisation: Result<Option<PgOrganisation>, BoxError>,
) -> Result<(), BoxError> {
    let Some(org) = pg_organisation.await? else {
        return Ok(());
    };
    org.seed_team_items(2, 1).await?;
    let company_item = CreateWorkItemRequest::new(
        org.customer_project,
        OrgRef::Company(org.company_x),
        "Review invoice",
    )
    .with_assignee(org.staff.person());
    org.service().create(&org.head, company_item).await?;
    let service = org.service();

    let lead_view = service
        .list(&org.lead, WorkItemFilter::new(), Pagination::first())
        .await?;
    assert_eq!(lead_view.pagination.total_items, 3);
    assert!(
        lead_view
            .items
            .iter()
            .all(|item| item.org() == OrgRef::Team(org.team_a))
    );

    let head_view = service
        .list(&org.head, WorkItemFilter::new(), Pagination::first())
        .await?;
    assert_eq!(head_view.pagination.total_items, 1);
    assert_eq!(head_view.items.len(), 1);

    let outsider_view = service
        .list(&org.emp55, WorkItemFilter::new(), Pagination::first())
        .await?;
    assert_eq!(outsider_view.pagination.total_items, 0);
    assert_eq!(outsider_view.pagination.total_pages, 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_statistics_agree_with_listing(
    #[future] pg_organisation: Result<Option<PgOrganisation>, BoxError>,
) -> Result<(), BoxError> {
    let Some(org) = pg_organisation.await? else {
        return Ok(());
    };
    org.seed_team_items(4, 3).await?;

    let stats = org
        .aggregator()
        .statistics(&org.manager, Some(org.project))
        .await?;
    let listing = org
        .service()
        .list(
            &org.manager,
            WorkItemFilter::new().with_project(org.project),
            Pagination::first(),
        )
        .await?;

    assert_eq!(stats.total, listing.pagination.total_items);
    assert_eq!(stats.total, 7);
    assert_eq!(stats.done, 4);
    assert_eq!(stats.to_do, 3);
    Ok(())
}
