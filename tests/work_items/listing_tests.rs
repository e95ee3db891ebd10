//! Scoped listing, filtering, and pagination.

use std::cmp::Reverse;

use super::helpers::{Organisation, organisation};
use chrono::NaiveDate;
use rstest::rstest;
use worktrack::tracking::{
    domain::{OrgKind, OrgRef, Pagination, Priority, QueryIntent, Status, WorkItemFilter},
    services::CreateWorkItemRequest,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).expect("valid date")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn done_items_paginate_over_three_pages(organisation: Organisation) {
    let service = organisation.service();
    for index in 0..30 {
        let item = organisation
            .team_item(&organisation.lead, &organisation.emp7, &format!("Item {index}"))
            .await;
        if index < 25 {
            service
                .set_status(&organisation.emp7, item.id(), "Done")
                .await
                .expect("assignee may finish");
        }
    }

    let filter = WorkItemFilter::new().with_status(Status::Done);
    let first = service
        .list(&organisation.emp7, filter.clone(), Pagination::new(1, 10))
        .await
        .expect("listing succeeds");
    assert_eq!(first.pagination.total_items, 25);
    assert_eq!(first.pagination.total_pages, 3);
    assert_eq!(first.items.len(), 10);

    let last = service
        .list(&organisation.emp7, filter.clone(), Pagination::new(3, 10))
        .await
        .expect("listing succeeds");
    assert_eq!(last.items.len(), 5);

    let beyond = service
        .list(&organisation.emp7, filter, Pagination::new(4, 10))
        .await
        .expect("listing succeeds");
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.pagination.total_items, 25);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_never_leaves_caller_scope(organisation: Organisation) {
    organisation
        .team_item(&organisation.manager, &organisation.emp7, "Mine")
        .await;
    organisation
        .team_item(&organisation.manager, &organisation.emp8, "Theirs")
        .await;
    organisation
        .company_item(&organisation.head, &organisation.staff, "Customer")
        .await;
    let service = organisation.service();

    let own = service
        .list(&organisation.emp7, WorkItemFilter::new(), Pagination::first())
        .await
        .expect("listing succeeds");
    assert_eq!(own.pagination.total_items, 1);
    assert!(
        own.items
            .iter()
            .all(|item| item.assignee() == Some(organisation.emp7.person()))
    );

    let team = service
        .list(&organisation.lead, WorkItemFilter::new(), Pagination::first())
        .await
        .expect("listing succeeds");
    assert_eq!(team.pagination.total_items, 2);

    let everything = service
        .list(&organisation.admin, WorkItemFilter::new(), Pagination::first())
        .await
        .expect("listing succeeds");
    assert_eq!(everything.pagination.total_items, 3);

    let company = service
        .list(&organisation.head, WorkItemFilter::new(), Pagination::first())
        .await
        .expect("listing succeeds");
    assert_eq!(company.pagination.total_items, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn filters_combine_conjunctively(organisation: Organisation) {
    let service = organisation.service();
    for (title, priority, due) in [
        ("Early high", "High", Some(date(2))),
        ("Late high", "High", Some(date(20))),
        ("Early low", "Low", Some(date(3))),
        ("Undated high", "High", None),
    ] {
        let mut request = CreateWorkItemRequest::new(
            organisation.project,
            OrgRef::Team(organisation.team_a),
            title,
        )
        .with_priority(priority);
        if let Some(day) = due {
            request = request.with_due_date(day);
        }
        service
            .create(&organisation.manager, request)
            .await
            .expect("manager may create");
    }

    let filter = WorkItemFilter::new()
        .with_priority(Priority::High)
        .with_org_kind(OrgKind::Team)
        .with_due_between(Some(date(1)), Some(date(10)));
    let listing = service
        .list(&organisation.manager, filter, Pagination::first())
        .await
        .expect("listing succeeds");

    let titles: Vec<&str> = listing.items.iter().map(|item| item.title()).collect();
    assert_eq!(titles, vec!["Early high"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_orders_newest_first_with_stable_ties(organisation: Organisation) {
    for index in 0..6 {
        organisation
            .team_item(&organisation.manager, &organisation.emp7, &format!("Item {index}"))
            .await;
    }

    let listing = organisation
        .service()
        .list(&organisation.manager, WorkItemFilter::new(), Pagination::first())
        .await
        .expect("listing succeeds");

    let keys: Vec<_> = listing
        .items
        .iter()
        .map(|item| (Reverse(item.created_at()), item.id()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigned_by_me_view_lists_delegated_work(organisation: Organisation) {
    organisation
        .team_item(&organisation.lead, &organisation.emp7, "Delegated")
        .await;
    organisation
        .team_item(&organisation.manager, &organisation.emp8, "Not mine")
        .await;

    let listing = organisation
        .service()
        .list_for(
            &organisation.lead,
            QueryIntent::AssignedByMe,
            WorkItemFilter::new(),
            Pagination::first(),
        )
        .await
        .expect("listing succeeds");

    assert_eq!(listing.items.len(), 1);
    assert!(
        listing
            .items
            .iter()
            .all(|item| item.assigner() == organisation.lead.person())
    );
}
