//! Creation, workflow, and transfer through the public service API.

use super::helpers::{Organisation, organisation};
use worktrack::tracking::{
    domain::{Hours, OrgRef, Status, WorkItemDomainError},
    services::{CreateWorkItemRequest, ErrorKind, TrackingError, UpdateWorkItemRequest},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manager_creates_team_item(organisation: Organisation) {
    let request = CreateWorkItemRequest::new(
        organisation.project,
        OrgRef::Team(organisation.team_a),
        "Fix login bug",
    )
    .with_assignee(organisation.emp7.person())
    .with_priority("High");

    let item = organisation
        .service()
        .create(&organisation.manager, request)
        .await
        .expect("manager may create");

    assert_eq!(item.status(), Status::ToDo);
    assert_eq!(item.assigner(), organisation.manager.person());
    assert_eq!(item.hours_spent(), Hours::ZERO);
    assert_eq!(item.priority().as_str(), "High");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignee_moves_status_while_outsider_is_forbidden(organisation: Organisation) {
    let service = organisation.service();
    let item = organisation
        .team_item(&organisation.manager, &organisation.emp7, "Fix login bug")
        .await;

    let moved = service
        .set_status(&organisation.emp7, item.id(), "In Progress")
        .await
        .expect("assignee may set status");
    assert_eq!(moved.status(), Status::InProgress);

    let denied = service
        .set_status(&organisation.emp55, item.id(), "Done")
        .await
        .expect_err("outsider must be refused");
    assert_eq!(denied.kind(), ErrorKind::Forbidden);

    let current = service
        .get(&organisation.manager, item.id())
        .await
        .expect("manager can read");
    assert_eq!(current.status(), Status::InProgress);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lead_transfers_within_team(organisation: Organisation) {
    let service = organisation.service();
    let item = organisation
        .team_item(&organisation.manager, &organisation.emp7, "Fix login bug")
        .await;

    let moved = service
        .transfer(&organisation.lead, item.id(), organisation.emp8.person())
        .await
        .expect("lead may transfer within team");

    assert_eq!(moved.assignee(), Some(organisation.emp8.person()));
    assert_eq!(moved.assigner(), organisation.manager.person());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transfer_outside_team_leaves_item_unchanged(organisation: Organisation) {
    let service = organisation.service();
    let item = organisation
        .team_item(&organisation.manager, &organisation.emp7, "Fix login bug")
        .await;

    let result = service
        .transfer(&organisation.lead, item.id(), organisation.emp55.person())
        .await;
    assert!(matches!(
        result,
        Err(TrackingError::Validation(WorkItemDomainError::IneligibleAssignee { .. }))
    ));

    let stored = service
        .get(&organisation.manager, item.id())
        .await
        .expect("item still readable");
    assert_eq!(stored, item);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transfer_of_invisible_item_reports_not_found(organisation: Organisation) {
    let item = organisation
        .company_item(&organisation.head, &organisation.staff, "Review invoice")
        .await;

    let result = organisation
        .service()
        .transfer(&organisation.lead, item.id(), organisation.emp8.person())
        .await;

    assert!(matches!(result, Err(TrackingError::NotFound(id)) if id == item.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn customer_head_transfers_between_company_staff(organisation: Organisation) {
    let item = organisation
        .company_item(&organisation.head, &organisation.staff, "Review invoice")
        .await;

    let moved = organisation
        .service()
        .transfer(&organisation.head, item.id(), organisation.head.person())
        .await
        .expect("head may take the item");

    assert_eq!(moved.assignee(), Some(organisation.head.person()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigner_clears_optional_fields(organisation: Organisation) {
    let service = organisation.service();
    let request = CreateWorkItemRequest::new(
        organisation.project,
        OrgRef::Team(organisation.team_a),
        "Write notes",
    )
    .with_description("Draft release notes")
    .with_due_date(chrono::NaiveDate::from_ymd_opt(2026, 12, 1).expect("valid date"));
    let item = service
        .create(&organisation.lead, request)
        .await
        .expect("lead may create for own team");

    let cleared = service
        .update(
            &organisation.lead,
            item.id(),
            UpdateWorkItemRequest::new()
                .clear_description()
                .clear_due_date()
                .with_assignee(organisation.emp8.person()),
        )
        .await
        .expect("assigner may edit");

    assert_eq!(cleared.description(), None);
    assert_eq!(cleared.due_date(), None);
    assert_eq!(cleared.assignee(), Some(organisation.emp8.person()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_status_updates_settle_on_one_value(organisation: Organisation) {
    let item = organisation
        .team_item(&organisation.manager, &organisation.emp7, "Contended")
        .await;

    let mut handles = Vec::new();
    for status in ["In Progress", "Blocked", "Done", "To Do"] {
        let service = organisation.service();
        let actor = organisation.emp7;
        let id = item.id();
        handles.push(tokio::spawn(async move {
            service.set_status(&actor, id, status).await
        }));
    }
    for handle in handles {
        handle
            .await
            .expect("task should not panic")
            .expect("every concurrent update succeeds");
    }

    let settled = organisation
        .service()
        .get(&organisation.emp7, item.id())
        .await
        .expect("assignee can read");
    assert!(Status::ALL.contains(&settled.status()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removed_member_cannot_receive_new_work(organisation: Organisation) {
    organisation
        .store
        .remove_team_member(organisation.team_a, organisation.emp8.person())
        .expect("remove member");
    let request = CreateWorkItemRequest::new(
        organisation.project,
        OrgRef::Team(organisation.team_a),
        "Too late",
    )
    .with_assignee(organisation.emp8.person());

    let result = organisation
        .service()
        .create(&organisation.manager, request)
        .await;

    assert!(matches!(
        result,
        Err(TrackingError::Validation(WorkItemDomainError::IneligibleAssignee { .. }))
    ));
}
