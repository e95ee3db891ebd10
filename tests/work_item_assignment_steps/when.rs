//! When steps for work-item assignment BDD scenarios.

use super::world::{WorkItemWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use worktrack::tracking::domain::{Pagination, Status, WorkItemFilter};

#[when(r#"the manager creates "{title}" with priority "{priority}" for "{assignee}""#)]
fn manager_creates(
    world: &mut WorkItemWorld,
    title: String,
    priority: String,
    assignee: String,
) -> Result<(), eyre::Report> {
    let manager = world.person("Manager")?;
    let request = world
        .team_request(&title, &world.person(&assignee)?)
        .with_priority(priority);
    let result = run_async(world.service.create(&manager, request));
    world.record(result);
    Ok(())
}

#[when(r#""{actor}" sets the status to "{status}""#)]
fn actor_sets_status(
    world: &mut WorkItemWorld,
    actor: String,
    status: String,
) -> Result<(), eyre::Report> {
    let caller = world.person(&actor)?;
    let id = world.item()?.id();
    let result = run_async(world.service.set_status(&caller, id, &status));
    world.record(result);
    Ok(())
}

#[when(r#""{actor}" transfers the work item to "{assignee}""#)]
fn actor_transfers(
    world: &mut WorkItemWorld,
    actor: String,
    assignee: String,
) -> Result<(), eyre::Report> {
    let caller = world.person(&actor)?;
    let target = world.person(&assignee)?;
    let id = world.item()?.id();
    let result = run_async(world.service.transfer(&caller, id, target.person()));
    world.record(result);
    Ok(())
}

#[when(r#""{actor}" lists "{status}" work items on page {page:u64} with limit {limit:u64}"#)]
fn actor_lists(
    world: &mut WorkItemWorld,
    actor: String,
    status: String,
    page: u64,
    limit: u64,
) -> Result<(), eyre::Report> {
    let caller = world.person(&actor)?;
    let wanted = Status::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let listing = run_async(world.service.list(
        &caller,
        WorkItemFilter::new().with_status(wanted),
        Pagination::new(page, limit),
    ))
    .wrap_err("list work items")?;
    world.last_listing = Some(listing);
    Ok(())
}

#[when(r#""{actor}" opens the dashboard"#)]
fn actor_opens_dashboard(world: &mut WorkItemWorld, actor: String) -> Result<(), eyre::Report> {
    let caller = world.person(&actor)?;
    let dashboard =
        run_async(world.aggregator.dashboard(&caller)).wrap_err("build dashboard")?;
    world.last_dashboard = Some(dashboard);
    Ok(())
}
