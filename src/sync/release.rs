//! Release roll-up
//!
//! Tags every task referenced in the merged PR body with a freshly created
//! release tag, moves each to the done column, and creates one roll-up task
//! describing the release.

use crate::config::{ReleaseContext, WeeekConfig};
use crate::error::Result;
use crate::refs::extract_refs;
use crate::sync::SyncReport;
use crate::weeek::{task_link, NewTag, NewTask, TaskApi, TaskLocation, TaskUpdate};
use tracing::{error, info};

/// Run one release pass.
///
/// Tag creation, the workspace fetch, and the roll-up task creation are
/// critical: their failure ends the run. Each referenced task is processed
/// in isolation and strictly in sequence — a failure is logged with the task
/// id and recorded, and the loop moves on. Recorded per-task failures do not
/// change the exit signal; only the critical steps do.
pub async fn run(
    config: &WeeekConfig,
    ctx: &ReleaseContext,
    tasks: &dyn TaskApi,
) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    let task_ids = extract_refs(&ctx.pr_body);
    if task_ids.is_empty() {
        info!("no task references in pr body, skipping release sync");
        report.record_skipped();
        return Ok(report);
    }

    let tag = tasks
        .create_tag(NewTag {
            title: ctx.pr_title.clone(),
        })
        .await?;
    let workspace = tasks.get_workspace().await?;

    info!(tag_id = tag.id, tasks = task_ids.len(), "tagging released tasks");

    let mut links = Vec::new();
    for task_id in &task_ids {
        match sync_task(config, tasks, task_id, tag.id, workspace.id).await {
            Ok(link) => {
                links.push(link);
                report.record_updated(task_id);
            }
            Err(e) => {
                error!(task_id = %task_id, error = %e, "failed to update released task");
                report.record_failed(task_id, e);
            }
        }
    }

    let rollup = tasks
        .create_task(NewTask {
            locations: vec![TaskLocation {
                project_id: config.project_id,
                board_column_id: config.release_column_id,
            }],
            title: ctx.pr_title.clone(),
            description: links.join("\n"),
            kind: "action".to_string(),
        })
        .await?;
    tasks
        .update_task(&rollup.id.to_string(), TaskUpdate::tags(vec![tag.id]))
        .await?;

    Ok(report)
}

/// Attach the release tag to one task and move it to the done column.
///
/// Returns the HTML link line for the roll-up description. The tag append is
/// a read-modify-write: the server replaces the whole tag set on update, so
/// the current set is fetched first.
async fn sync_task(
    config: &WeeekConfig,
    tasks: &dyn TaskApi,
    task_id: &str,
    tag_id: u64,
    workspace_id: u64,
) -> Result<String> {
    let task = tasks.get_task(task_id).await?;

    let mut tag_ids = task.tags.clone();
    tag_ids.push(tag_id);
    tasks.update_task(task_id, TaskUpdate::tags(tag_ids)).await?;

    tasks
        .move_task_to_column(task_id, config.done_column_id)
        .await?;

    Ok(format!(
        "<a href=\"{}\">[WEEEK-{task_id}]</a> {}",
        task_link(workspace_id, task_id),
        task.title
    ))
}
