//! Branch-driven PR annotation
//!
//! Links one pull request to the single task referenced by its branch name:
//! writes the PR URL into the task's custom field, rewrites the PR title to
//! `[WEEEK-<id>] <task title>`, and posts a comment with a deep link.

use crate::config::{AnnotateContext, WeeekConfig};
use crate::error::Result;
use crate::github::{PrApi, PrUpdate};
use crate::refs::first_ref;
use crate::sync::SyncReport;
use crate::weeek::{task_link, TaskApi, TaskUpdate};
use tracing::{error, info};

/// Run one annotation pass.
///
/// The custom-field write, title rewrite, and comment are each best-effort:
/// a failure is logged and recorded without blocking the remaining steps. The
/// task and workspace fetches are load-bearing for the title and link, so
/// their failure ends the run. The caller decides the exit signal from the
/// report; the policy is that any recorded failure makes the run non-zero.
pub async fn run(
    config: &WeeekConfig,
    ctx: &AnnotateContext,
    tasks: &dyn TaskApi,
    prs: &dyn PrApi,
) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    let Some(task_id) = first_ref(&ctx.branch_name) else {
        // Branches without a reference are legitimate
        info!(
            branch = %ctx.branch_name,
            "no task reference in branch name, skipping"
        );
        report.record_skipped();
        return Ok(report);
    };

    let update = TaskUpdate::custom_field(&config.github_field_id, &ctx.pr_url);
    match tasks.update_task(&task_id, update).await {
        Ok(_) => report.record_updated("update task custom field"),
        Err(e) => {
            error!(task_id = %task_id, error = %e, "failed to set pull request field on task");
            report.record_failed("update task custom field", e);
        }
    }

    let task = tasks.get_task(&task_id).await?;
    let workspace = tasks.get_workspace().await?;

    let new_title = format!("[WEEEK-{task_id}] {}", task.title);
    let link = task_link(workspace.id, &task_id);

    match prs.update_pr(ctx.pr_number, PrUpdate::title(&new_title)).await {
        Ok(_) => report.record_updated("update pr title"),
        Err(e) => {
            error!(task_id = %task_id, pr = ctx.pr_number, error = %e, "failed to rewrite pr title");
            report.record_failed("update pr title", e);
        }
    }

    let comment = format!("[{new_title}]({link})");
    match prs.create_issue_comment(ctx.pr_number, &comment).await {
        Ok(_) => report.record_updated("create pr comment"),
        Err(e) => {
            error!(task_id = %task_id, pr = ctx.pr_number, error = %e, "failed to post pr comment");
            report.record_failed("create pr comment", e);
        }
    }

    Ok(report)
}
