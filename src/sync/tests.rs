use crate::config::{AnnotateContext, ReleaseContext, WeeekConfig};
use crate::error::{Error, Result};
use crate::github::{IssueComment, PrApi, PrUpdate, PullRequest};
use crate::sync::{annotate, release, Outcome};
use crate::weeek::{NewTag, NewTask, Tag, Task, TaskApi, TaskUpdate, Workspace};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

const WORKSPACE_ID: u64 = 77;
const TAG_ID: u64 = 99;
const ROLLUP_ID: u64 = 500;

/// In-memory task tracker recording every call it receives.
#[derive(Default)]
struct FakeTaskApi {
    tasks: Mutex<HashMap<String, Task>>,
    calls: Mutex<Vec<String>>,
    updates: Mutex<Vec<(String, TaskUpdate)>>,
    created_tasks: Mutex<Vec<NewTask>>,
    fail_get: Mutex<HashSet<String>>,
    fail_update: Mutex<HashSet<String>>,
    fail_create_tag: Mutex<bool>,
}

impl FakeTaskApi {
    fn with_task(self, id: &str, title: &str, tags: Vec<u64>) -> Self {
        self.tasks.lock().unwrap().insert(
            id.to_string(),
            Task {
                id: id.parse().unwrap(),
                title: title.to_string(),
                tags,
            },
        );
        self
    }

    fn failing_update(self, id: &str) -> Self {
        self.fail_update.lock().unwrap().insert(id.to_string());
        self
    }

    fn failing_get(self, id: &str) -> Self {
        self.fail_get.lock().unwrap().insert(id.to_string());
        self
    }

    fn failing_create_tag(self) -> Self {
        *self.fail_create_tag.lock().unwrap() = true;
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

fn transport_error(url: &str) -> Error {
    Error::Api {
        url: url.to_string(),
        status: 502,
        body: "bad gateway".to_string(),
    }
}

#[async_trait::async_trait]
impl TaskApi for FakeTaskApi {
    async fn get_workspace(&self) -> Result<Workspace> {
        self.record("get_workspace");
        Ok(Workspace { id: WORKSPACE_ID })
    }

    async fn get_task(&self, task_id: &str) -> Result<Task> {
        self.record(format!("get_task:{task_id}"));
        if self.fail_get.lock().unwrap().contains(task_id) {
            return Err(transport_error(&format!("tm/tasks/{task_id}")));
        }
        self.tasks
            .lock()
            .unwrap()
            .get(task_id)
            .cloned()
            .ok_or_else(|| transport_error(&format!("tm/tasks/{task_id}")))
    }

    async fn update_task(&self, task_id: &str, update: TaskUpdate) -> Result<Task> {
        self.record(format!("update_task:{task_id}"));
        if self.fail_update.lock().unwrap().contains(task_id) {
            return Err(transport_error(&format!("tm/tasks/{task_id}")));
        }
        self.updates
            .lock()
            .unwrap()
            .push((task_id.to_string(), update));
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks.get(task_id).cloned().unwrap_or(Task {
            id: task_id.parse().unwrap_or(0),
            title: String::new(),
            tags: Vec::new(),
        }))
    }

    async fn create_task(&self, task: NewTask) -> Result<Task> {
        self.record("create_task");
        let created = Task {
            id: ROLLUP_ID,
            title: task.title.clone(),
            tags: Vec::new(),
        };
        self.created_tasks.lock().unwrap().push(task);
        Ok(created)
    }

    async fn create_tag(&self, tag: NewTag) -> Result<Tag> {
        self.record("create_tag");
        if *self.fail_create_tag.lock().unwrap() {
            return Err(transport_error("ws/tags"));
        }
        Ok(Tag {
            id: TAG_ID,
            title: tag.title,
        })
    }

    async fn move_task_to_column(&self, task_id: &str, column_id: u64) -> Result<()> {
        self.record(format!("move_task:{task_id}:{column_id}"));
        Ok(())
    }
}

/// Code-hosting side recording title rewrites and comments.
#[derive(Default)]
struct FakePrApi {
    titles: Mutex<Vec<(u64, String)>>,
    comments: Mutex<Vec<(u64, String)>>,
    fail_update_pr: Mutex<bool>,
    fail_comment: Mutex<bool>,
}

impl FakePrApi {
    fn failing_update_pr(self) -> Self {
        *self.fail_update_pr.lock().unwrap() = true;
        self
    }

    fn failing_comment(self) -> Self {
        *self.fail_comment.lock().unwrap() = true;
        self
    }
}

#[async_trait::async_trait]
impl PrApi for FakePrApi {
    async fn update_pr(&self, pr_number: u64, update: PrUpdate) -> Result<PullRequest> {
        if *self.fail_update_pr.lock().unwrap() {
            return Err(transport_error(&format!("pulls/{pr_number}")));
        }
        let title = update.title.unwrap_or_default();
        self.titles.lock().unwrap().push((pr_number, title.clone()));
        Ok(PullRequest {
            number: pr_number,
            title: Some(title),
            html_url: None,
        })
    }

    async fn create_issue_comment(&self, pr_number: u64, body: &str) -> Result<IssueComment> {
        if *self.fail_comment.lock().unwrap() {
            return Err(transport_error(&format!("issues/{pr_number}/comments")));
        }
        self.comments
            .lock()
            .unwrap()
            .push((pr_number, body.to_string()));
        Ok(IssueComment {
            id: 1,
            html_url: None,
        })
    }
}

fn annotate_ctx(branch: &str) -> AnnotateContext {
    AnnotateContext {
        branch_name: branch.to_string(),
        pr_number: 41,
        pr_url: "https://github.com/octo/repo/pull/41".to_string(),
    }
}

fn release_ctx(title: &str, body: &str) -> ReleaseContext {
    ReleaseContext {
        pr_title: title.to_string(),
        pr_body: body.to_string(),
    }
}

fn config() -> WeeekConfig {
    WeeekConfig::new("wk-test-key-12345")
}

#[tokio::test]
async fn annotate_without_reference_makes_no_calls() {
    let tasks = FakeTaskApi::default();
    let prs = FakePrApi::default();

    let report = annotate::run(&config(), &annotate_ctx("main"), &tasks, &prs)
        .await
        .unwrap();

    assert!(tasks.calls().is_empty());
    assert!(prs.titles.lock().unwrap().is_empty());
    assert!(prs.comments.lock().unwrap().is_empty());
    assert!(!report.has_failures());
    assert_eq!(report.outcomes, vec![Outcome::Skipped]);
}

#[tokio::test]
async fn annotate_rewrites_title_and_posts_deep_link() {
    let tasks = FakeTaskApi::default().with_task("12", "Fix login", vec![]);
    let prs = FakePrApi::default();

    let report = annotate::run(&config(), &annotate_ctx("weeek-12-fix-login"), &tasks, &prs)
        .await
        .unwrap();

    assert!(!report.has_failures());

    let titles = prs.titles.lock().unwrap();
    assert_eq!(titles.len(), 1);
    assert_eq!(titles[0], (41, "[WEEEK-12] Fix login".to_string()));

    let comments = prs.comments.lock().unwrap();
    assert_eq!(comments.len(), 1);
    assert!(comments[0].1.contains("https://app.weeek.net/ws/77/task/12"));

    // Custom field update carries the PR URL under the configured field id
    let updates = tasks.updates.lock().unwrap();
    let fields = updates[0].1.custom_fields.as_ref().unwrap();
    assert_eq!(
        fields.values().next().unwrap(),
        "https://github.com/octo/repo/pull/41"
    );
}

#[tokio::test]
async fn annotate_field_failure_still_runs_remaining_steps() {
    let tasks = FakeTaskApi::default()
        .with_task("12", "Fix login", vec![])
        .failing_update("12");
    let prs = FakePrApi::default();

    let report = annotate::run(&config(), &annotate_ctx("WEEEK-12"), &tasks, &prs)
        .await
        .unwrap();

    // Later steps still executed
    assert_eq!(prs.titles.lock().unwrap().len(), 1);
    assert_eq!(prs.comments.lock().unwrap().len(), 1);

    // ...but the run must still signal failure
    assert!(report.has_failures());
    assert_eq!(report.failed_targets(), vec!["update task custom field"]);
}

#[tokio::test]
async fn annotate_title_failure_does_not_block_comment() {
    let tasks = FakeTaskApi::default().with_task("8", "Add search", vec![]);
    let prs = FakePrApi::default().failing_update_pr();

    let report = annotate::run(&config(), &annotate_ctx("feature/week-8"), &tasks, &prs)
        .await
        .unwrap();

    assert_eq!(prs.comments.lock().unwrap().len(), 1);
    assert!(report.has_failures());
    assert_eq!(report.failed_targets(), vec!["update pr title"]);
}

#[tokio::test]
async fn annotate_comment_failure_is_recorded() {
    let tasks = FakeTaskApi::default().with_task("8", "Add search", vec![]);
    let prs = FakePrApi::default().failing_comment();

    let report = annotate::run(&config(), &annotate_ctx("weeek-8"), &tasks, &prs)
        .await
        .unwrap();

    assert_eq!(prs.titles.lock().unwrap().len(), 1);
    assert!(report.has_failures());
    assert_eq!(report.failed_targets(), vec!["create pr comment"]);
}

#[tokio::test]
async fn annotate_task_fetch_failure_is_fatal() {
    let tasks = FakeTaskApi::default().failing_get("12");
    let prs = FakePrApi::default();

    let result = annotate::run(&config(), &annotate_ctx("weeek-12"), &tasks, &prs).await;

    assert!(result.is_err());
    assert!(prs.titles.lock().unwrap().is_empty());
}

#[tokio::test]
async fn release_with_empty_body_makes_no_calls() {
    let tasks = FakeTaskApi::default();

    let report = release::run(&config(), &release_ctx("v1.2.0", "chore: bump deps"), &tasks)
        .await
        .unwrap();

    assert!(tasks.calls().is_empty());
    assert!(!report.has_failures());
}

#[tokio::test]
async fn release_deduplicates_references() {
    let tasks = FakeTaskApi::default()
        .with_task("1", "fix", vec![])
        .with_task("2", "also fix", vec![]);
    let ctx = release_ctx("v1.2.0", "[WEEEK-1] fix\n[WEEEK-2] also fix\n[WEEEK-1] dup");

    let report = release::run(&config(), &ctx, &tasks).await.unwrap();

    let calls = tasks.calls();
    for id in ["1", "2"] {
        let gets = calls.iter().filter(|c| *c == &format!("get_task:{id}")).count();
        let moves = calls.iter().filter(|c| c.starts_with(&format!("move_task:{id}:"))).count();
        assert_eq!(gets, 1, "task {id} fetched once");
        assert_eq!(moves, 1, "task {id} moved once");
    }
    assert!(!report.has_failures());
}

#[tokio::test]
async fn release_appends_tag_to_existing_set() {
    let tasks = FakeTaskApi::default().with_task("1", "fix", vec![5]);
    let ctx = release_ctx("v1.2.0", "[WEEEK-1] fix");

    release::run(&config(), &ctx, &tasks).await.unwrap();

    let updates = tasks.updates.lock().unwrap();
    let (task_id, update) = &updates[0];
    assert_eq!(task_id, "1");
    assert_eq!(update.tags, Some(vec![5, TAG_ID]));
}

#[tokio::test]
async fn release_moves_tasks_to_done_column() {
    let tasks = FakeTaskApi::default().with_task("1", "fix", vec![]);
    let ctx = release_ctx("v1.2.0", "[WEEEK-1] fix");

    release::run(&config(), &ctx, &tasks).await.unwrap();

    assert!(tasks.calls().contains(&"move_task:1:3".to_string()));
}

#[tokio::test]
async fn release_isolates_per_task_failure() {
    let tasks = FakeTaskApi::default()
        .with_task("1", "fix", vec![])
        .with_task("2", "also fix", vec![])
        .failing_update("2");
    let ctx = release_ctx("v1.2.0", "[WEEEK-1] fix\n[WEEEK-2] also fix");

    let report = release::run(&config(), &ctx, &tasks).await.unwrap();

    // Task 2's failure neither cancelled task 1 nor the roll-up
    assert_eq!(report.failed_targets(), vec!["2"]);
    assert!(report
        .outcomes
        .contains(&Outcome::Updated { target: "1".to_string() }));

    let created = tasks.created_tasks.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert!(created[0].description.contains("[WEEEK-1]"));
    assert!(!created[0].description.contains("[WEEEK-2]"));
}

#[tokio::test]
async fn release_tag_failure_aborts_before_task_loop() {
    let tasks = FakeTaskApi::default()
        .with_task("1", "fix", vec![])
        .failing_create_tag();
    let ctx = release_ctx("v1.2.0", "[WEEEK-1] fix");

    let result = release::run(&config(), &ctx, &tasks).await;

    assert!(result.is_err());
    let calls = tasks.calls();
    assert!(!calls.iter().any(|c| c.starts_with("get_task:")));
    assert!(!calls.iter().any(|c| c.starts_with("update_task:")));
    assert!(tasks.created_tasks.lock().unwrap().is_empty());
}

#[tokio::test]
async fn release_creates_tagged_rollup_in_release_column() {
    let tasks = FakeTaskApi::default().with_task("1", "fix", vec![]);
    let ctx = release_ctx("v1.2.0", "[WEEEK-1] fix");

    release::run(&config(), &ctx, &tasks).await.unwrap();

    let created = tasks.created_tasks.lock().unwrap();
    assert_eq!(created[0].title, "v1.2.0");
    assert_eq!(created[0].kind, "action");
    assert_eq!(created[0].locations[0].project_id, 1);
    assert_eq!(created[0].locations[0].board_column_id, 20);

    // The roll-up itself is tagged with the release tag
    let updates = tasks.updates.lock().unwrap();
    let rollup_update = updates
        .iter()
        .find(|(id, _)| id == &ROLLUP_ID.to_string())
        .unwrap();
    assert_eq!(rollup_update.1.tags, Some(vec![TAG_ID]));
}
