//! Runtime configuration
//!
//! Every value is read from the environment once at startup and carried in an
//! explicit struct; there is no ambient global. A missing required variable is
//! a fatal [`Error::Config`] raised before any side effect.

use crate::error::{Error, Result};
use std::fmt;

/// Default Weeek public API base URL
pub const WEEEK_BASE_URL: &str = "https://api.weeek.net/public/v1";

/// Default GitHub API base URL
pub const GITHUB_BASE_URL: &str = "https://api.github.com";

/// Custom field on Weeek tasks holding the linked pull request URL
const DEFAULT_GITHUB_FIELD_ID: &str = "9f915b6a-01e4-4351-b8e7-a3550e4f4335";

/// Board column a released task is moved to
const DEFAULT_DONE_COLUMN_ID: u64 = 3;

/// Project the release roll-up task is created in
const DEFAULT_PROJECT_ID: u64 = 1;

/// Board column the release roll-up task is created in
const DEFAULT_RELEASE_COLUMN_ID: u64 = 20;

/// Weeek API configuration plus the board/field identifiers the sync targets
#[derive(Clone)]
pub struct WeeekConfig {
    /// Bearer credential
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Custom field id receiving the pull request URL
    pub github_field_id: String,
    /// Column released tasks are moved to
    pub done_column_id: u64,
    /// Project for the release roll-up task
    pub project_id: u64,
    /// Column for the release roll-up task
    pub release_column_id: u64,
}

impl fmt::Debug for WeeekConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeeekConfig")
            .field("api_key", &mask_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("github_field_id", &self.github_field_id)
            .field("done_column_id", &self.done_column_id)
            .field("project_id", &self.project_id)
            .field("release_column_id", &self.release_column_id)
            .finish()
    }
}

impl WeeekConfig {
    /// Create a configuration with an API key and default board identifiers
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: WEEEK_BASE_URL.to_string(),
            github_field_id: DEFAULT_GITHUB_FIELD_ID.to_string(),
            done_column_id: DEFAULT_DONE_COLUMN_ID,
            project_id: DEFAULT_PROJECT_ID,
            release_column_id: DEFAULT_RELEASE_COLUMN_ID,
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = require_env("WEEEK_API_KEY")?;

        Ok(Self {
            api_key,
            base_url: std::env::var("WEEEK_BASE_URL")
                .unwrap_or_else(|_| WEEEK_BASE_URL.to_string()),
            github_field_id: std::env::var("WEEEK_GITHUB_FIELD_ID")
                .unwrap_or_else(|_| DEFAULT_GITHUB_FIELD_ID.to_string()),
            done_column_id: env_u64("WEEEK_DONE_COLUMN_ID", DEFAULT_DONE_COLUMN_ID)?,
            project_id: env_u64("WEEEK_PROJECT_ID", DEFAULT_PROJECT_ID)?,
            release_column_id: env_u64("WEEEK_RELEASE_COLUMN_ID", DEFAULT_RELEASE_COLUMN_ID)?,
        })
    }
}

/// GitHub API configuration
#[derive(Clone)]
pub struct GithubConfig {
    /// Bearer credential
    pub token: String,
    /// Repository in `owner/name` form
    pub repository: String,
    /// API base URL
    pub base_url: String,
}

impl fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubConfig")
            .field("token", &mask_key(&self.token))
            .field("repository", &self.repository)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GithubConfig {
    /// Create a configuration with a token and repository
    #[must_use]
    pub fn new(token: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            repository: repository.into(),
            base_url: GITHUB_BASE_URL.to_string(),
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            token: require_env("GITHUB_TOKEN")?,
            repository: require_env("GITHUB_REPOSITORY")?,
            base_url: std::env::var("GITHUB_BASE_URL")
                .unwrap_or_else(|_| GITHUB_BASE_URL.to_string()),
        })
    }
}

/// Trigger payload for a branch-driven PR annotation run
#[derive(Debug, Clone)]
pub struct AnnotateContext {
    /// Head branch of the pull request
    pub branch_name: String,
    /// Pull request number
    pub pr_number: u64,
    /// Pull request URL, written into the task's custom field
    pub pr_url: String,
}

impl AnnotateContext {
    /// Create the context from environment variables
    pub fn from_env() -> Result<Self> {
        let pr_number = require_env("GITHUB_PR_NUMBER")?;
        Ok(Self {
            branch_name: require_env("GITHUB_BRANCH_NAME")?,
            pr_number: pr_number
                .parse()
                .map_err(|_| Error::Config("GITHUB_PR_NUMBER must be a number".to_string()))?,
            pr_url: require_env("GITHUB_PR_URL")?,
        })
    }
}

/// Trigger payload for a release roll-up run
#[derive(Debug, Clone)]
pub struct ReleaseContext {
    /// Merged pull request title, used as the release tag and roll-up title
    pub pr_title: String,
    /// Merged pull request body, scanned for task references
    pub pr_body: String,
}

impl ReleaseContext {
    /// Create the context from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            pr_title: require_env("GITHUB_PR_TITLE")?,
            pr_body: require_env("GITHUB_PR_BODY")?,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| {
        Error::Config(format!(
            "{name} is not set. Make sure it's available in the workflow."
        ))
    })
}

fn env_u64(name: &str, default: u64) -> Result<u64> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| Error::Config(format!("{name} must be a number"))),
        Err(_) => Ok(default),
    }
}

/// Mask a credential for safe display in logs
fn mask_key(key: &str) -> String {
    if key.len() <= 8 {
        return "****".to_string();
    }
    format!("{}...{}", &key[..4], &key[key.len() - 4..])
}
