//! GitHub API client
//!
//! Covers the two calls the orchestrator makes against the code-hosting side:
//! rewriting a pull request's metadata and posting an issue comment.

mod types;

pub use types::{IssueComment, PrUpdate, PullRequest};

use crate::config::GithubConfig;
use crate::error::{Error, Result};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// GitHub REST API version header value
pub const API_VERSION: &str = "2022-11-28";

/// Capabilities the orchestrator needs from the code-hosting side
#[async_trait::async_trait]
pub trait PrApi: Send + Sync {
    /// Merge-patch a pull request's metadata
    async fn update_pr(&self, pr_number: u64, update: PrUpdate) -> Result<PullRequest>;

    /// Post a comment on a pull request
    ///
    /// Not idempotent: a duplicated call posts twice.
    async fn create_issue_comment(&self, pr_number: u64, body: &str) -> Result<IssueComment>;
}

/// GitHub API client scoped to one repository
pub struct GithubClient {
    client: Client,
    config: GithubConfig,
}

impl GithubClient {
    /// Create a new client
    pub fn new(config: GithubConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("weeek-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn call<B, T>(&self, method: Method, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!(
            "{}/repos/{}{endpoint}",
            self.config.base_url, self.config.repository
        );

        debug!("github request: {} {}", method, url);

        let response = self
            .client
            .request(method, &url)
            .header("accept", "application/vnd.github+json")
            .header("x-github-api-version", API_VERSION)
            .bearer_auth(&self.config.token)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Api {
                url,
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| Error::InvalidResponse(format!("{url}: {e}")))
    }
}

#[async_trait::async_trait]
impl PrApi for GithubClient {
    async fn update_pr(&self, pr_number: u64, update: PrUpdate) -> Result<PullRequest> {
        self.call(Method::PATCH, &format!("/pulls/{pr_number}"), &update)
            .await
    }

    async fn create_issue_comment(&self, pr_number: u64, body: &str) -> Result<IssueComment> {
        let payload = serde_json::json!({ "body": body });
        self.call(
            Method::POST,
            &format!("/issues/{pr_number}/comments"),
            &payload,
        )
        .await
    }
}
