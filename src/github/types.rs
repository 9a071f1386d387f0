//! GitHub API wire types

use serde::{Deserialize, Serialize};

/// Merge-patch payload for pull request updates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrUpdate {
    /// New pull request title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PrUpdate {
    /// Update that rewrites the title
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }
}

/// A pull request, as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    /// Pull request number
    pub number: u64,
    /// Current title
    pub title: Option<String>,
    /// Web URL
    pub html_url: Option<String>,
}

/// An issue comment
#[derive(Debug, Clone, Deserialize)]
pub struct IssueComment {
    /// Comment identifier
    pub id: u64,
    /// Web URL
    pub html_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pr_update_serializes_only_populated_fields() {
        let update = PrUpdate::title("[WEEEK-12] fix login");
        let json = serde_json::to_value(&update).unwrap();

        assert_eq!(json["title"], "[WEEEK-12] fix login");
        assert_eq!(json.as_object().unwrap().len(), 1);
    }
}
