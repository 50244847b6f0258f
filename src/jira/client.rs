use std::time::Duration;

use super::model::SearchResponse;
use crate::config::Config;
use crate::error::{AnalyticsError, Result};
use crate::types::Issue;

/// Fields requested for every issue.
pub const SEARCH_FIELDS: &str =
    "key,created,resolutiondate,status,reporter,assignee,priority,timespent,summary";

/// JQL selecting the resolved issues of a project.
pub fn resolved_issues_jql(project_key: &str) -> String {
    format!("project={project_key} AND status in (Closed, Resolved)")
}

/// Tracks `startAt` paging until the requested number of issues is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    start_at: u64,
    collected: u64,
    limit: u64,
    exhausted: bool,
}

impl PageCursor {
    pub fn new(limit: u64) -> Self {
        Self {
            start_at: 0,
            collected: 0,
            limit,
            exhausted: limit == 0,
        }
    }

    /// `(startAt, maxResults)` for the next request, or `None` when done.
    pub fn next_request(&self, page_size: u64) -> Option<(u64, u64)> {
        if self.exhausted {
            return None;
        }
        let remaining = self.limit - self.collected;
        Some((self.start_at, page_size.min(remaining)))
    }

    /// Record a received page of `received` issues out of `total` on the server.
    pub fn advance(&mut self, received: u64, total: u64) {
        self.start_at += received;
        self.collected = (self.collected + received).min(self.limit);
        self.exhausted = received == 0 || self.collected >= self.limit || self.start_at >= total;
    }

    pub fn collected(&self) -> u64 {
        self.collected
    }
}

/// Minimal client for the Jira REST v2 search endpoint.
pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
}

impl JiraClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.jira_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn search_url(&self) -> String {
        format!("{}/rest/api/2/search", self.base_url)
    }

    async fn fetch_page(
        &self,
        project_key: &str,
        start_at: u64,
        max_results: u64,
    ) -> Result<SearchResponse> {
        let response = self
            .http
            .get(self.search_url())
            .query(&[
                ("jql", resolved_issues_jql(project_key)),
                ("startAt", start_at.to_string()),
                ("maxResults", max_results.to_string()),
                ("fields", SEARCH_FIELDS.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AnalyticsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| AnalyticsError::Json {
            context: format!("search response from {}", self.base_url),
            source,
        })
    }

    /// Fetch up to `max_results` resolved issues of `project_key`.
    pub async fn fetch_resolved_issues(
        &self,
        project_key: &str,
        max_results: u64,
        page_size: u64,
    ) -> Result<Vec<Issue>> {
        tracing::info!(project = project_key, "requesting issues from {}", self.base_url);

        let mut cursor = PageCursor::new(max_results);
        let mut issues = Vec::new();

        while let Some((start_at, size)) = cursor.next_request(page_size) {
            let page = self.fetch_page(project_key, start_at, size).await?;
            let received = page.issues.len() as u64;
            cursor.advance(received, page.total);
            issues.extend(page.issues.into_iter().map(Issue::from));
            tracing::info!("fetched {} of {} issues", issues.len(), page.total);
        }

        // Servers may return more than asked for on the last page.
        issues.truncate(max_results as usize);
        Ok(issues)
    }
}
