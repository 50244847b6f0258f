//! Jira REST v2 search payloads and their conversion into [`Issue`].

use serde::Deserialize;

use crate::error::{AnalyticsError, Result};
use crate::types::{Issue, User};

/// Status used when the tracker omits the status object.
const UNKNOWN_STATUS: &str = "Unknown";

/// One page of `GET /rest/api/2/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default, rename = "startAt")]
    pub start_at: u64,
    #[serde(default, rename = "maxResults")]
    pub max_results: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub issues: Vec<RawIssue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIssue {
    pub key: Option<String>,
    #[serde(default)]
    pub fields: RawFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFields {
    pub created: Option<String>,
    pub resolutiondate: Option<String>,
    pub status: Option<NamedField>,
    pub assignee: Option<RawUser>,
    pub reporter: Option<RawUser>,
    pub priority: Option<NamedField>,
    pub timespent: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedField {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUser {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

impl From<RawUser> for User {
    fn from(raw: RawUser) -> Self {
        User {
            display_name: raw.display_name,
        }
    }
}

impl From<RawIssue> for Issue {
    fn from(raw: RawIssue) -> Self {
        let fields = raw.fields;
        Issue {
            key: raw.key,
            created: fields.created.unwrap_or_default(),
            // An empty resolution string means the issue is still open.
            resolution_date: fields.resolutiondate.filter(|s| !s.trim().is_empty()),
            status_name: fields
                .status
                .and_then(|s| s.name)
                .unwrap_or_else(|| UNKNOWN_STATUS.to_string()),
            assignee: fields.assignee.map(User::from),
            reporter: fields.reporter.map(User::from),
            priority_name: fields.priority.and_then(|p| p.name),
            time_spent_seconds: fields.timespent,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IssueDump {
    List(Vec<RawIssue>),
    Search(SearchResponse),
}

/// Read issues saved to disk, either a whole search response or a bare array.
pub fn parse_issue_dump(text: &str, context: &str) -> Result<Vec<Issue>> {
    let dump: IssueDump = serde_json::from_str(text).map_err(|source| AnalyticsError::Json {
        context: context.to_string(),
        source,
    })?;

    let raw = match dump {
        IssueDump::List(issues) => issues,
        IssueDump::Search(response) => response.issues,
    };
    Ok(raw.into_iter().map(Issue::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NO_PRIORITY_LABEL;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"{
        "startAt": 0,
        "maxResults": 50,
        "total": 2,
        "issues": [
            {
                "key": "KAFKA-1",
                "fields": {
                    "created": "2024-01-01T10:00:00.000+0000",
                    "resolutiondate": "2024-01-05T14:30:00.000+0000",
                    "status": {"name": "Closed"},
                    "assignee": {"displayName": "John Doe"},
                    "reporter": {"displayName": "Jane Smith"},
                    "priority": {"name": "High"},
                    "timespent": 86400
                }
            },
            {
                "key": "KAFKA-2",
                "fields": {
                    "created": "2024-01-02T09:00:00.000+0000",
                    "resolutiondate": null,
                    "status": {"name": "Resolved"},
                    "assignee": null,
                    "reporter": {"accountId": "42"},
                    "priority": {}
                }
            }
        ]
    }"#;

    #[test]
    fn test_search_response_converts_to_issues() {
        let issues = parse_issue_dump(PAGE, "test page").unwrap();
        assert_eq!(issues.len(), 2);

        let first = &issues[0];
        assert_eq!(first.key.as_deref(), Some("KAFKA-1"));
        assert_eq!(first.status_name, "Closed");
        assert_eq!(first.assignee, Some(User::named("John Doe")));
        assert_eq!(first.time_spent_seconds, Some(86_400.0));

        let second = &issues[1];
        assert!(!second.is_resolved());
        assert_eq!(second.assignee, None);
        assert_eq!(second.reporter, Some(User::default()));
        assert_eq!(second.priority_label(), NO_PRIORITY_LABEL);
    }

    #[test]
    fn test_bare_array_dump() {
        let text = r#"[{"fields": {"created": "2024-01-01T00:00:00", "resolutiondate": ""}}]"#;
        let issues = parse_issue_dump(text, "array").unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].resolution_date, None);
        assert_eq!(issues[0].status_name, UNKNOWN_STATUS);
    }

    #[test]
    fn test_invalid_dump_is_a_json_error() {
        let err = parse_issue_dump("not json", "broken.json").unwrap_err();
        assert!(matches!(err, AnalyticsError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
