//! Raw search API payload structures.
//!
//! These mirror the JSON shape of the issue search endpoint. Every field
//! the server may omit is optional or defaulted so a sparse issue still
//! deserializes.

use serde::Deserialize;

/// One page of search results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    /// Raw issues in this page
    #[serde(default)]
    pub issues: Vec<RawIssue>,

    /// Total matching issues declared by the server
    #[serde(default)]
    pub total: u64,

    /// Offset the server answered for
    #[serde(default, rename = "startAt")]
    pub start_at: u64,
}

/// A raw issue as returned by the search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIssue {
    /// Unique issue identifier, e.g. "HADOOP-123"
    #[serde(default)]
    pub key: String,

    /// Nested field payload
    #[serde(default)]
    pub fields: RawFields,
}

/// The `fields` object of a raw issue.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFields {
    pub summary: Option<String>,
    pub status: Option<NamedField>,
    pub priority: Option<NamedField>,
    pub reporter: Option<UserField>,
    pub assignee: Option<UserField>,

    #[serde(default)]
    pub labels: Vec<String>,

    pub created: Option<String>,
    pub updated: Option<String>,
    pub description: Option<String>,
    pub comment: Option<CommentContainer>,
}

/// A nested object carrying only a display name, e.g. status or priority.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedField {
    pub name: Option<String>,
}

/// A nested user object, e.g. reporter or assignee.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserField {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

/// The `comment` container wrapping the actual comment list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentContainer {
    #[serde(default)]
    pub comments: Vec<RawComment>,
}

/// A raw comment attached to an issue.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComment {
    pub author: Option<UserField>,
    pub created: Option<String>,
    pub body: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_page() {
        let json = r#"{
            "startAt": 0,
            "total": 2,
            "issues": [
                {
                    "key": "HADOOP-1",
                    "fields": {
                        "summary": "First issue",
                        "status": {"name": "Open"},
                        "priority": {"name": "Major"},
                        "reporter": {"displayName": "Alice"},
                        "assignee": null,
                        "labels": ["io", "fs"],
                        "created": "2009-05-01T10:00:00.000+0000",
                        "updated": "2009-05-02T10:00:00.000+0000",
                        "description": "Something is broken",
                        "comment": {
                            "comments": [
                                {"author": {"displayName": "Bob"}, "created": "2009-05-01T12:00:00.000+0000", "body": "Me too"}
                            ]
                        }
                    }
                }
            ]
        }"#;

        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.issues.len(), 1);

        let issue = &page.issues[0];
        assert_eq!(issue.key, "HADOOP-1");
        assert_eq!(issue.fields.status.as_ref().unwrap().name.as_deref(), Some("Open"));
        assert!(issue.fields.assignee.is_none());
        assert_eq!(issue.fields.labels, vec!["io", "fs"]);
        assert_eq!(issue.fields.comment.as_ref().unwrap().comments.len(), 1);
    }

    #[test]
    fn tolerates_sparse_issue() {
        let json = r#"{"issues": [{"key": "SPARK-9", "fields": {}}], "total": 1}"#;
        let page: SearchPage = serde_json::from_str(json).unwrap();

        let issue = &page.issues[0];
        assert!(issue.fields.summary.is_none());
        assert!(issue.fields.labels.is_empty());
        assert!(issue.fields.comment.is_none());
    }

    #[test]
    fn tolerates_empty_object() {
        let page: SearchPage = serde_json::from_str("{}").unwrap();
        assert_eq!(page.total, 0);
        assert!(page.issues.is_empty());
    }
}
