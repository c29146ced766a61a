//! Normalized issue record structures.

use serde::{Deserialize, Serialize};

use crate::models::wire::{RawComment, RawIssue};
use crate::utils::text::sanitize;

/// A normalized issue ready for corpus output.
///
/// Built from one raw API item, serialized to a single JSON line, and
/// then discarded. Markup fields are sanitized to plain text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueRecord {
    /// Unique issue identifier
    pub key: String,

    /// Project the issue belongs to
    pub project: String,

    /// Sanitized issue title
    pub title: String,

    /// Status name
    pub status: Option<String>,

    /// Priority name
    pub priority: Option<String>,

    /// Reporter display name
    pub reporter: Option<String>,

    /// Assignee display name
    pub assignee: Option<String>,

    /// Issue labels (order not significant)
    pub labels: Vec<String>,

    /// Creation timestamp, ISO-8601
    pub created: Option<String>,

    /// Last update timestamp, ISO-8601
    pub updated: Option<String>,

    /// Sanitized plain-text description
    pub description: String,

    /// Comments in server order
    pub comments: Vec<Comment>,
}

/// A normalized comment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub author: Option<String>,
    pub created: Option<String>,
    pub body: String,
}

impl IssueRecord {
    /// Normalize a raw API item into a record for the given project.
    pub fn from_raw(raw: &RawIssue, project: &str) -> Self {
        let fields = &raw.fields;
        Self {
            key: raw.key.clone(),
            project: project.to_string(),
            title: fields.summary.as_deref().map(sanitize).unwrap_or_default(),
            status: fields.status.as_ref().and_then(|s| s.name.clone()),
            priority: fields.priority.as_ref().and_then(|p| p.name.clone()),
            reporter: fields
                .reporter
                .as_ref()
                .and_then(|u| u.display_name.clone()),
            assignee: fields
                .assignee
                .as_ref()
                .and_then(|u| u.display_name.clone()),
            labels: fields.labels.clone(),
            created: fields.created.clone(),
            updated: fields.updated.clone(),
            description: fields
                .description
                .as_deref()
                .map(sanitize)
                .unwrap_or_default(),
            comments: fields
                .comment
                .as_ref()
                .map(|c| c.comments.iter().map(Comment::from_raw).collect())
                .unwrap_or_default(),
        }
    }
}

impl Comment {
    /// Normalize a raw comment, sanitizing its body.
    pub fn from_raw(raw: &RawComment) -> Self {
        Self {
            author: raw.author.as_ref().and_then(|u| u.display_name.clone()),
            created: raw.created.clone(),
            body: raw.body.as_deref().map(sanitize).unwrap_or_default(),
        }
    }
}
