// src/models/mod.rs

//! Domain models for the harvester application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod issue;
mod wire;

// Re-export all public types
pub use config::{Config, CrawlerConfig, RetryConfig};
pub use issue::{Comment, IssueRecord};
pub use wire::{CommentContainer, NamedField, RawComment, RawFields, RawIssue, SearchPage, UserField};
