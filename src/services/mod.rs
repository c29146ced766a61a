//! Service layer for the harvester application.
//!
//! This module contains the business logic for:
//! - Retrying page fetches (`SearchTransport`)
//! - Resumable pagination (`IssueCrawler`)

mod paginate;
mod transport;

pub use paginate::{IssueCrawler, TOTAL_CAP};
pub use transport::{ISSUE_FIELDS, SearchQuery, SearchTransport};
