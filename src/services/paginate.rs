// src/services/paginate.rs

//! Resumable pagination engine.
//!
//! Drives the page fetch loop for one project, normalizing raw items
//! into records, appending them to a sink, and persisting the
//! checkpoint after every page. A fresh run resumes from the last
//! persisted offset and never re-emits already-consumed records,
//! assuming the upstream ascending-creation ordering is stable.

use crate::error::Result;
use crate::models::IssueRecord;
use crate::services::transport::{SearchQuery, SearchTransport};
use crate::storage::{CheckpointStore, RecordSink};

/// Hard ceiling on the declared result total, protecting against
/// runaway crawls regardless of what the server reports.
pub const TOTAL_CAP: u64 = 10_000;

/// Pagination engine for issue crawls.
pub struct IssueCrawler {
    transport: SearchTransport,
    checkpoint: CheckpointStore,
    page_size: u32,
}

impl IssueCrawler {
    /// Create an engine over the given transport and checkpoint state.
    pub fn new(transport: SearchTransport, checkpoint: CheckpointStore, page_size: u32) -> Self {
        Self {
            transport,
            checkpoint,
            page_size,
        }
    }

    /// The checkpoint state backing this engine.
    pub fn checkpoint(&self) -> &CheckpointStore {
        &self.checkpoint
    }

    /// Crawl one project from its checkpointed offset to exhaustion,
    /// appending normalized records to the sink.
    ///
    /// Returns the number of records written in this run. A terminal
    /// fetch failure stops this project only; already-written records
    /// and the persisted checkpoint remain valid. Sink and checkpoint
    /// write failures propagate.
    pub async fn crawl_project(
        &mut self,
        project: &str,
        sink: &mut dyn RecordSink,
    ) -> Result<u64> {
        let mut offset = self.checkpoint.offset(project);
        let mut capped_total: Option<u64> = None;
        let mut written = 0u64;

        log::info!("Crawling {} from offset {}", project, offset);

        loop {
            if let Some(total) = capped_total {
                if offset >= total {
                    break;
                }
            }

            let query = SearchQuery::for_project(project, offset, self.page_size);
            let page = match self.transport.fetch(&query).await {
                Ok(page) => page,
                Err(e) => {
                    log::error!("Aborting crawl of {} at offset {}: {}", project, offset, e);
                    break;
                }
            };

            let total = page.total.min(TOTAL_CAP);
            capped_total = Some(total);

            if page.issues.is_empty() {
                if offset < total {
                    log::warn!(
                        "Empty page for {} at offset {} though {} issues are reported; treating as exhausted",
                        project,
                        offset,
                        page.total
                    );
                }
                break;
            }

            for raw in &page.issues {
                let record = IssueRecord::from_raw(raw, project);
                sink.append(&record).await?;
                written += 1;
            }

            // Advance by items actually returned, not by the requested
            // page size or the declared total.
            offset += page.issues.len() as u64;
            self.checkpoint.advance(project, offset);
            self.checkpoint.save().await?;

            log::debug!("{}: {}/{} issues consumed", project, offset, total);
        }

        Ok(written)
    }
}
