//! Storage for crawl state and corpus output.
//!
//! - `CheckpointStore`: durable per-project pagination offsets
//! - `JsonlSink`: append-only JSONL record files and the combined file

pub mod checkpoint;
pub mod sink;

pub use checkpoint::{CheckpointStore, ProjectCheckpoint};
pub use sink::{JsonlSink, RecordSink, combine_files};
