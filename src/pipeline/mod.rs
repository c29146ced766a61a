//! Pipeline entry points for harvester operations.
//!
//! - `run_harvest`: Crawl all requested projects and write corpus files

pub mod crawl;

pub use crawl::{HarvestOptions, run_harvest};
