// src/pipeline/crawl.rs

//! Issue harvesting pipeline.

use std::path::PathBuf;

use chrono::Local;

use crate::error::Result;
use crate::models::Config;
use crate::services::{IssueCrawler, SearchTransport};
use crate::storage::{CheckpointStore, JsonlSink, combine_files};
use crate::utils::http;

/// Caller-supplied options for one harvest run.
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Project keys, crawled in this order
    pub projects: Vec<String>,

    /// Output path prefix for per-project and combined files
    pub output_prefix: String,

    /// Checkpoint file path
    pub checkpoint_path: PathBuf,
}

/// Run the harvester for all requested projects.
///
/// Each project is crawled in sequence; a project whose crawl aborts
/// early does not fail the run. Afterwards a combined file containing
/// the full contents of every per-project file is always produced.
pub async fn run_harvest(config: &Config, options: &HarvestOptions) -> Result<()> {
    let client = http::create_client(&config.crawler)?;
    let transport = SearchTransport::new(
        client,
        config.crawler.search_url.clone(),
        config.retry.clone(),
    );
    let checkpoint = CheckpointStore::load(&options.checkpoint_path).await?;
    let mut crawler = IssueCrawler::new(transport, checkpoint, config.crawler.page_size);

    let mut total_written = 0u64;
    let mut files = Vec::new();

    for project in &options.projects {
        let path = PathBuf::from(format!("{}_{}.jsonl", options.output_prefix, project));
        let mut sink = JsonlSink::open(&path).await?;

        let written = crawler.crawl_project(project, &mut sink).await?;
        total_written += written;
        log::info!("Completed writing {} issues to {}", written, path.display());

        files.push(path);
    }

    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let combined = format!("{}_combined_{}.jsonl", options.output_prefix, stamp);
    combine_files(&files, &combined).await?;
    log::info!("Completed writing {} issues to {}", total_written, combined);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RetryConfig;
    use tempfile::TempDir;
    use wiremock::matchers::{method, query_param_contains};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.crawler.search_url = server.uri();
        config.crawler.page_size = 50;
        config.retry = RetryConfig {
            max_attempts: 2,
            backoff_base_ms: 1,
            rate_limit_wait_ms: 5,
            server_error_wait_ms: 5,
        };
        config
    }

    fn issues_page(keys: &[&str]) -> serde_json::Value {
        let issues: Vec<_> = keys
            .iter()
            .map(|k| serde_json::json!({ "key": k, "fields": { "summary": k } }))
            .collect();
        serde_json::json!({ "startAt": 0, "total": issues.len(), "issues": issues })
    }

    #[tokio::test]
    async fn harvests_projects_and_writes_combined_file() {
        let server = MockServer::start().await;
        let tmp = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(query_param_contains("jql", "project=HADOOP"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(issues_page(&["HADOOP-1", "HADOOP-2"])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param_contains("jql", "project=SPARK"))
            .respond_with(ResponseTemplate::new(200).set_body_json(issues_page(&["SPARK-1"])))
            .mount(&server)
            .await;

        let prefix = tmp.path().join("corpus").to_string_lossy().into_owned();
        let options = HarvestOptions {
            projects: vec!["HADOOP".to_string(), "SPARK".to_string()],
            output_prefix: prefix.clone(),
            checkpoint_path: tmp.path().join("checkpoint.json"),
        };

        run_harvest(&test_config(&server), &options).await.unwrap();

        let hadoop = std::fs::read_to_string(format!("{prefix}_HADOOP.jsonl")).unwrap();
        let spark = std::fs::read_to_string(format!("{prefix}_SPARK.jsonl")).unwrap();
        assert_eq!(hadoop.lines().count(), 2);
        assert_eq!(spark.lines().count(), 1);

        let combined: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains("_combined_"))
            .collect();
        assert_eq!(combined.len(), 1);

        let combined_content = std::fs::read_to_string(combined[0].path()).unwrap();
        assert_eq!(combined_content, format!("{hadoop}{spark}"));
    }

    #[tokio::test]
    async fn aborted_project_does_not_fail_the_run() {
        let server = MockServer::start().await;
        let tmp = TempDir::new().unwrap();

        // First project is forbidden; second succeeds.
        Mock::given(method("GET"))
            .and(query_param_contains("jql", "project=DENIED"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param_contains("jql", "project=KAFKA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(issues_page(&["KAFKA-1"])))
            .mount(&server)
            .await;

        let prefix = tmp.path().join("corpus").to_string_lossy().into_owned();
        let options = HarvestOptions {
            projects: vec!["DENIED".to_string(), "KAFKA".to_string()],
            output_prefix: prefix.clone(),
            checkpoint_path: tmp.path().join("checkpoint.json"),
        };

        run_harvest(&test_config(&server), &options).await.unwrap();

        let denied = std::fs::read_to_string(format!("{prefix}_DENIED.jsonl")).unwrap();
        let kafka = std::fs::read_to_string(format!("{prefix}_KAFKA.jsonl")).unwrap();
        assert!(denied.is_empty());
        assert_eq!(kafka.lines().count(), 1);

        // The combined file still exists and carries the surviving output.
        let combined: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains("_combined_"))
            .collect();
        assert_eq!(combined.len(), 1);
    }
}
