//! Local filesystem storage implementation.
//!
//! Every file is written atomically (temp file, then rename), so a crash
//! mid-export never leaves a truncated table behind.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::{CrawlResult, JobRecords};
use crate::storage::{ResultStorage, WriteSummary};

const RESULTS_FILE: &str = "results.json";
const PERKS_FILE: &str = "perks.csv";
const TOOLS_FILE: &str = "tools.csv";

/// One CSV row: a named record tagged with the job it came from.
#[derive(Debug, Serialize)]
struct Row<'a> {
    job_index: usize,
    site: &'a str,
    job_url: &'a str,
    name: &'a str,
    category: &'a str,
}

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(key);
        tokio::fs::create_dir_all(&self.root_dir).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<PathBuf> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }
}

/// Render one CSV table; `pick` yields the (name, category) pairs of a job.
fn to_csv<'a, F, I>(jobs: &'a [JobRecords], pick: F) -> Result<(Vec<u8>, usize)>
where
    F: Fn(&'a JobRecords) -> I,
    I: Iterator<Item = (&'a str, &'a str)>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut rows = 0;
    for (job_index, job) in jobs.iter().enumerate() {
        for (name, category) in pick(job) {
            writer.serialize(Row {
                job_index,
                site: &job.site,
                job_url: job.url.as_str(),
                name,
                category,
            })?;
            rows += 1;
        }
    }
    // An empty table still gets its header row.
    if rows == 0 {
        writer.write_record(["job_index", "site", "job_url", "name", "category"])?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok((bytes, rows))
}

#[async_trait]
impl ResultStorage for LocalStorage {
    async fn write_results(&self, result: &CrawlResult) -> Result<WriteSummary> {
        let (perks_csv, perk_rows) = to_csv(&result.jobs, |job| {
            job.perks.iter().map(|p| (p.name.as_str(), p.category.as_str()))
        })?;
        let (tools_csv, tool_rows) = to_csv(&result.jobs, |job| {
            job.tools.iter().map(|t| (t.name.as_str(), t.category.as_str()))
        })?;

        let files = vec![
            self.write_json(RESULTS_FILE, result).await?,
            self.write_bytes(PERKS_FILE, &perks_csv).await?,
            self.write_bytes(TOOLS_FILE, &tools_csv).await?,
        ];

        log::info!(
            "Exported {} jobs ({} perks, {} tools) to {}",
            result.jobs.len(),
            perk_rows,
            tool_rows,
            self.root_dir.display()
        );

        Ok(WriteSummary {
            files,
            perk_rows,
            tool_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{JobUrl, PerkRecord, SiteOutcome, SiteSummary, ToolRecord};

    fn job(site: &str, href: &str, perks: &[(&str, &str)], tools: &[(&str, &str)]) -> JobRecords {
        JobRecords {
            site: site.to_string(),
            url: JobUrl::from_href("https://jobs.test", href, "/job/").unwrap(),
            perks: perks
                .iter()
                .map(|(name, category)| PerkRecord {
                    name: name.to_string(),
                    category: category.to_string(),
                })
                .collect(),
            tools: tools
                .iter()
                .map(|(name, category)| ToolRecord {
                    name: name.to_string(),
                    category: category.to_string(),
                })
                .collect(),
            issues: Vec::new(),
        }
    }

    fn sample_result() -> CrawlResult {
        CrawlResult {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            sites: vec![SiteSummary {
                site: "boston".to_string(),
                pages_visited: 2,
                jobs_visited: 2,
                jobs_failed: 0,
                extraction_issues: 0,
                outcome: SiteOutcome::Exhausted,
            }],
            jobs: vec![
                job(
                    "boston",
                    "/job/1",
                    &[("Dental", "Health"), ("Remote, flexible", "Office")],
                    &[("Rust", "Languages")],
                ),
                job("boston", "/job/2", &[], &[("Go", "Languages")]),
            ],
        }
    }

    #[tokio::test]
    async fn test_write_results_creates_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("out"));

        let summary = storage.write_results(&sample_result()).await.unwrap();

        assert_eq!(summary.files.len(), 3);
        assert_eq!(summary.perk_rows, 2);
        assert_eq!(summary.tool_rows, 2);

        let perks = std::fs::read_to_string(dir.path().join("out/perks.csv")).unwrap();
        assert_eq!(
            perks,
            "job_index,site,job_url,name,category\n\
             0,boston,https://jobs.test/job/1,Dental,Health\n\
             0,boston,https://jobs.test/job/1,\"Remote, flexible\",Office\n"
        );

        let tools = std::fs::read_to_string(dir.path().join("out/tools.csv")).unwrap();
        assert!(tools.ends_with("1,boston,https://jobs.test/job/2,Go,Languages\n"));

        let json: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("out/results.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(json["jobs"].as_array().unwrap().len(), 2);
        assert_eq!(json["sites"][0]["outcome"]["status"], "exhausted");
        assert!(!dir.path().join("out/results.tmp").exists());
    }

    #[tokio::test]
    async fn test_empty_result_writes_headers() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let mut result = sample_result();
        result.jobs.clear();

        storage.write_results(&result).await.unwrap();

        let perks = std::fs::read_to_string(dir.path().join("perks.csv")).unwrap();
        assert_eq!(perks, "job_index,site,job_url,name,category\n");
    }
}
