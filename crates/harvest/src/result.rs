// ABOUTME: ExtractionResult struct assembled once per pipeline run and handed to a Persister.
// ABOUTME: Serializes to the page_title / video_count / records|sample_titles / timestamp schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extractors::record::VideoRecord;

/// Records at the granularity chosen for the run.
///
/// Flattened into [`ExtractionResult`], so the JSON key is either `records`
/// or `sample_titles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSet {
    Records(Vec<VideoRecord>),
    SampleTitles(Vec<String>),
}

impl RecordSet {
    pub fn len(&self) -> usize {
        match self {
            RecordSet::Records(r) => r.len(),
            RecordSet::SampleTitles(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Titles in record order.
    pub fn titles(&self) -> Vec<&str> {
        match self {
            RecordSet::Records(r) => r.iter().map(|v| v.title.as_str()).collect(),
            RecordSet::SampleTitles(t) => t.iter().map(String::as_str).collect(),
        }
    }
}

impl Default for RecordSet {
    fn default() -> Self {
        RecordSet::Records(Vec::new())
    }
}

/// The outcome of one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub url: String,
    pub page_title: String,
    pub selector_used: Option<String>,
    /// Entries in `records`; in titles mode, titles actually read from the page.
    #[serde(rename = "video_count")]
    pub record_count: usize,
    /// Containers matched by the chosen selector before the record limit applied.
    pub containers_found: usize,
    #[serde(flatten)]
    pub records: RecordSet,
    #[serde(rename = "timestamp")]
    pub captured_at: DateTime<Utc>,
}

impl ExtractionResult {
    /// Returns true if no candidate selector produced records.
    pub fn is_exhausted(&self) -> bool {
        self.selector_used.is_none()
    }

    /// Format the result as the numbered console listing.
    pub fn format_summary(&self) -> String {
        let mut lines = vec![
            format!("Page title: {}", self.page_title),
            format!(
                "Selector: {}",
                self.selector_used.as_deref().unwrap_or("(none matched)")
            ),
            format!("Found {} videos", self.record_count),
        ];

        match &self.records {
            RecordSet::Records(records) => {
                for (i, r) in records.iter().enumerate() {
                    lines.push(String::new());
                    lines.push(format!("{}. {}", i + 1, r.title));
                    lines.push(format!("   Channel: {}", r.channel));
                    lines.push(format!("   Views: {}", r.views));
                    lines.push(format!("   Published: {}", r.publish_time));
                    lines.push(format!("   URL: {}", r.url));
                }
            }
            RecordSet::SampleTitles(titles) => {
                lines.push("Sample video titles:".to_string());
                for (i, t) in titles.iter().enumerate() {
                    lines.push(format!("  {}. {}", i + 1, t));
                }
            }
        }

        lines.join("\n")
    }
}
