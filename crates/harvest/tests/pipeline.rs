// ABOUTME: Integration tests for the extraction pipeline against saved feed snapshots.
// ABOUTME: Covers full grids, selector fallback, exhausted candidates, sentinel fields and readiness timeouts.

use std::fs;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use digests_harvest::dom::{DocumentHandle, Snapshot};
use digests_harvest::extractors::fields::{UNKNOWN, UNKNOWN_CHANNEL, UNKNOWN_URL};
use digests_harvest::{
    ExtractionPipeline, ExtractionResult, HarvestError, JsonFilePersister, LivePage, RecordDetail,
    RecordSet, StaticPage,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tokio::time::Instant;

const FEED_URL: &str = "https://www.youtube.com/";

/// Load an HTML snapshot from the fixtures directory.
fn load_html_fixture(name: &str) -> String {
    let path = format!(
        "{}/tests/fixtures/html/{}.html",
        env!("CARGO_MANIFEST_DIR"),
        name
    );
    fs::read_to_string(&path).expect(&format!("Failed to read HTML fixture: {}", path))
}

/// A page that serves a fixture, reveals its content root after a number of
/// polls and records what the pipeline did to it.
struct ScriptedPage {
    html: String,
    polls_until_ready: usize,
    polls: AtomicUsize,
    scrolls: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
    fail_content: bool,
}

impl ScriptedPage {
    fn new(fixture: &str) -> Self {
        Self {
            html: load_html_fixture(fixture),
            polls_until_ready: 0,
            polls: AtomicUsize::new(0),
            scrolls: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicBool::new(false)),
            fail_content: false,
        }
    }
}

#[async_trait]
impl LivePage for ScriptedPage {
    async fn goto(&self, _url: &str) -> Result<(), HarvestError> {
        Ok(())
    }

    async fn has_element(&self, selector: &str) -> Result<bool, HarvestError> {
        let n = self.polls.fetch_add(1, Ordering::SeqCst);
        if n < self.polls_until_ready {
            return Ok(false);
        }
        Ok(Snapshot::parse(&self.html).query_one(selector).is_some())
    }

    async fn ready_state(&self) -> Result<String, HarvestError> {
        Ok("complete".to_string())
    }

    async fn resource_count(&self) -> Result<u64, HarvestError> {
        Ok(12)
    }

    async fn scroll_by(&self, _pixels: u32) -> Result<(), HarvestError> {
        self.scrolls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn title(&self) -> Result<String, HarvestError> {
        Ok(Snapshot::parse(&self.html).title().unwrap_or_default())
    }

    async fn content(&self) -> Result<String, HarvestError> {
        if self.fail_content {
            return Err(HarvestError::browser(FEED_URL, "Content", None));
        }
        Ok(self.html.clone())
    }

    async fn close(&self) -> Result<(), HarvestError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn timed_pipeline(timeout_secs: u64) -> ExtractionPipeline {
    ExtractionPipeline::builder()
        .readiness_timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn full_grid_uses_first_candidate() {
    let page = ScriptedPage::new("feed_grid");
    let scrolls = page.scrolls.clone();
    let closed = page.closed.clone();

    let pipeline = ExtractionPipeline::builder().build().unwrap();
    let result = pipeline.run(page, FEED_URL).await.unwrap();

    assert_eq!(result.url, FEED_URL);
    assert_eq!(result.page_title, "YouTube");
    assert_eq!(result.selector_used.as_deref(), Some("ytd-rich-grid-media"));
    assert_eq!(result.containers_found, 12);
    assert_eq!(result.record_count, 10);

    let RecordSet::Records(records) = &result.records else {
        panic!("expected full records");
    };
    assert_eq!(records.len(), 10);
    assert_eq!(records[0].title, "Episode 1: Lifetimes Explained");
    assert_eq!(records[0].channel, "Crab Kitchen");
    assert_eq!(records[0].views, "1K views");
    assert_eq!(records[0].publish_time, "1 days ago");
    assert_eq!(records[0].url, "https://www.youtube.com/watch?v=vid001");

    assert_eq!(scrolls.load(Ordering::SeqCst), 3);
    assert!(closed.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn full_grid_limit_above_container_count() {
    let pipeline = ExtractionPipeline::builder().record_limit(50).build().unwrap();
    let result = pipeline
        .run(ScriptedPage::new("feed_grid"), FEED_URL)
        .await
        .unwrap();
    assert_eq!(result.record_count, 12);
    assert_eq!(result.records.len(), 12);
}

#[tokio::test(start_paused = true)]
async fn missing_metadata_line_yields_sentinels_only_there() {
    let pipeline = ExtractionPipeline::builder().build().unwrap();
    let result = pipeline
        .run(ScriptedPage::new("feed_grid"), FEED_URL)
        .await
        .unwrap();

    let RecordSet::Records(records) = &result.records else {
        panic!("expected full records");
    };
    let fourth = &records[3];
    assert_eq!(fourth.title, "Episode 4: Lifetimes Explained");
    assert_eq!(fourth.channel, "Ferris Talks");
    assert_eq!(fourth.url, "https://www.youtube.com/watch?v=vid004");
    assert_eq!(fourth.views, UNKNOWN);
    assert_eq!(fourth.publish_time, UNKNOWN);

    // neighbours keep their own metadata
    assert_eq!(records[2].views, "3K views");
    assert_eq!(records[4].publish_time, "5 days ago");
}

#[tokio::test(start_paused = true)]
async fn later_candidate_used_when_earlier_ones_miss() {
    let pipeline = ExtractionPipeline::builder().build().unwrap();
    let result = pipeline
        .run(ScriptedPage::new("feed_fallback"), FEED_URL)
        .await
        .unwrap();

    assert_eq!(result.selector_used.as_deref(), Some("ytd-video-renderer"));
    assert_eq!(result.record_count, 2);

    let RecordSet::Records(records) = &result.records else {
        panic!("expected full records");
    };
    assert_eq!(records[0].title, "Writing a Parser by Hand");
    assert_eq!(records[0].channel, "Parser Club");
    // a lone metadata token is read as the view count
    assert_eq!(records[0].views, "2 weeks ago");
    assert_eq!(records[0].publish_time, UNKNOWN);
    assert_eq!(records[0].url, "https://www.youtube.com/watch?v=alt001");

    assert_eq!(records[1].title, "Tokio Internals");
    assert_eq!(records[1].channel, UNKNOWN_CHANNEL);
    assert_eq!(records[1].views, "98K views");
    assert_eq!(records[1].url, UNKNOWN_URL);
}

#[tokio::test(start_paused = true)]
async fn no_matching_candidate_is_an_empty_result() {
    let page = ScriptedPage::new("feed_no_match");
    let closed = page.closed.clone();

    let pipeline = ExtractionPipeline::builder().build().unwrap();
    let result = pipeline.run(page, FEED_URL).await.unwrap();

    assert!(result.is_exhausted());
    assert_eq!(result.selector_used, None);
    assert_eq!(result.record_count, 0);
    assert!(result.records.is_empty());
    assert!(closed.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn readiness_timeout_aborts_without_result() {
    let page = ScriptedPage::new("feed_not_ready");
    let scrolls = page.scrolls.clone();
    let closed = page.closed.clone();

    let start = Instant::now();
    let err = timed_pipeline(5).run(page, FEED_URL).await.unwrap_err();

    assert!(err.is_navigation_timeout());
    assert_eq!(err.url, FEED_URL);
    assert_eq!(start.elapsed().as_secs(), 5);
    // nothing after the navigator ran
    assert_eq!(scrolls.load(Ordering::SeqCst), 0);
    assert!(closed.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn waits_for_content_root_to_appear() {
    let mut page = ScriptedPage::new("feed_grid");
    page.polls_until_ready = 20;

    let start = Instant::now();
    let result = timed_pipeline(5).run(page, FEED_URL).await.unwrap();

    assert_eq!(result.record_count, 10);
    // 20 polls at 100ms, then 3 scroll rounds and the final settle
    assert!(start.elapsed() >= Duration::from_secs(8));
}

#[tokio::test(start_paused = true)]
async fn content_capture_failure_is_absorbed() {
    let mut page = ScriptedPage::new("feed_grid");
    page.fail_content = true;

    let pipeline = ExtractionPipeline::builder().build().unwrap();
    let result = pipeline.run(page, FEED_URL).await.unwrap();
    assert!(result.is_exhausted());
    assert_eq!(result.page_title, "YouTube");
}

#[tokio::test(start_paused = true)]
async fn titles_only_run_reports_sample_titles() {
    let pipeline = ExtractionPipeline::builder()
        .detail(RecordDetail::Titles)
        .record_limit(3)
        .build()
        .unwrap();
    let result = pipeline
        .run(ScriptedPage::new("feed_grid"), FEED_URL)
        .await
        .unwrap();

    assert_eq!(
        result.records,
        RecordSet::SampleTitles(vec![
            "Episode 1: Lifetimes Explained".to_string(),
            "Episode 2: Lifetimes Explained".to_string(),
            "Episode 3: Lifetimes Explained".to_string(),
        ])
    );
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["video_count"], 3);
    assert!(json.get("sample_titles").is_some());
    assert!(json.get("records").is_none());
}

#[test]
fn extraction_is_idempotent_over_a_snapshot() {
    let html = load_html_fixture("feed_grid");
    let doc = Snapshot::parse(&html);
    let pipeline = ExtractionPipeline::builder().build().unwrap();
    let at = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();

    let first = pipeline.extract_document(&doc, FEED_URL, "YouTube", at);
    let second = pipeline.extract_document(&doc, FEED_URL, "YouTube", at);
    assert_eq!(first, second);
}

#[test]
fn result_survives_json_round_trip() {
    let html = load_html_fixture("feed_fallback");
    let pipeline = ExtractionPipeline::builder().build().unwrap();
    let result = pipeline.extract_html(&html, FEED_URL, "");

    let json = serde_json::to_string(&result).unwrap();
    let back: ExtractionResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}

#[tokio::test]
async fn saved_html_run_persists_to_directory() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline = ExtractionPipeline::builder()
        .scroll_rounds(0)
        .build()
        .unwrap();
    let page = StaticPage::from_html(load_html_fixture("feed_grid"));
    let persister = JsonFilePersister::in_dir(temp_dir.path(), "youtube_data");

    let (result, location) = pipeline
        .run_and_persist(page, FEED_URL, &persister)
        .await
        .unwrap();

    assert!(location.contains("youtube_data_"));
    let saved: ExtractionResult =
        serde_json::from_str(&fs::read_to_string(&location).unwrap()).unwrap();
    assert_eq!(saved, result);
}
