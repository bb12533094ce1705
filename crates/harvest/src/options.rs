// ABOUTME: Run configuration for the harvest pipeline: readiness, scrolling, limits, request shaping.
// ABOUTME: PipelineBuilder provides a fluent API that validates the bundle before building a pipeline.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::HarvestError;
use crate::pipeline::ExtractionPipeline;
use crate::profile::loader::load_builtin_profile;
use crate::profile::FeedProfile;

/// Desktop Chrome identity string sent by the drivers.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// How the navigator decides a page is ready to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessMode {
    /// The profile's content-root marker is present.
    #[default]
    Selector,
    /// The document is complete and no new resources arrive for a quiet window.
    NetworkIdle,
}

impl fmt::Display for ReadinessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReadinessMode::Selector => "selector",
            ReadinessMode::NetworkIdle => "network-idle",
        };
        write!(f, "{}", s)
    }
}

impl From<&str> for ReadinessMode {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "network-idle" | "network_idle" | "networkidle" | "idle" => ReadinessMode::NetworkIdle,
            _ => ReadinessMode::Selector,
        }
    }
}

/// Granularity of the records placed in the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordDetail {
    #[default]
    Full,
    Titles,
}

/// Browser viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Configuration bundle for one extraction run.
#[derive(Debug, Clone)]
pub struct Options {
    pub readiness_mode: ReadinessMode,
    pub readiness_timeout: Duration,
    pub poll_interval: Duration,
    /// Quiet period required by [`ReadinessMode::NetworkIdle`].
    pub idle_window: Duration,
    pub record_limit: usize,
    pub scroll_rounds: u32,
    pub scroll_step: u32,
    pub settle_delay: Duration,
    /// Extra pause after the last scroll round.
    pub final_settle: Duration,
    pub detail: RecordDetail,
    pub viewport: Viewport,
    pub user_agent: String,
    pub headless: bool,
    pub headers: HashMap<String, String>,
    pub http_client: Option<reqwest::Client>,
    pub profile: FeedProfile,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            readiness_mode: ReadinessMode::Selector,
            readiness_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(100),
            idle_window: Duration::from_millis(500),
            record_limit: 10,
            scroll_rounds: 3,
            scroll_step: 1000,
            settle_delay: Duration::from_secs(1),
            final_settle: Duration::from_secs(3),
            detail: RecordDetail::Full,
            viewport: Viewport::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headless: true,
            headers: HashMap::new(),
            http_client: None,
            profile: load_builtin_profile(),
        }
    }
}

impl Options {
    /// Checks the bundle before a run starts.
    pub fn validate(&self) -> Result<(), HarvestError> {
        self.profile.validate()?;
        if self.record_limit == 0 {
            return Err(HarvestError::config(
                "ValidateOptions",
                Some(anyhow::anyhow!("record limit must be at least 1")),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(HarvestError::config(
                "ValidateOptions",
                Some(anyhow::anyhow!("poll interval must be non-zero")),
            ));
        }
        Ok(())
    }
}

/// Builder for constructing an [`ExtractionPipeline`].
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    opts: Options,
}

impl PipelineBuilder {
    /// Create a new PipelineBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn readiness_mode(mut self, mode: ReadinessMode) -> Self {
        self.opts.readiness_mode = mode;
        self
    }

    pub fn readiness_timeout(mut self, timeout: Duration) -> Self {
        self.opts.readiness_timeout = timeout;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.opts.poll_interval = interval;
        self
    }

    pub fn idle_window(mut self, window: Duration) -> Self {
        self.opts.idle_window = window;
        self
    }

    pub fn record_limit(mut self, limit: usize) -> Self {
        self.opts.record_limit = limit;
        self
    }

    pub fn scroll_rounds(mut self, rounds: u32) -> Self {
        self.opts.scroll_rounds = rounds;
        self
    }

    pub fn scroll_step(mut self, pixels: u32) -> Self {
        self.opts.scroll_step = pixels;
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.opts.settle_delay = delay;
        self
    }

    pub fn final_settle(mut self, delay: Duration) -> Self {
        self.opts.final_settle = delay;
        self
    }

    pub fn detail(mut self, detail: RecordDetail) -> Self {
        self.opts.detail = detail;
        self
    }

    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.opts.viewport = Viewport { width, height };
        self
    }

    /// Set the User-Agent sent by the drivers.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.opts.headless = headless;
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Use a custom HTTP client for the static driver.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Replace the feed profile.
    pub fn profile(mut self, profile: FeedProfile) -> Self {
        self.opts.profile = profile;
        self
    }

    /// Replace the profile's candidate selectors, keeping their order.
    pub fn candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opts.profile.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    /// The options as configured so far.
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Validate the options and build the pipeline.
    pub fn build(self) -> Result<ExtractionPipeline, HarvestError> {
        self.opts.validate()?;
        Ok(ExtractionPipeline::new(self.opts))
    }
}
