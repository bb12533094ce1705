// ABOUTME: Navigator: loads the target and waits until the page is ready for extraction.
// ABOUTME: Readiness is marker presence or network idleness, bounded by a single timeout.

use std::time::Duration;

use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info};

use crate::error::HarvestError;
use crate::options::{Options, ReadinessMode};
use crate::page::LivePage;

/// Evidence that the page reached its readiness condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadySignal {
    pub mode: ReadinessMode,
    /// Time from the start of navigation until readiness.
    pub elapsed: Duration,
}

/// Drives a page to its readiness condition.
#[derive(Debug, Clone)]
pub struct Navigator {
    mode: ReadinessMode,
    readiness_timeout: Duration,
    poll_interval: Duration,
    idle_window: Duration,
    content_root: String,
}

impl Navigator {
    pub fn new(opts: &Options) -> Self {
        Self {
            mode: opts.readiness_mode,
            readiness_timeout: opts.readiness_timeout,
            poll_interval: opts.poll_interval,
            idle_window: opts.idle_window,
            content_root: opts.profile.content_root.clone(),
        }
    }

    /// Loads `target_url` and blocks until the configured readiness condition holds.
    ///
    /// Fails with a navigation-timeout error when the condition is not met
    /// within the readiness timeout. Navigation itself counts against it.
    pub async fn ensure_ready<P: LivePage + ?Sized>(
        &self,
        page: &P,
        target_url: &str,
    ) -> Result<ReadySignal, HarvestError> {
        let started = Instant::now();
        info!(url = target_url, mode = %self.mode, "navigating");

        let wait = async {
            page.goto(target_url).await?;
            match self.mode {
                ReadinessMode::Selector => self.wait_for_marker(page).await,
                ReadinessMode::NetworkIdle => self.wait_for_idle(page).await,
            }
        };

        match timeout(self.readiness_timeout, wait).await {
            Ok(Ok(())) => {
                let signal = ReadySignal {
                    mode: self.mode,
                    elapsed: started.elapsed(),
                };
                info!(elapsed_ms = signal.elapsed.as_millis() as u64, "page ready");
                Ok(signal)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(HarvestError::navigation_timeout(
                target_url,
                "EnsureReady",
                Some(anyhow::anyhow!(
                    "{} not reached within {:?}",
                    self.describe(),
                    self.readiness_timeout
                )),
            )),
        }
    }

    fn describe(&self) -> String {
        match self.mode {
            ReadinessMode::Selector => format!("marker {:?}", self.content_root),
            ReadinessMode::NetworkIdle => "network idle".to_string(),
        }
    }

    async fn wait_for_marker<P: LivePage + ?Sized>(&self, page: &P) -> Result<(), HarvestError> {
        loop {
            if page.has_element(&self.content_root).await? {
                return Ok(());
            }
            debug!(marker = %self.content_root, "content root not present yet");
            sleep(self.poll_interval).await;
        }
    }

    async fn wait_for_idle<P: LivePage + ?Sized>(&self, page: &P) -> Result<(), HarvestError> {
        let mut last_count: Option<u64> = None;
        let mut quiet_since = Instant::now();
        loop {
            let state = page.ready_state().await?;
            let count = page.resource_count().await?;

            if state != "complete" || last_count != Some(count) {
                debug!(state = %state, resources = count, "network still active");
                last_count = Some(count);
                quiet_since = Instant::now();
            } else if quiet_since.elapsed() >= self.idle_window {
                return Ok(());
            }
            sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::StaticPage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};

    const READY_HTML: &str = r#"<html><body><div id="contents"></div></body></html>"#;
    const EMPTY_HTML: &str = r#"<html><body><div id="app"></div></body></html>"#;

    fn opts(mode: ReadinessMode, secs: u64) -> Options {
        Options {
            readiness_mode: mode,
            readiness_timeout: Duration::from_secs(secs),
            ..Default::default()
        }
    }

    /// A page whose resource count grows for the first few polls.
    struct LoadingPage {
        polls: AtomicU64,
        settle_after: u64,
    }

    #[async_trait]
    impl LivePage for LoadingPage {
        async fn goto(&self, _url: &str) -> Result<(), HarvestError> {
            Ok(())
        }
        async fn has_element(&self, _selector: &str) -> Result<bool, HarvestError> {
            Ok(false)
        }
        async fn ready_state(&self) -> Result<String, HarvestError> {
            Ok("complete".to_string())
        }
        async fn resource_count(&self) -> Result<u64, HarvestError> {
            let n = self.polls.fetch_add(1, Ordering::SeqCst);
            Ok(n.min(self.settle_after))
        }
        async fn scroll_by(&self, _pixels: u32) -> Result<(), HarvestError> {
            Ok(())
        }
        async fn title(&self) -> Result<String, HarvestError> {
            Ok(String::new())
        }
        async fn content(&self) -> Result<String, HarvestError> {
            Ok(String::new())
        }
        async fn close(&self) -> Result<(), HarvestError> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_selector_mode_ready_when_marker_present() {
        let page = StaticPage::from_html(READY_HTML);
        let nav = Navigator::new(&opts(ReadinessMode::Selector, 5));
        let signal = nav.ensure_ready(&page, "https://www.youtube.com/").await.unwrap();
        assert_eq!(signal.mode, ReadinessMode::Selector);
    }

    #[tokio::test(start_paused = true)]
    async fn test_selector_mode_times_out_without_marker() {
        let page = StaticPage::from_html(EMPTY_HTML);
        let nav = Navigator::new(&opts(ReadinessMode::Selector, 5));
        let err = nav
            .ensure_ready(&page, "https://www.youtube.com/")
            .await
            .unwrap_err();
        assert!(err.is_navigation_timeout());
        assert!(err.to_string().contains("#contents"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_idle_waits_for_quiet_window() {
        let page = LoadingPage {
            polls: AtomicU64::new(0),
            settle_after: 5,
        };
        let nav = Navigator::new(&opts(ReadinessMode::NetworkIdle, 5));
        let signal = nav.ensure_ready(&page, "https://www.youtube.com/").await.unwrap();
        assert_eq!(signal.mode, ReadinessMode::NetworkIdle);
        // five changing polls, then a full idle window of unchanged counts
        assert!(signal.elapsed >= Duration::from_millis(500 + 5 * 100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_idle_times_out_when_always_busy() {
        let page = LoadingPage {
            polls: AtomicU64::new(0),
            settle_after: u64::MAX,
        };
        let nav = Navigator::new(&opts(ReadinessMode::NetworkIdle, 5));
        let err = nav
            .ensure_ready(&page, "https://www.youtube.com/")
            .await
            .unwrap_err();
        assert!(err.is_navigation_timeout());
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_failure_is_not_a_timeout() {
        let page = StaticPage::new(&Options::default()).unwrap();
        let nav = Navigator::new(&opts(ReadinessMode::Selector, 5));
        let err = nav.ensure_ready(&page, "not a url").await.unwrap_err();
        assert!(err.is_invalid_url());
    }
}
