// ABOUTME: ChromePage driver backed by chromiumoxide (cargo feature "chrome").
// ABOUTME: Launches Chromium with the configured viewport and identity; primitives run over CDP evaluate.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use chromiumoxide::handler::viewport::Viewport as CdpViewport;
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::HarvestError;
use crate::options::Options;
use crate::page::LivePage;

/// One Chromium instance with a single page.
pub struct ChromePage {
    page: Page,
    browser: Mutex<Option<Browser>>,
    handler: Mutex<Option<JoinHandle<()>>>,
}

fn cdp_err(op: &str, e: impl std::fmt::Display) -> HarvestError {
    HarvestError::browser("", op, Some(anyhow::anyhow!("{}", e)))
}

impl ChromePage {
    /// Launch Chromium and open a blank page.
    pub async fn launch(opts: &Options) -> Result<Self, HarvestError> {
        let mut builder = BrowserConfig::builder()
            .window_size(opts.viewport.width, opts.viewport.height)
            .viewport(CdpViewport {
                width: opts.viewport.width,
                height: opts.viewport.height,
                ..Default::default()
            });
        if !opts.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(|e| cdp_err("Launch", e))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| cdp_err("Launch", e))?;
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "browser handler stopped");
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| cdp_err("NewPage", e))?;
        page.set_user_agent(opts.user_agent.as_str())
            .await
            .map_err(|e| cdp_err("SetUserAgent", e))?;
        if !opts.headers.is_empty() {
            let headers =
                serde_json::to_value(&opts.headers).map_err(|e| cdp_err("SetHeaders", e))?;
            page.execute(SetExtraHttpHeadersParams::new(Headers::new(headers)))
                .await
                .map_err(|e| cdp_err("SetHeaders", e))?;
        }

        Ok(Self {
            page,
            browser: Mutex::new(Some(browser)),
            handler: Mutex::new(Some(handle)),
        })
    }

    async fn eval<T: DeserializeOwned>(&self, op: &str, expr: String) -> Result<T, HarvestError> {
        self.page
            .evaluate(expr)
            .await
            .map_err(|e| cdp_err(op, e))?
            .into_value::<T>()
            .map_err(|e| cdp_err(op, e))
    }
}

#[async_trait]
impl LivePage for ChromePage {
    async fn goto(&self, url: &str) -> Result<(), HarvestError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| HarvestError::navigation(url, "Goto", Some(anyhow::anyhow!("{}", e))))?;
        Ok(())
    }

    async fn has_element(&self, selector: &str) -> Result<bool, HarvestError> {
        let quoted = serde_json::to_string(selector).map_err(|e| cdp_err("HasElement", e))?;
        self.eval(
            "HasElement",
            format!("document.querySelector({}) !== null", quoted),
        )
        .await
    }

    async fn ready_state(&self) -> Result<String, HarvestError> {
        self.eval("ReadyState", "document.readyState".to_string()).await
    }

    async fn resource_count(&self) -> Result<u64, HarvestError> {
        self.eval(
            "ResourceCount",
            "performance.getEntriesByType('resource').length".to_string(),
        )
        .await
    }

    async fn scroll_by(&self, pixels: u32) -> Result<(), HarvestError> {
        self.page
            .evaluate(format!("window.scrollBy(0, {})", pixels))
            .await
            .map_err(|e| cdp_err("ScrollBy", e))?;
        Ok(())
    }

    async fn title(&self) -> Result<String, HarvestError> {
        let title = self
            .page
            .get_title()
            .await
            .map_err(|e| cdp_err("Title", e))?;
        Ok(title.unwrap_or_default())
    }

    async fn content(&self) -> Result<String, HarvestError> {
        self.page.content().await.map_err(|e| cdp_err("Content", e))
    }

    async fn close(&self) -> Result<(), HarvestError> {
        if let Err(e) = self.page.clone().close().await {
            warn!(error = %e, "failed to close page");
        }

        let mut result = Ok(());
        if let Some(mut browser) = self.browser.lock().await.take() {
            if let Err(e) = browser.close().await {
                result = Err(cdp_err("CloseBrowser", e));
            }
            if let Err(e) = browser.wait().await {
                debug!(error = %e, "browser process wait failed");
            }
        }
        if let Some(handle) = self.handler.lock().await.take() {
            handle.abort();
        }
        result
    }
}
