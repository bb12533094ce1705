// ABOUTME: StaticPage driver: serves a page fetched over HTTP or loaded from saved HTML.
// ABOUTME: No script execution, so scrolling is a no-op and the resource count never changes.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::dom::{DocumentHandle, Snapshot};
use crate::error::HarvestError;
use crate::options::Options;
use crate::page::LivePage;
use crate::resource::{fetch, FetchOptions};

#[derive(Debug, Default)]
struct Loaded {
    url: String,
    html: String,
}

/// A page whose content is a single HTML document.
#[derive(Debug)]
pub struct StaticPage {
    client: Option<reqwest::Client>,
    fetch_opts: FetchOptions,
    preloaded: bool,
    state: Mutex<Option<Loaded>>,
}

impl StaticPage {
    /// Create a page that fetches its target with the configured identity.
    pub fn new(opts: &Options) -> Result<Self, HarvestError> {
        let client = match &opts.http_client {
            Some(client) => client.clone(),
            None => reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.readiness_timeout)
                .cookie_store(true)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .map_err(|e| HarvestError::browser("", "BuildClient", Some(e.into())))?,
        };

        Ok(Self {
            client: Some(client),
            fetch_opts: FetchOptions {
                headers: opts.headers.clone(),
            },
            preloaded: false,
            state: Mutex::new(None),
        })
    }

    /// Create a page from saved HTML; `goto` does not touch the network.
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            client: None,
            fetch_opts: FetchOptions::default(),
            preloaded: true,
            state: Mutex::new(Some(Loaded {
                url: String::new(),
                html: html.into(),
            })),
        }
    }

    fn with_loaded<T>(&self, op: &str, f: impl FnOnce(&Loaded) -> T) -> Result<T, HarvestError> {
        let guard = self.state.lock().map_err(|_| {
            HarvestError::browser("", op, Some(anyhow::anyhow!("page state poisoned")))
        })?;
        match guard.as_ref() {
            Some(loaded) => Ok(f(loaded)),
            None => Err(HarvestError::browser(
                "",
                op,
                Some(anyhow::anyhow!("no document loaded")),
            )),
        }
    }

    fn store(&self, loaded: Option<Loaded>) -> Result<(), HarvestError> {
        let mut guard = self.state.lock().map_err(|_| {
            HarvestError::browser("", "Store", Some(anyhow::anyhow!("page state poisoned")))
        })?;
        *guard = loaded;
        Ok(())
    }
}

#[async_trait]
impl LivePage for StaticPage {
    async fn goto(&self, url: &str) -> Result<(), HarvestError> {
        if self.preloaded {
            let mut guard = self.state.lock().map_err(|_| {
                HarvestError::browser(url, "Goto", Some(anyhow::anyhow!("page state poisoned")))
            })?;
            if let Some(loaded) = guard.as_mut() {
                loaded.url = url.to_string();
            }
            debug!(url, "serving preloaded document");
            return Ok(());
        }

        let client = self.client.as_ref().ok_or_else(|| {
            HarvestError::browser(url, "Goto", Some(anyhow::anyhow!("no HTTP client")))
        })?;
        let fetched = fetch(client, url, &self.fetch_opts).await?;
        debug!(url, final_url = %fetched.final_url, bytes = fetched.body.len(), "fetched document");
        self.store(Some(Loaded {
            url: fetched.final_url.clone(),
            html: fetched.text_utf8(),
        }))
    }

    async fn has_element(&self, selector: &str) -> Result<bool, HarvestError> {
        self.with_loaded("HasElement", |loaded| {
            Snapshot::parse(&loaded.html).query_one(selector).is_some()
        })
    }

    async fn ready_state(&self) -> Result<String, HarvestError> {
        let guard = self.state.lock().map_err(|_| {
            HarvestError::browser("", "ReadyState", Some(anyhow::anyhow!("page state poisoned")))
        })?;
        let state = if guard.is_some() { "complete" } else { "loading" };
        Ok(state.to_string())
    }

    async fn resource_count(&self) -> Result<u64, HarvestError> {
        Ok(0)
    }

    async fn scroll_by(&self, pixels: u32) -> Result<(), HarvestError> {
        debug!(pixels, "static page cannot scroll; nothing to materialize");
        Ok(())
    }

    async fn title(&self) -> Result<String, HarvestError> {
        self.with_loaded("Title", |loaded| {
            Snapshot::parse(&loaded.html).title().unwrap_or_default()
        })
    }

    async fn content(&self) -> Result<String, HarvestError> {
        self.with_loaded("Content", |loaded| loaded.html.clone())
    }

    async fn close(&self) -> Result<(), HarvestError> {
        self.store(None)
    }
}
