// ABOUTME: LivePage trait: the minimal set of page primitives the navigator, scroller and pipeline use.
// ABOUTME: Drivers: StaticPage (HTTP fetch or saved HTML) and ChromePage (chromiumoxide, feature "chrome").

//! Live page drivers.
//!
//! The extraction core only needs a handful of primitives from whatever is
//! rendering the page: load a URL, probe for a selector, read the document's
//! load state, scroll, and capture the current HTML. Browser process
//! management stays inside the driver.

#[cfg(feature = "chrome")]
pub mod chrome;
pub mod static_page;

use async_trait::async_trait;

use crate::error::HarvestError;

#[cfg(feature = "chrome")]
pub use chrome::ChromePage;
pub use static_page::StaticPage;

/// A single page owned by one pipeline run.
#[async_trait]
pub trait LivePage: Send + Sync {
    /// Start loading `url` in this page.
    async fn goto(&self, url: &str) -> Result<(), HarvestError>;

    /// Whether an element matching `selector` is currently in the document.
    async fn has_element(&self, selector: &str) -> Result<bool, HarvestError>;

    /// The document's `readyState` (`loading`, `interactive`, `complete`).
    async fn ready_state(&self) -> Result<String, HarvestError>;

    /// Number of resources the page has fetched so far.
    async fn resource_count(&self) -> Result<u64, HarvestError>;

    /// Scroll the viewport down by `pixels`.
    async fn scroll_by(&self, pixels: u32) -> Result<(), HarvestError>;

    /// The document title.
    async fn title(&self) -> Result<String, HarvestError>;

    /// The current serialized HTML of the document.
    async fn content(&self) -> Result<String, HarvestError>;

    /// Release the page and anything the driver launched for it.
    async fn close(&self) -> Result<(), HarvestError>;
}
