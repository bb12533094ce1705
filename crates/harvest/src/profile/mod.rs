// ABOUTME: Feed profile data model: target URL, readiness marker, candidate selectors, field sub-selectors.
// ABOUTME: Profiles are plain JSON so layout drift is handled by editing data rather than code.

//! Feed profiles.
//!
//! A profile describes one feed page: where it lives, which structural marker
//! signals that the feed has rendered, the ordered list of candidate container
//! selectors, and the sub-selectors used to pull each field out of a container.

pub mod loader;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::HarvestError;

fn default_link_attr() -> String {
    "href".to_string()
}

/// Sub-selectors applied inside a single record container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelectors {
    pub title: String,
    pub channel: String,
    /// The element holding the metadata tokens (views, publish time).
    pub metadata_line: String,
    /// Token elements beneath `metadata_line`, read in document order.
    pub metadata_token: String,
    /// The thumbnail anchor carrying the record link.
    pub link: String,
    #[serde(default = "default_link_attr")]
    pub link_attr: String,
}

/// A complete description of one feed page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedProfile {
    pub name: String,
    /// Default target URL.
    pub url: String,
    /// Site origin used to absolutize relative record links.
    pub origin: String,
    /// Marker whose presence means the feed has rendered.
    pub content_root: String,
    /// Container selectors in priority order; first valid match wins.
    pub candidates: Vec<String>,
    pub fields: FieldSelectors,
}

impl FeedProfile {
    /// Checks the invariants extraction relies on.
    pub fn validate(&self) -> Result<(), HarvestError> {
        if self.candidates.is_empty() {
            return Err(HarvestError::config(
                "ValidateProfile",
                Some(anyhow::anyhow!(
                    "profile {:?} has no candidate selectors",
                    self.name
                )),
            ));
        }
        if let Some(pos) = self.candidates.iter().position(|c| c.trim().is_empty()) {
            return Err(HarvestError::config(
                "ValidateProfile",
                Some(anyhow::anyhow!("candidate selector #{} is empty", pos)),
            ));
        }
        if self.content_root.trim().is_empty() {
            return Err(HarvestError::config(
                "ValidateProfile",
                Some(anyhow::anyhow!("content_root is empty")),
            ));
        }
        Url::parse(&self.origin).map_err(|e| {
            HarvestError::config(
                "ValidateProfile",
                Some(anyhow::anyhow!("invalid origin {:?}: {}", self.origin, e)),
            )
        })?;
        Ok(())
    }
}
