// ABOUTME: VideoRecord data model and the RecordExtractor that builds records from containers.
// ABOUTME: Extraction is bounded by a limit and preserves container order.

use serde::{Deserialize, Serialize};

use crate::dom::ElementHandle;
use crate::extractors::fields::{
    FieldExtractor, UNKNOWN, UNKNOWN_CHANNEL, UNKNOWN_TITLE, UNKNOWN_URL,
};

/// One feed item. Every field is always populated; missing data is a sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub title: String,
    pub channel: String,
    pub views: String,
    pub publish_time: String,
    pub url: String,
}

impl Default for VideoRecord {
    fn default() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            channel: UNKNOWN_CHANNEL.to_string(),
            views: UNKNOWN.to_string(),
            publish_time: UNKNOWN.to_string(),
            url: UNKNOWN_URL.to_string(),
        }
    }
}

impl VideoRecord {
    /// Returns true if the title came from the page rather than the sentinel.
    pub fn has_title(&self) -> bool {
        self.title != UNKNOWN_TITLE
    }

    /// Returns true if the link came from the page rather than the sentinel.
    pub fn has_url(&self) -> bool {
        self.url != UNKNOWN_URL
    }
}

/// Applies a [`FieldExtractor`] across a list of containers.
#[derive(Debug, Clone, Copy)]
pub struct RecordExtractor<'f> {
    fields: &'f FieldExtractor,
}

impl<'f> RecordExtractor<'f> {
    pub fn new(fields: &'f FieldExtractor) -> Self {
        Self { fields }
    }

    /// Builds at most `limit` records, in container order.
    pub fn extract<E: ElementHandle>(&self, containers: &[E], limit: usize) -> Vec<VideoRecord> {
        containers
            .iter()
            .take(limit)
            .map(|c| self.fields.record(c))
            .collect()
    }
}
