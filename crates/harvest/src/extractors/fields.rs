// ABOUTME: Per-field extraction from a single record container with sentinel fallbacks.
// ABOUTME: Title, channel, metadata tokens and link; a missing sub-element never raises.

//! Field extraction.
//!
//! Every accessor here is total: when the sub-element a field lives in is
//! missing, the field's sentinel is returned instead. Fields are independent,
//! so a missing channel never affects the title and vice versa.
//!
//! The metadata line is read positionally: token 0 is taken as the view count
//! and token 1 as the publish time. A single token is therefore always read as
//! views, even on items that only show an age.

use url::Url;

use crate::dom::ElementHandle;
use crate::extractors::record::VideoRecord;
use crate::profile::{FeedProfile, FieldSelectors};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_CHANNEL: &str = "Unknown Channel";
pub const UNKNOWN: &str = "Unknown";
pub const UNKNOWN_URL: &str = "Unknown URL";

/// Extracts fields from record containers using a profile's sub-selectors.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    selectors: FieldSelectors,
    origin: String,
    base: Option<Url>,
}

impl FieldExtractor {
    /// Create an extractor from a feed profile.
    pub fn new(profile: &FeedProfile) -> Self {
        Self::from_parts(profile.fields.clone(), &profile.origin)
    }

    /// Create an extractor from explicit sub-selectors and a site origin.
    pub fn from_parts(selectors: FieldSelectors, origin: &str) -> Self {
        Self {
            selectors,
            origin: origin.trim_end_matches('/').to_string(),
            base: Url::parse(origin).ok(),
        }
    }

    /// The title text if the title sub-element exists.
    pub fn title_opt<E: ElementHandle>(&self, container: &E) -> Option<String> {
        container
            .query_one(&self.selectors.title)
            .map(|el| el.text())
    }

    pub fn title<E: ElementHandle>(&self, container: &E) -> String {
        self.title_opt(container)
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
    }

    pub fn channel<E: ElementHandle>(&self, container: &E) -> String {
        container
            .query_one(&self.selectors.channel)
            .map(|el| el.text())
            .unwrap_or_else(|| UNKNOWN_CHANNEL.to_string())
    }

    /// Returns `(views, publish_time)` from the metadata line.
    pub fn metadata<E: ElementHandle>(&self, container: &E) -> (String, String) {
        let tokens: Vec<String> = container
            .query_one(&self.selectors.metadata_line)
            .map(|line| {
                line.query_all(&self.selectors.metadata_token)
                    .iter()
                    .map(|t| t.text())
                    .collect()
            })
            .unwrap_or_default();

        let mut tokens = tokens.into_iter();
        let views = tokens.next().unwrap_or_else(|| UNKNOWN.to_string());
        let publish_time = tokens.next().unwrap_or_else(|| UNKNOWN.to_string());
        (views, publish_time)
    }

    /// The absolute record link, or the URL sentinel.
    pub fn link<E: ElementHandle>(&self, container: &E) -> String {
        container
            .query_one(&self.selectors.link)
            .and_then(|a| a.attr(&self.selectors.link_attr))
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty())
            .map(|href| self.absolutize(&href))
            .unwrap_or_else(|| UNKNOWN_URL.to_string())
    }

    /// Builds a complete record; every field is populated.
    pub fn record<E: ElementHandle>(&self, container: &E) -> VideoRecord {
        let (views, publish_time) = self.metadata(container);
        VideoRecord {
            title: self.title(container),
            channel: self.channel(container),
            views,
            publish_time,
            url: self.link(container),
        }
    }

    fn absolutize(&self, href: &str) -> String {
        match &self.base {
            Some(base) => base
                .join(href)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| format!("{}{}", self.origin, href)),
            None => format!("{}{}", self.origin, href),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DocumentHandle, Snapshot};
    use crate::profile::loader::load_builtin_profile;
    use pretty_assertions::assert_eq;

    const FULL_ITEM: &str = r#"
        <html><body>
        <ytd-rich-grid-media>
            <a id="thumbnail" href="/watch?v=abc123"></a>
            <a id="video-title">
                Rust in   Production
            </a>
            <div id="channel-name"><a href="/@ferris">Ferris Talks</a></div>
            <div id="metadata-line">
                <span>1.2M views</span>
                <span>3 days ago</span>
            </div>
        </ytd-rich-grid-media>
        </body></html>
    "#;

    fn extractor() -> FieldExtractor {
        FieldExtractor::new(&load_builtin_profile())
    }

    fn first_container(doc: &Snapshot) -> crate::dom::Node<'_> {
        doc.query_one("ytd-rich-grid-media").unwrap()
    }

    #[test]
    fn test_full_record() {
        let doc = Snapshot::parse(FULL_ITEM);
        let record = extractor().record(&first_container(&doc));
        assert_eq!(
            record,
            VideoRecord {
                title: "Rust in Production".to_string(),
                channel: "Ferris Talks".to_string(),
                views: "1.2M views".to_string(),
                publish_time: "3 days ago".to_string(),
                url: "https://www.youtube.com/watch?v=abc123".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_channel_only_affects_channel() {
        let html = FULL_ITEM.replace(
            r#"<div id="channel-name"><a href="/@ferris">Ferris Talks</a></div>"#,
            "",
        );
        let doc = Snapshot::parse(&html);
        let record = extractor().record(&first_container(&doc));
        assert_eq!(record.channel, UNKNOWN_CHANNEL);
        assert_eq!(record.title, "Rust in Production");
        assert_eq!(record.views, "1.2M views");
        assert_eq!(record.publish_time, "3 days ago");
        assert_eq!(record.url, "https://www.youtube.com/watch?v=abc123");
    }

    #[test]
    fn test_missing_title_only_affects_title() {
        let html = FULL_ITEM.replace("id=\"video-title\"", "id=\"other\"");
        let doc = Snapshot::parse(&html);
        let fe = extractor();
        let container = first_container(&doc);
        assert_eq!(fe.title_opt(&container), None);
        let record = fe.record(&container);
        assert_eq!(record.title, UNKNOWN_TITLE);
        assert_eq!(record.channel, "Ferris Talks");
    }

    #[test]
    fn test_single_metadata_token_is_views() {
        let html = FULL_ITEM.replace("<span>3 days ago</span>", "");
        let doc = Snapshot::parse(&html);
        let (views, published) = extractor().metadata(&first_container(&doc));
        assert_eq!(views, "1.2M views");
        assert_eq!(published, UNKNOWN);
    }

    #[test]
    fn test_missing_metadata_line() {
        let html = FULL_ITEM.replace("id=\"metadata-line\"", "id=\"elsewhere\"");
        let doc = Snapshot::parse(&html);
        let (views, published) = extractor().metadata(&first_container(&doc));
        assert_eq!(views, UNKNOWN);
        assert_eq!(published, UNKNOWN);
    }

    #[test]
    fn test_link_without_href_is_sentinel() {
        let html = FULL_ITEM.replace(r#" href="/watch?v=abc123""#, "");
        let doc = Snapshot::parse(&html);
        assert_eq!(extractor().link(&first_container(&doc)), UNKNOWN_URL);
    }

    #[test]
    fn test_absolute_link_is_kept() {
        let html = FULL_ITEM.replace("/watch?v=abc123", "https://youtu.be/abc123");
        let doc = Snapshot::parse(&html);
        assert_eq!(
            extractor().link(&first_container(&doc)),
            "https://youtu.be/abc123"
        );
    }

    #[test]
    fn test_origin_with_trailing_slash() {
        let mut profile = load_builtin_profile();
        profile.origin = "https://www.youtube.com/".to_string();
        let doc = Snapshot::parse(FULL_ITEM);
        let fe = FieldExtractor::new(&profile);
        assert_eq!(
            fe.link(&first_container(&doc)),
            "https://www.youtube.com/watch?v=abc123"
        );
    }

    #[test]
    fn test_empty_container_is_all_sentinels() {
        let doc = Snapshot::parse(
            "<html><body><ytd-rich-grid-media></ytd-rich-grid-media></body></html>",
        );
        let record = extractor().record(&first_container(&doc));
        assert_eq!(record, VideoRecord::default());
    }
}
