// ABOUTME: Typed document query capability used by the extractors.
// ABOUTME: DocumentHandle/ElementHandle traits plus the scraper-backed Snapshot implementation.

//! Document query abstraction.
//!
//! Extraction code never evaluates script strings against a page. It asks a
//! [`DocumentHandle`] for elements matching a structural pattern (a CSS
//! selector) and reads text or attributes off the returned [`ElementHandle`]s.
//! Live pages are captured into a [`Snapshot`] before extraction.

pub mod snapshot;

pub use snapshot::{Node, Snapshot};

/// A node in a document that can be queried further and read from.
pub trait ElementHandle: Sized {
    /// All descendants matching `pattern`, in document order.
    /// An unparseable pattern matches nothing.
    fn query_all(&self, pattern: &str) -> Vec<Self>;

    /// The first descendant matching `pattern`.
    fn query_one(&self, pattern: &str) -> Option<Self> {
        self.query_all(pattern).into_iter().next()
    }

    /// Text content of the node and its descendants, whitespace-normalized.
    fn text(&self) -> String;

    /// Raw attribute value, if the attribute is present.
    fn attr(&self, name: &str) -> Option<String>;
}

/// A queryable document.
pub trait DocumentHandle {
    type Element<'a>: ElementHandle
    where
        Self: 'a;

    /// All elements matching `pattern`, in document order.
    fn query_all(&self, pattern: &str) -> Vec<Self::Element<'_>>;

    /// The first element matching `pattern`.
    fn query_one(&self, pattern: &str) -> Option<Self::Element<'_>> {
        self.query_all(pattern).into_iter().next()
    }
}

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
