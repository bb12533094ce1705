// ABOUTME: Static document snapshot backed by scraper::Html.
// ABOUTME: Implements DocumentHandle/ElementHandle so extraction runs against captured page HTML.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{normalize_whitespace, DocumentHandle, ElementHandle};

/// Parses a selector, treating invalid selectors as "matches nothing".
fn compile(pattern: &str) -> Option<Selector> {
    match Selector::parse(pattern) {
        Ok(sel) => Some(sel),
        Err(e) => {
            debug!(pattern, error = %e, "invalid selector pattern");
            None
        }
    }
}

/// An immutable capture of a document's HTML.
///
/// `scraper::Html` is not `Send`, so a snapshot should be built, queried and
/// dropped without crossing an `.await`.
pub struct Snapshot {
    html: Html,
}

impl Snapshot {
    /// Parse a full HTML document.
    pub fn parse(raw: &str) -> Self {
        Self {
            html: Html::parse_document(raw),
        }
    }

    /// The document `<title>`, whitespace-normalized.
    pub fn title(&self) -> Option<String> {
        self.query_one("title").map(|n| n.text())
    }
}

impl DocumentHandle for Snapshot {
    type Element<'a> = Node<'a>;

    fn query_all(&self, pattern: &str) -> Vec<Node<'_>> {
        let Some(sel) = compile(pattern) else {
            return vec![];
        };
        self.html.select(&sel).map(Node).collect()
    }

    fn query_one(&self, pattern: &str) -> Option<Node<'_>> {
        let sel = compile(pattern)?;
        self.html.select(&sel).next().map(Node)
    }
}

/// An element borrowed from a [`Snapshot`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    /// The element's tag name.
    pub fn tag(&self) -> &'a str {
        self.0.value().name()
    }
}

impl<'a> ElementHandle for Node<'a> {
    fn query_all(&self, pattern: &str) -> Vec<Self> {
        let Some(sel) = compile(pattern) else {
            return vec![];
        };
        self.0.select(&sel).map(Node).collect()
    }

    fn query_one(&self, pattern: &str) -> Option<Self> {
        let sel = compile(pattern)?;
        self.0.select(&sel).next().map(Node)
    }

    fn text(&self) -> String {
        normalize_whitespace(&self.0.text().collect::<String>())
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.0.value().attr(name).map(str::to_string)
    }
}
