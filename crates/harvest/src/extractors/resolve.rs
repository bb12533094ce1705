// ABOUTME: Ordered candidate-selector resolution: first structurally and semantically valid match wins.
// ABOUTME: Returns a tagged Resolution rather than mutating shared counters across attempts.

//! Selector resolution.
//!
//! Candidates are tried strictly in order. A candidate is accepted when it
//! matches at least one container and at least one of the first `limit`
//! containers (the ones that become records) still holds a title sub-element. The second check rejects selectors that match
//! containers whose inner layout has drifted. Candidates after the accepted one
//! are never queried.

use tracing::{debug, info};

use crate::dom::DocumentHandle;
use crate::extractors::fields::FieldExtractor;

/// Outcome of resolving a candidate list against a document.
#[derive(Debug)]
pub enum Resolution<E> {
    Matched { pattern: String, containers: Vec<E> },
    Exhausted,
}

impl<E> Resolution<E> {
    /// The accepted pattern, if any.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Resolution::Matched { pattern, .. } => Some(pattern),
            Resolution::Exhausted => None,
        }
    }

    /// The matched containers; empty when exhausted.
    pub fn containers(&self) -> &[E] {
        match self {
            Resolution::Matched { containers, .. } => containers,
            Resolution::Exhausted => &[],
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Resolution::Exhausted)
    }
}

/// Picks the first candidate pattern that yields titled containers.
#[derive(Debug, Clone, Copy)]
pub struct SelectorResolver<'f> {
    fields: &'f FieldExtractor,
}

impl<'f> SelectorResolver<'f> {
    pub fn new(fields: &'f FieldExtractor) -> Self {
        Self { fields }
    }

    pub fn resolve<'d, D, S>(
        &self,
        doc: &'d D,
        candidates: &[S],
        limit: usize,
    ) -> Resolution<D::Element<'d>>
    where
        D: DocumentHandle,
        S: AsRef<str>,
    {
        candidates
            .iter()
            .enumerate()
            .find_map(|(index, pattern)| self.attempt(doc, index, pattern.as_ref(), limit))
            .unwrap_or_else(|| {
                info!(candidates = candidates.len(), "no candidate selector matched");
                Resolution::Exhausted
            })
    }

    fn attempt<'d, D: DocumentHandle>(
        &self,
        doc: &'d D,
        index: usize,
        pattern: &str,
        limit: usize,
    ) -> Option<Resolution<D::Element<'d>>> {
        let containers = doc.query_all(pattern);
        if containers.is_empty() {
            debug!(index, pattern, "candidate matched no containers");
            return None;
        }

        let titled = containers
            .iter()
            .take(limit)
            .filter(|c| self.fields.title_opt(*c).is_some())
            .count();
        if titled == 0 {
            debug!(
                index,
                pattern,
                containers = containers.len(),
                limit,
                "candidate containers hold no titles within the record limit"
            );
            return None;
        }

        info!(
            index,
            pattern,
            containers = containers.len(),
            titled,
            "found records using selector"
        );
        Some(Resolution::Matched {
            pattern: pattern.to_string(),
            containers,
        })
    }
}
