// ABOUTME: Record extraction components: per-field extraction, record building, selector resolution.
// ABOUTME: All of them are total over a document snapshot and never fail a run.

//! Extraction module.
//!
//! Submodules:
//! - `fields`: one accessor per record field, each with a sentinel fallback.
//! - `record`: the `VideoRecord` model and the bounded `RecordExtractor`.
//! - `resolve`: ordered candidate-selector resolution.

pub mod fields;
pub mod record;
pub mod resolve;
