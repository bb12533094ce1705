// ABOUTME: Main library entry point for the harvest feed extractor.
// ABOUTME: Re-exports the public API: ExtractionPipeline, PipelineBuilder, ExtractionResult, HarvestError, drivers.

//! Harvest - extracts video records from a dynamically rendered feed page.
//!
//! A run loads the page, waits for it to be ready, scrolls so lazily
//! rendered items appear, then resolves which of several candidate selectors
//! matches the record containers and reads a bounded number of records from
//! them. Missing fields degrade to sentinel values instead of failing.
//!
//! # Example
//!
//! ```no_run
//! use digests_harvest::{ExtractionPipeline, HarvestError, StaticPage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), HarvestError> {
//!     let pipeline = ExtractionPipeline::builder().record_limit(5).build()?;
//!     let page = StaticPage::new(pipeline.options())?;
//!     let result = pipeline.run(page, "https://www.youtube.com/").await?;
//!     println!("{}", result.format_summary());
//!     Ok(())
//! }
//! ```

pub mod dom;
pub mod error;
pub mod extractors;
pub mod lazy_load;
pub mod navigator;
pub mod options;
pub mod page;
pub mod persist;
pub mod pipeline;
pub mod profile;
pub mod resource;
pub mod result;

pub use crate::error::{ErrorCode, HarvestError};
pub use crate::extractors::fields::FieldExtractor;
pub use crate::extractors::record::{RecordExtractor, VideoRecord};
pub use crate::extractors::resolve::{Resolution, SelectorResolver};
pub use crate::lazy_load::LazyLoadTrigger;
pub use crate::navigator::{Navigator, ReadySignal};
pub use crate::options::{Options, PipelineBuilder, ReadinessMode, RecordDetail, Viewport};
#[cfg(feature = "chrome")]
pub use crate::page::ChromePage;
pub use crate::page::{LivePage, StaticPage};
pub use crate::persist::{JsonFilePersister, Persister};
pub use crate::pipeline::ExtractionPipeline;
pub use crate::profile::loader::{load_builtin_profile, load_profile_file};
pub use crate::profile::FeedProfile;
pub use crate::result::{ExtractionResult, RecordSet};
