// ABOUTME: ExtractionPipeline: readiness, lazy loading, selector resolution, record extraction, assembly.
// ABOUTME: Owns the page for the run and closes it on every exit path; only navigation failures escape.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::dom::{DocumentHandle, Snapshot};
use crate::error::HarvestError;
use crate::extractors::fields::FieldExtractor;
use crate::extractors::record::RecordExtractor;
use crate::extractors::resolve::SelectorResolver;
use crate::lazy_load::LazyLoadTrigger;
use crate::navigator::Navigator;
use crate::options::{Options, PipelineBuilder, RecordDetail};
use crate::page::LivePage;
use crate::persist::Persister;
use crate::result::{ExtractionResult, RecordSet};

/// One configured extraction run over a single feed page.
#[derive(Debug, Clone)]
pub struct ExtractionPipeline {
    opts: Options,
    fields: FieldExtractor,
}

impl ExtractionPipeline {
    /// Create a new PipelineBuilder for configuring the pipeline.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Create a pipeline from already-validated options.
    pub fn new(opts: Options) -> Self {
        let fields = FieldExtractor::new(&opts.profile);
        Self { opts, fields }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// The profile's default target URL.
    pub fn default_url(&self) -> &str {
        &self.opts.profile.url
    }

    /// Runs the full pipeline against `page`, then closes it.
    ///
    /// The page is closed whether the run succeeds or fails; a failed close
    /// is logged and does not change the outcome.
    pub async fn run<P: LivePage>(
        &self,
        page: P,
        url: &str,
    ) -> Result<ExtractionResult, HarvestError> {
        let outcome = self.run_on(&page, url).await;
        if let Err(e) = page.close().await {
            warn!(url, error = %e, "failed to release page");
        }
        outcome
    }

    /// Runs the pipeline and hands the result to `persister`.
    ///
    /// Returns the result together with the location reported by the persister.
    pub async fn run_and_persist<P: LivePage>(
        &self,
        page: P,
        url: &str,
        persister: &dyn Persister,
    ) -> Result<(ExtractionResult, String), HarvestError> {
        let result = self.run(page, url).await?;
        let location = persister.persist(&result)?;
        Ok((result, location))
    }

    /// Runs every stage against a borrowed page without closing it.
    pub async fn run_on<P: LivePage + ?Sized>(
        &self,
        page: &P,
        url: &str,
    ) -> Result<ExtractionResult, HarvestError> {
        Navigator::new(&self.opts).ensure_ready(page, url).await?;
        LazyLoadTrigger::new(&self.opts)
            .materialize_content(page)
            .await;

        let page_title = match page.title().await {
            Ok(title) => title,
            Err(e) => {
                warn!(url, error = %e, "could not read page title");
                String::new()
            }
        };
        let html = match page.content().await {
            Ok(html) => html,
            Err(e) => {
                warn!(url, error = %e, "could not capture document; reporting no records");
                String::new()
            }
        };

        Ok(self.extract_html(&html, url, &page_title))
    }

    /// Extracts from captured HTML. `page_title` falls back to the document `<title>`.
    pub fn extract_html(&self, html: &str, url: &str, page_title: &str) -> ExtractionResult {
        let doc = Snapshot::parse(html);
        let title = if page_title.is_empty() {
            doc.title().unwrap_or_default()
        } else {
            page_title.to_string()
        };
        self.extract_document(&doc, url, &title, Utc::now())
    }

    /// Resolves containers and assembles the result from any document.
    pub fn extract_document<D: DocumentHandle>(
        &self,
        doc: &D,
        url: &str,
        page_title: &str,
        captured_at: DateTime<Utc>,
    ) -> ExtractionResult {
        let limit = self.opts.record_limit;
        let resolution =
            SelectorResolver::new(&self.fields).resolve(doc, &self.opts.profile.candidates, limit);
        let containers = resolution.containers();
        let records = RecordExtractor::new(&self.fields).extract(containers, limit);

        let records = match self.opts.detail {
            RecordDetail::Full => RecordSet::Records(records),
            RecordDetail::Titles => RecordSet::SampleTitles(
                records
                    .into_iter()
                    .filter(|r| r.has_title())
                    .map(|r| r.title)
                    .collect(),
            ),
        };
        let record_count = records.len();

        info!(
            url,
            selector = resolution.pattern().unwrap_or("none"),
            containers = containers.len(),
            records = record_count,
            "extraction complete"
        );

        ExtractionResult {
            url: url.to_string(),
            page_title: page_title.to_string(),
            selector_used: resolution.pattern().map(str::to_string),
            record_count,
            containers_found: containers.len(),
            records,
            captured_at,
        }
    }
}
