// ABOUTME: CLI binary for the harvest feed extractor.
// ABOUTME: Runs the pipeline against a live URL or a saved HTML file and prints or saves the result.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use digests_harvest::{
    load_profile_file, ExtractionPipeline, ExtractionResult, HarvestError, JsonFilePersister,
    LivePage, Persister, PipelineBuilder, ReadinessMode, RecordDetail, StaticPage,
};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Driver {
    /// Plain HTTP fetch, no script execution
    Static,
    /// Headless Chromium (requires the "chrome" feature)
    Chrome,
}

#[derive(Parser, Debug)]
#[command(name = "harvest")]
#[command(about = "Extract video records from a dynamically rendered feed page")]
struct Args {
    /// Page to extract from (default: the profile's URL)
    #[arg()]
    url: Option<String>,

    /// Extract from a saved HTML file instead of loading the URL
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// Page driver
    #[arg(long = "driver", value_enum, default_value = "static")]
    driver: Driver,

    /// Feed profile JSON (default: built-in YouTube home profile)
    #[arg(long = "profile")]
    profile: Option<PathBuf>,

    /// Candidate container selector, tried in the order given (repeatable)
    #[arg(long = "selector")]
    selectors: Vec<String>,

    /// Maximum number of records to extract
    #[arg(long = "limit", default_value_t = 10)]
    limit: usize,

    /// Number of scroll rounds
    #[arg(long = "rounds", default_value_t = 3)]
    rounds: u32,

    /// Pixels scrolled per round
    #[arg(long = "scroll-step", default_value_t = 1000)]
    scroll_step: u32,

    /// Settle delay after each scroll round, in ms
    #[arg(long = "settle-ms", default_value_t = 1000)]
    settle_ms: u64,

    /// Extra pause after the last scroll round, in ms
    #[arg(long = "final-settle-ms", default_value_t = 3000)]
    final_settle_ms: u64,

    /// Readiness condition: selector or network-idle
    #[arg(long = "readiness", default_value = "selector")]
    readiness: String,

    /// Readiness timeout in seconds
    #[arg(long = "timeout", default_value_t = 30)]
    timeout: u64,

    /// Keep only record titles in the output
    #[arg(long = "titles-only")]
    titles_only: bool,

    /// Write the JSON result to this file
    #[arg(short = 'o', long = "output", conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Write the JSON result to a timestamped file in this directory
    #[arg(long = "out-dir")]
    out_dir: Option<PathBuf>,

    /// Print the JSON result instead of the summary
    #[arg(long = "json")]
    json_output: bool,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// Show the browser window (chrome driver only)
    #[arg(long = "headful")]
    headful: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn configure(args: &Args) -> Result<ExtractionPipeline, HarvestError> {
    let mut builder = PipelineBuilder::new()
        .readiness_mode(ReadinessMode::from(args.readiness.as_str()))
        .readiness_timeout(Duration::from_secs(args.timeout))
        .record_limit(args.limit)
        .scroll_rounds(args.rounds)
        .scroll_step(args.scroll_step)
        .settle_delay(Duration::from_millis(args.settle_ms))
        .final_settle(Duration::from_millis(args.final_settle_ms))
        .headless(!args.headful);

    if let Some(path) = &args.profile {
        builder = builder.profile(load_profile_file(path)?);
    }
    if !args.selectors.is_empty() {
        builder = builder.candidates(args.selectors.iter().cloned());
    }
    if args.titles_only {
        builder = builder.detail(RecordDetail::Titles);
    }
    builder.build()
}

async fn run_with<P: LivePage>(
    pipeline: &ExtractionPipeline,
    page: P,
    url: &str,
    persister: Option<&dyn Persister>,
) -> Result<(ExtractionResult, Option<String>), HarvestError> {
    match persister {
        Some(persister) => {
            let (result, location) = pipeline.run_and_persist(page, url, persister).await?;
            Ok((result, Some(location)))
        }
        None => Ok((pipeline.run(page, url).await?, None)),
    }
}

async fn execute(
    args: &Args,
    pipeline: &ExtractionPipeline,
    url: &str,
) -> Result<(ExtractionResult, Option<String>), HarvestError> {
    let persister: Option<JsonFilePersister> = match (&args.output, &args.out_dir) {
        (Some(path), _) => Some(JsonFilePersister::to_path(path)),
        (None, Some(dir)) => Some(JsonFilePersister::in_dir(dir, "youtube_data")),
        (None, None) => None,
    };
    let persister = persister.as_ref().map(|p| p as &dyn Persister);

    if let Some(html_path) = &args.html {
        let html = fs::read_to_string(html_path).map_err(|e| {
            HarvestError::config(
                "ReadHtml",
                Some(anyhow::anyhow!("reading {}: {}", html_path.display(), e)),
            )
        })?;
        return run_with(pipeline, StaticPage::from_html(html), url, persister).await;
    }

    match args.driver {
        Driver::Static => {
            let page = StaticPage::new(pipeline.options())?;
            run_with(pipeline, page, url, persister).await
        }
        #[cfg(feature = "chrome")]
        Driver::Chrome => {
            let page = digests_harvest::ChromePage::launch(pipeline.options()).await?;
            run_with(pipeline, page, url, persister).await
        }
        #[cfg(not(feature = "chrome"))]
        Driver::Chrome => Err(HarvestError::config(
            "SelectDriver",
            Some(anyhow::anyhow!(
                "the chrome driver is not compiled in; rebuild with --features chrome"
            )),
        )),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let pipeline = match configure(&args) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };
    let url = args
        .url
        .clone()
        .unwrap_or_else(|| pipeline.default_url().to_string());

    let start = Instant::now();
    let outcome = execute(&args, &pipeline, &url).await;
    let elapsed = start.elapsed();

    let code = match outcome {
        Ok((result, location)) => {
            if args.json_output {
                match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("error serializing result: {}", e),
                }
            } else {
                println!("{}", result.format_summary());
            }
            if let Some(location) = location {
                let _ = writeln!(io::stderr(), "Data saved to {}", location);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    };

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }
    code
}
