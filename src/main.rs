use std::path::Path;

use scholar_harvest::analyzer::KeywordExtractor;
use scholar_harvest::config::SearchSettings;
use scholar_harvest::fetcher::{Fetcher, SerpApiClient};
use scholar_harvest::pipeline;
use scholar_harvest::reporter::{TOP_KEYWORDS, format_top};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Bridge log crate -> tracing (so log::info! etc. work)
    tracing_log::LogTracer::init()?;

    let fetcher = Fetcher::new(SerpApiClient::from_config()?, SearchSettings::default());
    let extractor = KeywordExtractor::default();

    let report = pipeline::run(&fetcher, &extractor, Path::new(".")).await?;
    let filename = report
        .csv_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    println!("Results saved to {}", filename);
    println!(
        "Top 10 Keywords: {}",
        format_top(&report.frequencies.top(TOP_KEYWORDS))
    );
    Ok(())
}
