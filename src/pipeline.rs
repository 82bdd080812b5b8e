use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::analyzer::KeywordExtractor;
use crate::data_models::EnrichedRecord;
use crate::fetcher::{Fetcher, ScholarSource};
use crate::ranker::rank_by_citations;
use crate::reporter::{self, KeywordFrequencyTable};

/// What a harvest run produced.
#[derive(Debug)]
pub struct HarvestReport {
    pub csv_path: PathBuf,
    pub records: Vec<EnrichedRecord>,
    pub frequencies: KeywordFrequencyTable,
}

/// fetch -> rank -> extract -> persist. Only writing the CSV file can fail.
pub async fn run<S: ScholarSource>(
    fetcher: &Fetcher<S>,
    extractor: &KeywordExtractor,
    output_dir: &Path,
) -> Result<HarvestReport> {
    let fetched = fetcher.fetch_all().await;
    log::info!("fetched {} papers", fetched.len());

    let ranked = rank_by_citations(fetched);
    let keyword_lists: Vec<Vec<String>> = ranked
        .iter()
        .map(|result| extractor.extract(&result.snippet))
        .collect();
    let records = reporter::enrich(ranked, keyword_lists);

    let csv_path = output_dir.join(reporter::output_filename(&fetcher.settings().keyword));
    reporter::write_csv(&csv_path, &records)?;

    let frequencies = KeywordFrequencyTable::from_records(&records);
    Ok(HarvestReport {
        csv_path,
        records,
        frequencies,
    })
}
