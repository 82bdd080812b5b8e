use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::data_models::{EnrichedRecord, SearchResult};

pub const COLUMNS: [&str; 5] = ["Title", "Snippet", "Link", "Cites_by", "Keywords"];
pub const TOP_KEYWORDS: usize = 10;

/// `"Byzantine Fault Tolerance"` -> `"byzantine_fault_tolerance_papers.csv"`.
pub fn output_filename(keyword: &str) -> String {
    format!("{}_papers.csv", keyword.to_lowercase().replace(' ', "_"))
}

/// Pairs ranked results with their keyword lists, position by position.
pub fn enrich(ranked: Vec<SearchResult>, keyword_lists: Vec<Vec<String>>) -> Vec<EnrichedRecord> {
    ranked
        .into_iter()
        .zip(keyword_lists)
        .map(|(result, keywords)| EnrichedRecord::new(result, keywords))
        .collect()
}

/// Writes the records as CSV, replacing any existing file. The header row is
/// written even when there are no records.
pub fn write_csv(path: &Path, records: &[EnrichedRecord]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;

    wtr.write_record(COLUMNS)
        .context("Failed to write CSV header")?;
    for record in records {
        wtr.serialize(record).context("Failed to write CSV record")?;
    }

    wtr.flush().context("Failed to flush CSV")?;
    Ok(())
}

/// Keyword occurrence counts, kept in first-encounter order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeywordFrequencyTable {
    counts: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl KeywordFrequencyTable {
    pub fn from_keyword_lists<'a, I>(lists: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut table = Self::default();
        for keyword in lists.into_iter().flatten() {
            if keyword.is_empty() {
                continue;
            }
            match table.index.get(keyword) {
                Some(&slot) => table.counts[slot].1 += 1,
                None => {
                    table.index.insert(keyword.clone(), table.counts.len());
                    table.counts.push((keyword.clone(), 1));
                }
            }
        }
        table
    }

    pub fn from_records(records: &[EnrichedRecord]) -> Self {
        Self::from_keyword_lists(records.iter().map(|r| r.keywords.as_slice()))
    }

    pub fn get(&self, keyword: &str) -> usize {
        self.index.get(keyword).map_or(0, |&slot| self.counts[slot].1)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `n` most frequent keywords. Equal counts keep first-encounter order.
    pub fn top(&self, n: usize) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> =
            self.counts.iter().map(|(k, c)| (k.as_str(), *c)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        entries
    }
}

/// `[('consensus', 12), ('byzantine', 9)]`
pub fn format_top(entries: &[(&str, usize)]) -> String {
    let pairs = entries
        .iter()
        .map(|(keyword, count)| format!("('{keyword}', {count})"))
        .collect::<Vec<String>>();
    format!("[{}]", pairs.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|l| l.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_output_filename() {
        assert_eq!(
            output_filename("Byzantine Fault Tolerance"),
            "byzantine_fault_tolerance_papers.csv"
        );
        assert_eq!(output_filename("pbft"), "pbft_papers.csv");
    }

    #[test]
    fn test_frequency_table() {
        let kw = lists(&[&["a", "b"], &["a"], &["b", "b"]]);
        let table = KeywordFrequencyTable::from_keyword_lists(kw.iter().map(Vec::as_slice));

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a"), 2);
        assert_eq!(table.get("b"), 3);
        assert_eq!(table.get("c"), 0);
        assert_eq!(table.top(TOP_KEYWORDS), vec![("b", 3), ("a", 2)]);
    }

    #[test]
    fn test_top_ties_keep_first_encounter_order() {
        let kw = lists(&[&["raft", "paxos"], &["pbft", "paxos", "raft", "hotstuff"]]);
        let table = KeywordFrequencyTable::from_keyword_lists(kw.iter().map(Vec::as_slice));
        assert_eq!(
            table.top(3),
            vec![("raft", 2), ("paxos", 2), ("pbft", 1)]
        );
    }

    #[test]
    fn test_top_caps_entries() {
        let words: Vec<String> = (0..15).map(|i| format!("kw{i}")).collect();
        let table = KeywordFrequencyTable::from_keyword_lists([words.as_slice()]);
        assert_eq!(table.top(TOP_KEYWORDS).len(), 10);
        assert_eq!(table.top(TOP_KEYWORDS)[0], ("kw0", 1));
    }

    #[test]
    fn test_empty_keywords_are_not_counted() {
        let kw = lists(&[&[""], &[]]);
        let table = KeywordFrequencyTable::from_keyword_lists(kw.iter().map(Vec::as_slice));
        assert!(table.is_empty());
        assert_eq!(format_top(&table.top(TOP_KEYWORDS)), "[]");
    }

    #[test]
    fn test_format_top() {
        assert_eq!(
            format_top(&[("byzantine", 3), ("consensus", 1)]),
            "[('byzantine', 3), ('consensus', 1)]"
        );
    }

    #[test]
    fn test_enrich_keeps_ranked_order() {
        let ranked = vec![
            SearchResult::new("high", "s", Some("https://a"), 9),
            SearchResult::new("low", "s", None, 1),
        ];
        let records = enrich(ranked, lists(&[&["x"], &[]]));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "high");
        assert_eq!(records[0].keywords, vec!["x".to_string()]);
        assert_eq!(records[1].link, "No link");
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(output_filename("Byzantine Fault Tolerance"));
        let records = enrich(
            vec![SearchResult::new("PBFT, revisited", "a \"quoted\" snippet", Some("https://a"), 7)],
            lists(&[&["pbft", "revisited"]]),
        );

        write_csv(&path, &records).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, COLUMNS);
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "PBFT, revisited");
        assert_eq!(&rows[0][1], "a \"quoted\" snippet");
        assert_eq!(&rows[0][2], "https://a");
        assert_eq!(&rows[0][3], "7");
        assert_eq!(&rows[0][4], "pbft, revisited");
    }

    #[test]
    fn test_write_csv_empty_has_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty_papers.csv");
        write_csv(&path, &[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), "Title,Snippet,Link,Cites_by,Keywords");
    }
}
