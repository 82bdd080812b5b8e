use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

static STOP_WORDS: OnceLock<HashSet<String>> = OnceLock::new();

/// Characters removed by the fallback tokenizer: ASCII punctuation.
const PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

fn get_stop_words() -> &'static HashSet<String> {
    STOP_WORDS.get_or_init(|| {
        stop_words::get(stop_words::LANGUAGE::English)
            .into_iter()
            .map(|x| x.to_string())
            .collect()
    })
}

pub fn is_stop_word(word: &str) -> bool {
    get_stop_words().contains(word)
}

#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("tokenizer unavailable: {0}")]
    Unavailable(String),
}

/// A character filter receives the original text and can transform it by adding, removing,
/// or changing characters before tokenization.
pub trait CharacterFilter: Send + Sync {
    fn filter(&self, text: String) -> String;
}

pub struct LowerCaseCharFilter;

impl CharacterFilter for LowerCaseCharFilter {
    fn filter(&self, text: String) -> String {
        text.to_lowercase()
    }
}

/// A tokenizer breaks text into individual tokens (usually words).
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizeError>;
}

/// Splits on Unicode word boundaries (UAX #29). Punctuation comes out as separate tokens,
/// except an intra-word hyphen, which keeps the compound whole:
/// "fault-tolerant." becomes ["fault-tolerant", "."].
pub struct WordBoundaryTokenizer;

fn is_word(segment: &str) -> bool {
    segment.chars().any(char::is_alphanumeric)
}

impl Tokenizer for WordBoundaryTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizeError> {
        let segments: Vec<&str> = text.split_word_bounds().collect();
        let mut tokens: Vec<String> = Vec::new();
        // last token is a word, or ends in a hyphen waiting for the next part
        let mut after_word = false;
        let mut open_hyphen = false;

        for (i, segment) in segments.iter().enumerate() {
            if segment.trim().is_empty() {
                after_word = false;
                open_hyphen = false;
                continue;
            }
            match tokens.last_mut() {
                Some(last) if open_hyphen && is_word(segment) => {
                    last.push_str(segment);
                    open_hyphen = false;
                    after_word = true;
                    continue;
                }
                Some(last)
                    if *segment == "-"
                        && after_word
                        && segments.get(i + 1).is_some_and(|next| is_word(next)) =>
                {
                    last.push('-');
                    open_hyphen = true;
                    continue;
                }
                _ => {}
            }
            tokens.push(segment.to_string());
            after_word = is_word(segment);
            open_hyphen = false;
        }

        Ok(tokens)
    }
}

/// Removes ASCII punctuation, then splits on whitespace. "fault-tolerant." becomes
/// ["faulttolerant"].
pub struct PunctuationStripTokenizer;

impl Tokenizer for PunctuationStripTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizeError> {
        let stripped: String = text.chars().filter(|c| !PUNCTUATION.contains(*c)).collect();
        Ok(stripped
            .split_whitespace()
            .map(|w| w.to_string())
            .collect::<Vec<String>>())
    }
}

/// A token filter receives the token stream and may add, remove, or change tokens.
pub trait TokenFilter: Send + Sync {
    fn filter(&self, tokens: Vec<String>) -> Vec<String>;
}

/// Keeps tokens made only of alphanumeric characters.
pub struct AlphanumericTokenFilter;

impl TokenFilter for AlphanumericTokenFilter {
    fn filter(&self, mut tokens: Vec<String>) -> Vec<String> {
        tokens.retain(|t| !t.is_empty() && t.chars().all(char::is_alphanumeric));
        tokens
    }
}

pub struct StopWordTokenFilter;

impl TokenFilter for StopWordTokenFilter {
    fn filter(&self, mut tokens: Vec<String>) -> Vec<String> {
        let stop_words = get_stop_words();
        tokens.retain(|w| !stop_words.contains(w));
        tokens
    }
}

/// Pure text analysis pipeline: character filters, a tokenizer with an optional
/// fallback, then token filters.
pub struct TextAnalyzer {
    char_filters: Vec<Box<dyn CharacterFilter>>,
    tokenizer: Box<dyn Tokenizer>,
    fallback_tokenizer: Option<Box<dyn Tokenizer>>,
    token_filters: Vec<Box<dyn TokenFilter>>,
}

impl TextAnalyzer {
    pub fn new(
        char_filters: Vec<Box<dyn CharacterFilter>>,
        tokenizer: Box<dyn Tokenizer>,
        token_filters: Vec<Box<dyn TokenFilter>>,
    ) -> Self {
        Self {
            char_filters,
            tokenizer,
            fallback_tokenizer: None,
            token_filters,
        }
    }

    /// Tokenizer used when the primary one returns an error.
    pub fn with_fallback(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.fallback_tokenizer = Some(tokenizer);
        self
    }

    pub fn char_filter(&self, mut content: String) -> String {
        for filter in self.char_filters.iter() {
            content = filter.filter(content);
        }
        content
    }

    pub fn tokenize(&self, content: &str) -> Result<Vec<String>, TokenizeError> {
        match self.tokenizer.tokenize(content) {
            Ok(tokens) => Ok(tokens),
            Err(e) => match &self.fallback_tokenizer {
                Some(fallback) => {
                    log::debug!("primary tokenizer failed, using fallback: {e}");
                    fallback.tokenize(content)
                }
                None => Err(e),
            },
        }
    }

    pub fn token_filter(&self, mut tokens: Vec<String>) -> Vec<String> {
        for filter in self.token_filters.iter() {
            tokens = filter.filter(tokens);
        }
        tokens
    }

    /// Analyzes raw content and returns the surviving tokens in text order.
    pub fn analyze(&self, raw_content: &str) -> Result<Vec<String>, TokenizeError> {
        let content = self.char_filter(raw_content.to_string());
        let tokens = self.tokenize(&content)?;
        Ok(self.token_filter(tokens))
    }
}

/// Turns a result snippet into its keyword list. Never fails: a broken
/// extraction is logged and yields no keywords.
pub struct KeywordExtractor {
    analyzer: TextAnalyzer,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(
            TextAnalyzer::new(
                vec![Box::new(LowerCaseCharFilter)],
                Box::new(WordBoundaryTokenizer),
                vec![Box::new(AlphanumericTokenFilter), Box::new(StopWordTokenFilter)],
            )
            .with_fallback(Box::new(PunctuationStripTokenizer)),
        )
    }
}

impl KeywordExtractor {
    pub fn new(analyzer: TextAnalyzer) -> Self {
        Self { analyzer }
    }

    pub fn extract(&self, snippet: &str) -> Vec<String> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.analyzer.analyze(snippet)));
        match outcome {
            Ok(Ok(keywords)) => keywords,
            Ok(Err(e)) => {
                log::warn!("error extracting keywords: {:#}", e);
                Vec::new()
            }
            Err(_) => {
                log::warn!("error extracting keywords: analyzer panicked");
                Vec::new()
            }
        }
    }
}
