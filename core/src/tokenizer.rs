use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-zA-Z0-9]").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

/// Maps raw text to a sequence of normalized terms.
///
/// Implementations must be deterministic. Any `Fn(&str) -> Vec<String>` is a
/// normalizer, which keeps test doubles to a single closure.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, text: &str) -> Vec<String>;
}

impl<F> Normalizer for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn normalize(&self, text: &str) -> Vec<String> {
        self(text)
    }
}

/// Lowercase, strip non-alphanumeric characters from each whitespace token,
/// drop empty tokens and stem with the Snowball English (Porter2) stemmer.
///
/// Porter2 differs from the classic Porter algorithm on some suffixes, so
/// stems are not byte-identical to a Porter-stemmed cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishNormalizer;

impl Normalizer for EnglishNormalizer {
    fn normalize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split_whitespace()
            .map(|tok| NON_ALNUM.replace_all(tok, ""))
            .filter(|tok| !tok.is_empty())
            .map(|tok| STEMMER.stem(&tok).into_owned())
            .collect()
    }
}
