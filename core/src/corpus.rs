use crate::error::{Error, Result};
use crate::tokenizer::Normalizer;
use crate::DocId;

/// A document as it comes out of a raw-text store.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub title: String,
    pub text: String,
}

/// A loaded, normalized document. Its id is its position in the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub tokens: Vec<String>,
}

/// Where documents come from: raw text that still needs normalizing, or a
/// pre-normalized store whose size is known in advance.
#[derive(Debug, Clone)]
pub enum CorpusSource {
    Raw(Vec<RawDocument>),
    Normalized {
        documents: Vec<(String, Vec<String>)>,
        expected: usize,
    },
}

/// Documents ordered by title. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    docs: Vec<Document>,
}

impl Corpus {
    pub fn load(source: CorpusSource, normalizer: &dyn Normalizer) -> Result<Self> {
        let mut docs: Vec<Document> = match source {
            CorpusSource::Normalized { documents, expected } => {
                if documents.len() != expected {
                    tracing::warn!(expected, found = documents.len(), "normalized store is stale or partial");
                    return Err(Error::CorpusIntegrity { expected, found: documents.len() });
                }
                documents
                    .into_iter()
                    .map(|(title, tokens)| Document { title, tokens })
                    .collect()
            }
            CorpusSource::Raw(raw) => raw
                .into_iter()
                .map(|doc| {
                    let tokens = normalizer.normalize(&doc.text);
                    tracing::debug!(title = %doc.title, tokens = tokens.len(), "normalized document");
                    Document { title: doc.title, tokens }
                })
                .collect(),
        };
        // stable: equal titles keep source order
        docs.sort_by(|a, b| a.title.cmp(&b.title));
        tracing::info!(num_docs = docs.len(), "loaded corpus");
        Ok(Self { docs })
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn get(&self, doc: DocId) -> Option<&Document> {
        self.docs.get(doc as usize)
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    /// Iterate `(doc id, document)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &Document)> + '_ {
        self.docs.iter().enumerate().map(|(i, d)| (i as DocId, d))
    }
}

/// Parse a pre-normalized document: whitespace-delimited tokens on each line,
/// all lines concatenated.
pub fn parse_normalized(text: &str) -> Vec<String> {
    text.lines()
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}
