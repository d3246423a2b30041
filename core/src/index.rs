use std::collections::{BTreeMap, HashMap};

use crate::corpus::Corpus;
use crate::DocId;

/// Doc id -> ascending token positions of a term within that document.
pub type PostingList = BTreeMap<DocId, Vec<u32>>;

/// Positional inverted index. Built once, read-only afterwards.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InvertedIndex {
    postings: HashMap<String, PostingList>,
}

impl InvertedIndex {
    /// Single pass over every document; positions are appended in scan order
    /// so each position list is already sorted.
    pub fn build(corpus: &Corpus) -> Self {
        let mut postings: HashMap<String, PostingList> = HashMap::new();
        for (doc_id, doc) in corpus.iter() {
            for (pos, term) in doc.tokens.iter().enumerate() {
                postings
                    .entry(term.clone())
                    .or_default()
                    .entry(doc_id)
                    .or_default()
                    .push(pos as u32);
            }
        }
        tracing::info!(num_terms = postings.len(), "built inverted index");
        Self { postings }
    }

    pub fn postings(&self, term: &str) -> Option<&PostingList> {
        self.postings.get(term)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    /// Number of distinct documents containing `term`.
    pub fn doc_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, BTreeMap::len)
    }

    pub fn vocabulary(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PostingList)> + '_ {
        self.postings.iter().map(|(t, p)| (t.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}
