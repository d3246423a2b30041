use std::collections::{BTreeSet, HashMap};

use crate::corpus::{Corpus, CorpusSource, Document};
use crate::error::{Error, Result};
use crate::index::{InvertedIndex, PostingList};
use crate::tokenizer::{Normalizer, EnglishNormalizer};
use crate::weights::TfIdf;
use crate::DocId;

/// Ranking knobs.
#[derive(Debug, Clone, Copy)]
pub struct RankConfig {
    /// Number of documents returned by a ranked query.
    pub top_k: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self { top_k: 10 }
    }
}

#[derive(Debug)]
struct Built {
    corpus: Corpus,
    index: InvertedIndex,
    tfidf: TfIdf,
}

#[derive(Debug)]
enum State {
    Unbuilt,
    Built(Box<Built>),
}

/// Search engine over one document collection.
///
/// Starts unbuilt; [`Engine::index`] loads the corpus, builds the inverted
/// index and computes weights. The transition is one-way. Query methods take
/// `&self` and never mutate, so a built engine can be shared across threads.
#[derive(Debug)]
pub struct Engine<N = EnglishNormalizer> {
    normalizer: N,
    config: RankConfig,
    state: State,
}

impl Engine<EnglishNormalizer> {
    pub fn new() -> Self {
        Self::with_normalizer(EnglishNormalizer)
    }
}

impl Default for Engine<EnglishNormalizer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Normalizer> Engine<N> {
    pub fn with_normalizer(normalizer: N) -> Self {
        Self { normalizer, config: RankConfig::default(), state: State::Unbuilt }
    }

    pub fn with_config(mut self, config: RankConfig) -> Self {
        self.config = config;
        self
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self.state, State::Built(_))
    }

    /// Load → index → weight. On failure the engine stays unbuilt and should
    /// be discarded.
    pub fn index(&mut self, source: CorpusSource) -> Result<()> {
        if self.is_indexed() {
            return Err(Error::AlreadyIndexed);
        }
        let corpus = Corpus::load(source, &self.normalizer)?;
        let index = InvertedIndex::build(&corpus);
        let tfidf = TfIdf::compute(&index, corpus.len());
        self.state = State::Built(Box::new(Built { corpus, index, tfidf }));
        Ok(())
    }

    fn built(&self) -> Result<&Built> {
        match &self.state {
            State::Built(b) => Ok(b),
            State::Unbuilt => Err(Error::NotIndexed),
        }
    }

    pub fn num_docs(&self) -> Result<usize> {
        Ok(self.built()?.corpus.len())
    }

    pub fn documents(&self) -> Result<&[Document]> {
        Ok(self.built()?.corpus.documents())
    }

    pub fn title(&self, doc: DocId) -> Result<&str> {
        let b = self.built()?;
        b.corpus
            .get(doc)
            .map(|d| d.title.as_str())
            .ok_or(Error::UnknownDocument { doc, num_docs: b.corpus.len() })
    }

    /// Distinct terms, sorted.
    pub fn vocabulary(&self) -> Result<Vec<&str>> {
        let mut vocab: Vec<&str> = self.built()?.index.vocabulary().collect();
        vocab.sort_unstable();
        Ok(vocab)
    }

    pub fn get_postings(&self, term: &str) -> Result<&PostingList> {
        self.built()?
            .index
            .postings(term)
            .ok_or_else(|| Error::TermNotIndexed { term: term.to_string() })
    }

    /// Weight of `term` in `doc`; 0.0 when the term is known but does not
    /// occur in the document.
    pub fn get_weight(&self, term: &str, doc: DocId) -> Result<f64> {
        let b = self.built()?;
        if b.corpus.get(doc).is_none() {
            return Err(Error::UnknownDocument { doc, num_docs: b.corpus.len() });
        }
        if !b.index.contains(term) {
            return Err(Error::TermNotIndexed { term: term.to_string() });
        }
        Ok(match b.tfidf.weight(term, doc) {
            Some(w) => w,
            None => 0.0,
        })
    }

    pub fn doc_norm(&self, doc: DocId) -> Result<f64> {
        let b = self.built()?;
        b.tfidf
            .norm(doc)
            .ok_or(Error::UnknownDocument { doc, num_docs: b.corpus.len() })
    }

    /// Postings for an unnormalized word, e.g. "Running" looks up "run".
    pub fn postings_for_word(&self, word: &str) -> Result<&PostingList> {
        let term = self.single_term(word)?;
        self.get_postings(&term)
    }

    pub fn weight_for_word(&self, word: &str, doc: DocId) -> Result<f64> {
        let term = self.single_term(word)?;
        self.get_weight(&term, doc)
    }

    fn single_term(&self, word: &str) -> Result<String> {
        self.normalizer
            .normalize(word)
            .into_iter()
            .next()
            .ok_or_else(|| Error::TermNotIndexed { term: word.to_string() })
    }

    /// Documents containing every term. An unknown term fails the whole query;
    /// an empty term list matches every document.
    pub fn boolean_query<S: AsRef<str>>(&self, terms: &[S]) -> Result<BTreeSet<DocId>> {
        let b = self.built()?;
        let mut lists = Vec::with_capacity(terms.len());
        for term in terms {
            let term = term.as_ref();
            let postings = b
                .index
                .postings(term)
                .ok_or_else(|| Error::TermNotIndexed { term: term.to_string() })?;
            lists.push(postings);
        }
        // intersect starting from the rarest term
        lists.sort_by_key(|p| p.len());
        let mut result: BTreeSet<DocId> = match lists.first() {
            Some(first) => first.keys().copied().collect(),
            None => (0..b.corpus.len() as DocId).collect(),
        };
        for postings in lists.iter().skip(1) {
            result.retain(|d| postings.contains_key(d));
            if result.is_empty() {
                break;
            }
        }
        tracing::debug!(terms = terms.len(), hits = result.len(), "boolean query");
        Ok(result)
    }

    /// Normalize `text` and run it as a boolean query.
    pub fn boolean_query_text(&self, text: &str) -> Result<BTreeSet<DocId>> {
        let terms = self.normalizer.normalize(text);
        self.boolean_query(&terms[..])
    }

    /// Top documents for a free-text query, score descending, ties by
    /// ascending doc id.
    pub fn rank_query(&self, text: &str) -> Result<Vec<(DocId, f64)>> {
        let terms = self.normalizer.normalize(text);
        self.rank_terms(&terms[..])
    }

    /// Ranked retrieval over already-normalized terms.
    ///
    /// Query weight is `log10(count) + 1` per distinct term. Each document
    /// scores `Σ qw(t) * w(t, d) / norm(d)`; unknown terms and terms missing
    /// from a document contribute nothing.
    pub fn rank_terms<S: AsRef<str>>(&self, terms: &[S]) -> Result<Vec<(DocId, f64)>> {
        let b = self.built()?;
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for term in terms {
            *counts.entry(term.as_ref()).or_insert(0) += 1;
        }

        let mut dots = vec![0.0f64; b.corpus.len()];
        for (term, count) in &counts {
            let qw = (*count as f64).log10() + 1.0;
            let Some(per_doc) = b.tfidf.term_weights(term) else {
                tracing::debug!(term = %term, "query term not in vocabulary; contributes zero");
                continue;
            };
            for (&doc_id, w) in per_doc {
                dots[doc_id as usize] += qw * w;
            }
        }

        let mut scored: Vec<(DocId, f64)> = dots
            .into_iter()
            .zip(b.tfidf.norms())
            .enumerate()
            .map(|(doc_id, (dot, &norm))| {
                let score = if norm > 0.0 { dot / norm } else { 0.0 };
                (doc_id as DocId, score)
            })
            .collect();
        scored.sort_unstable_by(|x, y| y.1.total_cmp(&x.1).then_with(|| x.0.cmp(&y.0)));
        scored.truncate(self.config.top_k);
        tracing::debug!(terms = counts.len(), returned = scored.len(), "ranked query");
        Ok(scored)
    }
}
