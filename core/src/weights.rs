use std::collections::HashMap;

use crate::index::InvertedIndex;
use crate::DocId;

/// tf-idf weights per (term, document) plus the L2 norm of every document's
/// weight vector.
///
/// `tf = log10(count)`, `idf = log10(N / df)`, `weight = (1 + tf) * idf`.
/// A term present in every document has idf 0 and therefore weight 0.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TfIdf {
    weights: HashMap<String, HashMap<DocId, f64>>,
    norms: Vec<f64>,
}

impl TfIdf {
    pub fn compute(index: &InvertedIndex, num_docs: usize) -> Self {
        let n = num_docs as f64;
        let mut weights: HashMap<String, HashMap<DocId, f64>> = HashMap::with_capacity(index.len());
        let mut sq_norms = vec![0.0f64; num_docs];
        for (term, postings) in index.iter() {
            let idf = (n / postings.len() as f64).log10();
            let per_doc = weights.entry(term.to_string()).or_default();
            for (&doc_id, positions) in postings {
                let tf = (positions.len() as f64).log10();
                let w = (1.0 + tf) * idf;
                per_doc.insert(doc_id, w);
                sq_norms[doc_id as usize] += w * w;
            }
        }
        let norms = sq_norms.into_iter().map(f64::sqrt).collect();
        tracing::info!(num_terms = weights.len(), num_docs, "computed tf-idf weights");
        Self { weights, norms }
    }

    /// Stored weight, or `None` when the term does not occur in `doc` (or is
    /// unknown). Callers decide whether absence means zero.
    pub fn weight(&self, term: &str, doc: DocId) -> Option<f64> {
        self.weights.get(term)?.get(&doc).copied()
    }

    pub fn term_weights(&self, term: &str) -> Option<&HashMap<DocId, f64>> {
        self.weights.get(term)
    }

    /// 0.0 for documents with no weighted terms.
    pub fn norm(&self, doc: DocId) -> Option<f64> {
        self.norms.get(doc as usize).copied()
    }

    pub fn norms(&self) -> &[f64] {
        &self.norms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Corpus, CorpusSource};
    use crate::tokenizer::EnglishNormalizer;

    fn weights(docs: &[&str]) -> TfIdf {
        let documents = docs
            .iter()
            .enumerate()
            .map(|(i, body)| (format!("d{i}"), body.split_whitespace().map(str::to_string).collect()))
            .collect::<Vec<_>>();
        let expected = documents.len();
        let corpus = Corpus::load(CorpusSource::Normalized { documents, expected }, &EnglishNormalizer).unwrap();
        TfIdf::compute(&InvertedIndex::build(&corpus), corpus.len())
    }

    #[test]
    fn log_tf_and_idf() {
        // "a" occurs 10 times in d0 and nowhere else among 10 docs
        let mut docs = vec!["a a a a a a a a a a"];
        docs.extend(std::iter::repeat("b").take(9));
        let w = weights(&docs);
        let got = w.weight("a", 0).unwrap();
        assert!((got - 2.0).abs() < 1e-9, "got {got}");
        assert!(w.weight("a", 1).is_none());
    }

    #[test]
    fn ubiquitous_term_has_zero_weight() {
        let w = weights(&["x x x y", "x z"]);
        assert_eq!(w.weight("x", 0), Some(0.0));
        assert_eq!(w.weight("x", 1), Some(0.0));
    }

    #[test]
    fn norm_is_l2_of_weights() {
        let w = weights(&["p q q", "q r", "s"]);
        let expected = (w.weight("p", 0).unwrap().powi(2) + w.weight("q", 0).unwrap().powi(2)).sqrt();
        assert!((w.norm(0).unwrap() - expected).abs() < 1e-4);
    }
}
