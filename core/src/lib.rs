//! In-memory tf-idf search over a fixed document collection.
//!
//! The build pipeline runs once: load and normalize the corpus, build a
//! positional inverted index, then compute tf-idf weights and document norms.
//! A built [`Engine`] answers boolean (intersection) and ranked (cosine-like)
//! queries without further mutation.

pub mod corpus;
pub mod engine;
pub mod error;
pub mod index;
pub mod store;
pub mod tokenizer;
pub mod weights;

pub use corpus::{Corpus, CorpusSource, Document, RawDocument};
pub use engine::{Engine, RankConfig};
pub use error::{Error, Result};
pub use index::{InvertedIndex, PostingList};
pub use store::{CollectionDir, LoaderConfig};
pub use tokenizer::{Normalizer, EnglishNormalizer};
pub use weights::TfIdf;

pub type DocId = u32;
