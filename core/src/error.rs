use std::path::PathBuf;

use crate::DocId;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or querying an engine.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The collection does not hold the expected number of documents.
    #[error("corpus integrity check failed: expected {expected} documents, found {found}")]
    CorpusIntegrity { expected: usize, found: usize },
    /// Two raw files map to the same title and would share a cache file.
    #[error("duplicate document title {title:?}: {} and {}", first.display(), second.display())]
    DuplicateTitle { title: String, first: PathBuf, second: PathBuf },
    /// A query referenced a term that was never seen while indexing.
    #[error("term not indexed: {term:?}")]
    TermNotIndexed { term: String },
    /// A query was issued before the engine was built.
    #[error("engine has not been indexed yet")]
    NotIndexed,
    /// The engine was already built; a fresh instance is needed to reload.
    #[error("engine is already indexed; create a new engine to reload")]
    AlreadyIndexed,
    #[error("document {doc} out of range (corpus has {num_docs} documents)")]
    UnknownDocument { doc: DocId, num_docs: usize },
    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
