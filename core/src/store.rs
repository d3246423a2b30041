use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use walkdir::WalkDir;

use crate::corpus::{parse_normalized, CorpusSource, Document, RawDocument};
use crate::error::{Error, Result};

lazy_static! {
    static ref RAW_TITLE: Regex = Regex::new(r"^(.*) \d+\.txt$").expect("valid regex");
}

/// How a collection directory is read.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Document count the collection must hold, checked on the raw files and
    /// on the normalized cache. `None` skips the check.
    pub expected_docs: Option<usize>,
    /// Write the normalized cache after reading raw documents.
    pub write_cache: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { expected_docs: Some(60), write_cache: true }
    }
}

/// A collection on disk: `raw/<title> <n>.txt` documents and an optional
/// `stemmed/<title>.txt` cache of already-normalized tokens.
#[derive(Debug, Clone)]
pub struct CollectionDir {
    root: PathBuf,
    config: LoaderConfig,
}

impl CollectionDir {
    pub fn new<P: AsRef<Path>>(root: P, config: LoaderConfig) -> Self {
        Self { root: root.as_ref().to_path_buf(), config }
    }

    fn raw_dir(&self) -> PathBuf {
        self.root.join("raw")
    }

    fn cache_dir(&self) -> PathBuf {
        self.root.join("stemmed")
    }

    pub fn has_cache(&self) -> bool {
        self.cache_dir().is_dir()
    }

    /// Read the normalized cache if present, otherwise the raw documents.
    pub fn read(&self) -> Result<CorpusSource> {
        if self.has_cache() {
            tracing::info!(dir = %self.cache_dir().display(), "reading normalized cache");
            let mut documents = Vec::new();
            for path in text_files(&self.cache_dir())? {
                let title = file_title(&path);
                let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
                documents.push((title, parse_normalized(&text)));
            }
            let expected = self.config.expected_docs.unwrap_or(documents.len());
            Ok(CorpusSource::Normalized { documents, expected })
        } else {
            tracing::info!(dir = %self.raw_dir().display(), "reading raw documents");
            let mut documents = Vec::new();
            let mut seen: HashMap<String, PathBuf> = HashMap::new();
            for path in text_files(&self.raw_dir())? {
                let title = raw_title(&path);
                // cache files are keyed by title
                if let Some(first) = seen.insert(title.clone(), path.clone()) {
                    return Err(Error::DuplicateTitle { title, first, second: path });
                }
                let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
                documents.push(RawDocument { title, text });
            }
            if let Some(expected) = self.config.expected_docs {
                if documents.len() != expected {
                    tracing::warn!(expected, found = documents.len(), "raw collection has the wrong size");
                    return Err(Error::CorpusIntegrity { expected, found: documents.len() });
                }
            }
            Ok(CorpusSource::Raw(documents))
        }
    }

    /// Write `stemmed/<title>.txt` for every document unless the cache already
    /// exists or caching is disabled. Returns whether anything was written.
    pub fn write_cache(&self, docs: &[Document]) -> Result<bool> {
        if !self.config.write_cache || self.has_cache() {
            return Ok(false);
        }
        let dir = self.cache_dir();
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        for doc in docs {
            let path = dir.join(format!("{}.txt", doc.title));
            let f = File::create(&path).map_err(|e| Error::io(&path, e))?;
            let mut w = BufWriter::new(f);
            if !doc.tokens.is_empty() {
                writeln!(w, "{}", doc.tokens.join(" ")).map_err(|e| Error::io(&path, e))?;
            }
            w.flush().map_err(|e| Error::io(&path, e))?;
        }
        tracing::info!(dir = %dir.display(), num_docs = docs.len(), "wrote normalized cache");
        Ok(true)
    }
}

/// Visible `.txt` files directly inside `dir`, sorted by file name.
fn text_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
            Error::io(path, e.into())
        })?;
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_file() && name.ends_with(".txt") && !name.starts_with('.') {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

fn file_title(path: &Path) -> String {
    path.file_stem().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

/// `"She 12.txt"` -> `"She"`; names without a trailing number fall back to the
/// file stem.
fn raw_title(path: &Path) -> String {
    let name = file_name(path);
    match RAW_TITLE.captures(&name) {
        Some(caps) => caps[1].to_string(),
        None => file_title(path),
    }
}
