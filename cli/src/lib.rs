use std::io::Write;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ir_core::{CollectionDir, Engine, LoaderConfig, RankConfig};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "irsys")]
#[command(about = "Boolean and tf-idf ranked search over a document collection", long_about = None)]
pub struct Cli {
    /// Collection directory holding `raw/` and optionally `stemmed/`
    #[arg(long, default_value = "./data/RiderHaggard")]
    pub data: String,
    /// Number of documents the collection must contain
    #[arg(long, default_value_t = 60)]
    pub expected_docs: usize,
    /// Skip the document-count check
    #[arg(long, default_value_t = false)]
    pub no_integrity_check: bool,
    /// Do not write the normalized cache after reading raw documents
    #[arg(long, default_value_t = false)]
    pub no_cache: bool,
    /// Emit JSON instead of text
    #[arg(long, default_value_t = false)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank documents against a free-text query
    Rank {
        /// Number of results
        #[arg(long, default_value_t = 10)]
        top_k: usize,
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Documents containing every query word
    Boolean {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Documents and positions for a word
    Postings { word: String },
    /// tf-idf weight of a word in a document
    Weight { word: String, doc: u32 },
}

#[derive(Serialize)]
struct Hit<'a> {
    doc_id: u32,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
}

/// Scientific notation with six decimals and an at-least-two-digit exponent,
/// e.g. `5.000000e-01`.
pub fn format_score(score: f64) -> String {
    let s = format!("{score:.6e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.abs())
            }
            Err(_) => s,
        },
        None => s,
    }
}

/// Load the collection named by `cli` and write the command's output to `out`.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let top_k = match &cli.command {
        Commands::Rank { top_k, .. } => *top_k,
        _ => RankConfig::default().top_k,
    };
    let engine = load_engine(cli, RankConfig { top_k })?;

    match &cli.command {
        Commands::Rank { query, .. } => {
            let query = query.join(" ");
            let results = engine.rank_query(&query)?;
            if cli.json {
                let mut hits = Vec::with_capacity(results.len());
                for &(doc_id, score) in &results {
                    hits.push(Hit { doc_id, title: engine.title(doc_id)?, score: Some(score) });
                }
                writeln!(out, "{}", serde_json::to_string_pretty(&hits)?)?;
            } else {
                writeln!(out, "Best matching documents to '{query}':")?;
                for (doc_id, score) in results {
                    writeln!(out, "{}: {}", engine.title(doc_id)?, format_score(score))?;
                }
            }
        }
        Commands::Boolean { query } => {
            let query = query.join(" ");
            let docs = engine
                .boolean_query_text(&query)
                .with_context(|| format!("boolean query '{query}'"))?;
            let mut hits = Vec::with_capacity(docs.len());
            for doc_id in docs {
                hits.push(Hit { doc_id, title: engine.title(doc_id)?, score: None });
            }
            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&hits)?)?;
            } else {
                writeln!(out, "{} documents contain every word of '{query}':", hits.len())?;
                for hit in hits {
                    writeln!(out, "{}: {}", hit.doc_id, hit.title)?;
                }
            }
        }
        Commands::Postings { word } => {
            let postings = engine.postings_for_word(word).with_context(|| format!("postings for '{word}'"))?;
            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(postings)?)?;
            } else {
                for (doc_id, positions) in postings {
                    writeln!(out, "{doc_id} {}: {} occurrences", engine.title(*doc_id)?, positions.len())?;
                }
            }
        }
        Commands::Weight { word, doc } => {
            let weight = engine.weight_for_word(word, *doc).with_context(|| format!("weight of '{word}' in {doc}"))?;
            if cli.json {
                writeln!(out, "{}", serde_json::json!({ "word": word, "doc_id": doc, "weight": weight }))?;
            } else {
                writeln!(out, "{weight}")?;
            }
        }
    }
    Ok(())
}

fn load_engine(cli: &Cli, rank: RankConfig) -> Result<Engine> {
    let config = LoaderConfig {
        expected_docs: (!cli.no_integrity_check).then_some(cli.expected_docs),
        write_cache: !cli.no_cache,
    };
    let store = CollectionDir::new(&cli.data, config);
    let source = store.read().with_context(|| format!("reading collection {}", cli.data))?;

    let mut engine = Engine::new().with_config(rank);
    engine.index(source).with_context(|| format!("indexing collection {}", cli.data))?;
    if store.write_cache(engine.documents()?)? {
        tracing::info!(data = %cli.data, "normalized cache written; later runs skip stemming");
    }
    tracing::info!(num_docs = engine.num_docs()?, "engine ready");
    Ok(engine)
}
