use std::fs;
use std::path::Path;

use clap::Parser;
use ir_cli::{run, Cli};
use serde_json::Value;
use tempfile::tempdir;

fn build_tiny_collection(dir: &Path) {
    let raw = dir.join("raw");
    fs::create_dir_all(&raw).unwrap();
    fs::write(raw.join("She 3.txt"), "Ayesha waited in Kor for Holly\n").unwrap();
    fs::write(raw.join("Allan Quatermain 1.txt"), "Allan and Curtis sailed north\n").unwrap();
    fs::write(raw.join("Jess 2.txt"), "Jess rode north\n").unwrap();
}

fn call(dir: &Path, args: &[&str]) -> anyhow::Result<String> {
    let data = dir.to_string_lossy().to_string();
    let mut argv = vec!["irsys", "--data", data.as_str(), "--expected-docs", "3"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv)?;
    let mut out = Vec::new();
    run(&cli, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn rank_prints_titles_and_scores() {
    let dir = tempdir().unwrap();
    build_tiny_collection(dir.path());

    let out = call(dir.path(), &["rank", "Ayesha"]).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Best matching documents to 'Ayesha':");
    // six distinct terms of equal weight: 1 / sqrt(6)
    assert_eq!(lines[1], "She: 4.082483e-01");
    assert_eq!(lines[2], "Allan Quatermain: 0.000000e+00");
    assert_eq!(lines[3], "Jess: 0.000000e+00");
    assert_eq!(lines.len(), 4);
}

#[test]
fn second_run_reads_the_cache_and_agrees() {
    let dir = tempdir().unwrap();
    build_tiny_collection(dir.path());

    let first = call(dir.path(), &["rank", "north", "kor"]).unwrap();
    assert!(dir.path().join("stemmed/She.txt").is_file());
    let second = call(dir.path(), &["rank", "north", "kor"]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn wrong_collection_size_fails_every_run() {
    let dir = tempdir().unwrap();
    build_tiny_collection(dir.path());
    let data = dir.path().to_string_lossy().to_string();
    for _ in 0..2 {
        let cli = Cli::try_parse_from(["irsys", "--data", data.as_str(), "rank", "ayesha"]).unwrap();
        let err = run(&cli, &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("expected 60 documents, found 3"));
    }
    assert!(!dir.path().join("stemmed").exists());
}

#[test]
fn rank_json_lists_hits() {
    let dir = tempdir().unwrap();
    build_tiny_collection(dir.path());

    let out = call(dir.path(), &["--json", "rank", "--top-k", "2", "ayesha"]).unwrap();
    let json: Value = serde_json::from_str(&out).unwrap();
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["doc_id"].as_u64().unwrap(), 2);
    assert_eq!(arr[0]["title"], "She");
    assert!(arr[0]["score"].as_f64().unwrap() > 0.0);
    assert_eq!(arr[1]["doc_id"].as_u64().unwrap(), 0);
}

#[test]
fn boolean_lists_matching_documents() {
    let dir = tempdir().unwrap();
    build_tiny_collection(dir.path());

    let out = call(dir.path(), &["boolean", "North"]).unwrap();
    assert_eq!(out, "2 documents contain every word of 'North':\n0: Allan Quatermain\n1: Jess\n");

    let out = call(dir.path(), &["--json", "boolean", "north", "jess"]).unwrap();
    let json: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json, serde_json::json!([{ "doc_id": 1, "title": "Jess" }]));
}

#[test]
fn boolean_with_unknown_word_names_it() {
    let dir = tempdir().unwrap();
    build_tiny_collection(dir.path());

    let err = call(dir.path(), &["boolean", "north", "zebra"]).unwrap_err();
    assert!(format!("{err:#}").contains("zebra"));
}

#[test]
fn postings_show_documents_and_positions() {
    let dir = tempdir().unwrap();
    build_tiny_collection(dir.path());

    let out = call(dir.path(), &["postings", "Sailed"]).unwrap();
    assert_eq!(out, "0 Allan Quatermain: 1 occurrences\n");

    let out = call(dir.path(), &["--json", "postings", "north"]).unwrap();
    let json: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json, serde_json::json!({ "0": [4], "1": [2] }));
}

#[test]
fn weight_prints_tfidf() {
    let dir = tempdir().unwrap();
    build_tiny_collection(dir.path());

    let out = call(dir.path(), &["weight", "north", "0"]).unwrap();
    let weight: f64 = out.trim().parse().unwrap();
    assert!((weight - 1.5f64.log10()).abs() < 1e-9);

    let out = call(dir.path(), &["--json", "weight", "ayesha", "1"]).unwrap();
    let json: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["doc_id"], 1);
    assert_eq!(json["weight"].as_f64().unwrap(), 0.0);
}
