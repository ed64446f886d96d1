use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use ngram_core::{Fold, IndexConfig, NgramIndex, StringIndex};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, fmt};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: String,
    #[serde(default)]
    title: Option<String>,
    body: String,
}

#[derive(Parser)]
#[command(name = "ngram")]
#[command(about = "Fuzzy n-gram search over JSON/JSONL documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the input and run one or more queries against it
    Search {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Query text; repeat for several queries
        #[arg(long, required = true)]
        query: Vec<String>,
        /// Print match details as JSON lines instead of ranked ids
        #[arg(long, default_value_t = false)]
        details: bool,
        /// Maximum results per query
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        opts: IndexOpts,
    },
    /// Index the input and print index statistics as JSON
    Stats {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        #[command(flatten)]
        opts: IndexOpts,
    },
}

#[derive(Args, Debug, Clone)]
struct IndexOpts {
    /// Window size for shingling
    #[arg(long, default_value_t = 3)]
    ngram_len: usize,
    /// Only report documents with more matched windows than this
    #[arg(long, default_value_t = 0)]
    cutoff: usize,
    #[arg(long, default_value_t = false)]
    lowercase: bool,
    #[arg(long, default_value_t = false)]
    strip_accents: bool,
    #[arg(long, default_value_t = false)]
    collapse_whitespace: bool,
    /// Shingle each word separately
    #[arg(long, default_value_t = false)]
    split_words: bool,
}

impl IndexOpts {
    fn config(&self) -> IndexConfig { IndexConfig::new(self.ngram_len, self.cutoff) }

    fn fold(&self) -> Fold {
        Fold::new()
            .lowercase(self.lowercase)
            .strip_accents(self.strip_accents)
            .collapse_whitespace(self.collapse_whitespace)
            .split_words(self.split_words)
    }

    fn build(&self) -> Result<StringIndex<String, Fold>> {
        let core = NgramIndex::with_config(self.config())?;
        Ok(StringIndex::from_index(core, self.fold()))
    }
}

#[derive(Serialize)]
struct RankedHit<'a> {
    query: &'a str,
    rank: usize,
    id: &'a str,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { input, query, details, limit, opts } => {
            let idx = build_index(&input, &opts)?;
            for q in &query {
                run_query(&idx, q, details, limit)?;
            }
            Ok(())
        }
        Commands::Stats { input, opts } => {
            let idx = build_index(&input, &opts)?;
            println!("{}", serde_json::to_string_pretty(&idx.index().stats())?);
            Ok(())
        }
    }
}

fn run_query(idx: &StringIndex<String, Fold>, q: &str, details: bool, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(usize::MAX);
    if details {
        let mut matches = idx.lookup(q);
        matches.sort_by(|a, b| b.matched_ngrams.cmp(&a.matched_ngrams));
        for m in matches.into_iter().take(limit) {
            println!("{}", serde_json::to_string(&m)?);
        }
    } else {
        for (rank, id) in idx.search(q).iter().take(limit).enumerate() {
            println!("{}", serde_json::to_string(&RankedHit { query: q, rank: rank + 1, id: id.as_str() })?);
        }
    }
    Ok(())
}

fn build_index(input: &str, opts: &IndexOpts) -> Result<StringIndex<String, Fold>> {
    let mut idx = opts.build()?;
    let mut seen = 0usize;
    for file in input_files(Path::new(input))? {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            index_jsonl(&file, &mut idx, &mut seen)?;
        } else {
            index_json(&file, &mut idx, &mut seen)?;
        }
    }
    let stats = idx.index().stats();
    tracing::info!(seen, indexed = stats.documents, distinct_ngrams = stats.distinct_ngrams, "ingested documents");
    Ok(idx)
}

fn input_files(input_path: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else {
        bail!("input path {} does not exist", input_path.display());
    }
    Ok(files)
}

fn index_jsonl(file: &Path, idx: &mut StringIndex<String, Fold>, seen: &mut usize) -> Result<()> {
    let f = File::open(file)?;
    let reader = BufReader::new(f);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)?;
        ingest_doc(doc, idx, seen);
    }
    Ok(())
}

fn index_json(file: &Path, idx: &mut StringIndex<String, Fold>, seen: &mut usize) -> Result<()> {
    let f = File::open(file)?;
    let reader = BufReader::new(f);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                let doc: InputDoc = serde_json::from_value(v)?;
                ingest_doc(doc, idx, seen);
            }
        }
        serde_json::Value::Object(_) => {
            let doc: InputDoc = serde_json::from_value(json)?;
            ingest_doc(doc, idx, seen);
        }
        _ => {}
    }
    Ok(())
}

fn ingest_doc(doc: InputDoc, idx: &mut StringIndex<String, Fold>, seen: &mut usize) {
    *seen += 1;
    // title and body are shingled separately
    match doc.title {
        Some(title) => idx.add_fields(doc.id, [title.as_str(), doc.body.as_str()]),
        None => idx.add(doc.id, &doc.body),
    }
}
