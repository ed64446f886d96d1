use anyhow::Result;
use axum::Router;
use clap::Parser;
use ngram_core::{Fold, IndexConfig, NgramIndex, StringIndex};
use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};
use ngram_server::build_app;
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
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

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let fold = Fold::new()
        .lowercase(args.lowercase)
        .strip_accents(args.strip_accents)
        .collapse_whitespace(args.collapse_whitespace)
        .split_words(args.split_words);
    let core = NgramIndex::with_config(IndexConfig::new(args.ngram_len, args.cutoff))?;
    let app: Router = build_app(StringIndex::from_index(core, fold));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, ngram_len = args.ngram_len, cutoff = args.cutoff, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
