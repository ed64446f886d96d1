use axum::{extract::{Query, State}, http::StatusCode, routing::{get, post}, Json, Router};
use ngram_core::{Fold, IndexStats, Match, StringIndex};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;

/// The index is not internally synchronized: one writer or many readers.
pub type SharedIndex = Arc<RwLock<StringIndex<String, Fold>>>;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<String>,
}

#[derive(Serialize)]
pub struct LookupResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub matches: Vec<Match<String>>,
}

#[derive(Debug, Deserialize)]
pub struct InputDoc {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub body: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum DocumentsBody {
    One(InputDoc),
    Many(Vec<InputDoc>),
}

#[derive(Serialize)]
pub struct AddResponse {
    pub received: usize,
    /// Documents that produced at least one n-gram.
    pub indexed: usize,
    pub documents: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub index: SharedIndex,
    pub admin_token: Option<String>,
}

pub fn build_app(index: StringIndex<String, Fold>) -> Router {
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    build_app_with_state(AppState { index: Arc::new(RwLock::new(index)), admin_token })
}

pub fn build_app_with_state(app_state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/lookup", get(lookup_handler))
        .route("/stats", get(stats_handler))
        .route("/documents", post(add_documents))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let ranked = state.index.read().search(&params.q);
    let total_hits = ranked.len();
    let k = params.k.clamp(1, 100);
    let results = ranked.into_iter().take(k).collect();
    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, total_hits, "search");
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results })
}

pub async fn lookup_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<LookupResponse> {
    let start = std::time::Instant::now();
    let mut matches = state.index.read().lookup(&params.q);
    let total_hits = matches.len();
    // best match rate first; lookup itself is unordered
    matches.sort_by(|a, b| b.match_rate.total_cmp(&a.match_rate));
    matches.truncate(params.k.clamp(1, 100));
    let elapsed = start.elapsed();
    Json(LookupResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, matches })
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<IndexStats> {
    Json(state.index.read().index().stats())
}

async fn add_documents(State(state): State<AppState>, headers: axum::http::HeaderMap, Json(body): Json<DocumentsBody>) -> Result<Json<AddResponse>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let docs = match body {
        DocumentsBody::One(doc) => vec![doc],
        DocumentsBody::Many(docs) => docs,
    };
    let received = docs.len();

    let mut idx = state.index.write();
    let before = idx.len();
    for doc in docs {
        match doc.title {
            Some(title) => idx.add_fields(doc.id, [title.as_str(), doc.body.as_str()]),
            None => idx.add(doc.id, &doc.body),
        }
    }
    let documents = idx.len();
    drop(idx);

    tracing::info!(received, indexed = documents - before, documents, "added documents");
    Ok(Json(AddResponse { received, indexed: documents - before, documents }))
}

fn authorize(state: &AppState, headers: &axum::http::HeaderMap) -> Result<(), (StatusCode, String)> {
    // writes are open when no token is configured
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Ok(()),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
