use std::path::Path as FsPath;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use matcher::{Corpus, FilterCriteria, Recommender, WorkMode};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Deserialize)]
pub struct RecommendParams {
    /// Free-text skills/interests query; empty means "no preference".
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub work_mode: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub min_stipend: Option<u32>,
    /// Comma-separated domain keywords.
    #[serde(default)]
    pub domains: Option<String>,
    #[serde(default)]
    pub strict_offline: Option<bool>,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize {
    10
}

#[derive(Serialize)]
pub struct RecommendResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<RecommendHit>,
}

#[derive(Serialize)]
pub struct RecommendHit {
    pub id: String,
    pub company: String,
    pub role: String,
    pub location: String,
    pub stipend: u32,
    pub score: f32,
    pub matched_terms: Vec<String>,
    pub filters: matcher::FilterTrace,
}

/// Corpus plus its fitted index. The catalog-replace path is the single
/// writer; every query path reads.
pub struct EngineState {
    pub corpus: Corpus,
    pub recommender: Recommender,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<EngineState>>,
    pub admin_token: Option<String>,
}

pub fn build_app(catalog_path: Option<String>) -> Result<Router> {
    // Load the catalog and fit the index once at startup; queries reuse the
    // snapshot until the catalog is replaced.
    let corpus = match &catalog_path {
        Some(path) => catalog::load_catalog(FsPath::new(path))?,
        None => catalog::sample(),
    };
    let mut recommender = Recommender::default();
    recommender.rebuild(&corpus)?;
    tracing::info!(listings = corpus.len(), "recommendation index ready");

    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let app_state = AppState {
        engine: Arc::new(RwLock::new(EngineState { corpus, recommender })),
        admin_token,
    };

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
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/recommend", get(recommend_handler))
        .route("/listing/:idx", get(listing_handler))
        .route("/catalog/replace", post(catalog_replace))
        .with_state(app_state)
        .layer(cors);
    Ok(app)
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    Query(params): Query<RecommendParams>,
) -> Result<Json<RecommendResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();

    let work_mode = match &params.work_mode {
        Some(raw) => raw
            .parse::<WorkMode>()
            .map_err(|e| (StatusCode::BAD_REQUEST, e))?,
        None => WorkMode::Any,
    };
    let domains = params
        .domains
        .as_deref()
        .map(|d| {
            d.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    let filters = FilterCriteria {
        work_mode,
        location: params.location.clone(),
        min_stipend: params.min_stipend.unwrap_or(0),
        domains,
        offline_strict: params.strict_offline.unwrap_or(false),
    };

    let engine = state.engine.read();
    let ranked = engine
        .recommender
        .recommend(&engine.corpus, &params.q, &filters)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let total_hits = ranked.len();
    let k = params.k.max(1).min(100);
    let results = ranked
        .into_iter()
        .take(k)
        .filter_map(|r| {
            engine.corpus.get(r.doc as usize).map(|l| RecommendHit {
                id: l.id.clone(),
                company: l.company.clone(),
                role: l.role.clone(),
                location: l.location.clone(),
                stipend: l.stipend,
                score: r.score,
                matched_terms: r.matched_terms,
                filters: r.filters,
            })
        })
        .collect();

    Ok(Json(RecommendResponse {
        query: params.q,
        took_s: start.elapsed().as_secs_f64(),
        total_hits,
        results,
    }))
}

pub async fn listing_handler(
    State(state): State<AppState>,
    Path(idx): Path<usize>,
) -> Json<serde_json::Value> {
    let engine = state.engine.read();
    match engine.corpus.get(idx) {
        Some(listing) => Json(serde_json::json!({
            "idx": idx,
            "listing": listing,
        })),
        None => Json(serde_json::json!({ "error": "not found" })),
    }
}

/// Replace the catalog and rebuild the index, but only when the corpus
/// fingerprint actually changed. Readers holding the old snapshot keep
/// consistent results until the swap.
async fn catalog_replace(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let corpus =
        catalog::from_json_value(body).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    if corpus.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "catalog contains no usable listings".into()));
    }

    let mut engine = state.engine.write();
    let rebuilt = engine
        .recommender
        .rebuild(&corpus)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    engine.corpus = corpus;
    Ok(Json(serde_json::json!({
        "listings": engine.corpus.len(),
        "rebuilt": rebuilt,
    })))
}

fn authorize(state: &AppState, headers: &axum::http::HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers
        .get("X-ADMIN-TOKEN")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
