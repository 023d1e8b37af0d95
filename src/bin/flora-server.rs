//! flora-graph HTTP server.
//!
//! JSON API over one shared, immutable engine snapshot:
//!
//! **Graph queries:**
//! - `GET  /query?q=` — neighborhood graph for a plant name
//! - `GET  /details?name=` — relationships of an exact identifier
//! - `GET  /get_structured_info?name=` — structured attribute record
//! - `GET  /autocomplete?q=` — name suggestions
//! - `GET  /taxonomy` — family → genus → plant tree
//!
//! **Text generation (external service):**
//! - `POST /generate` — plant description
//! - `POST /script_suggestions` — script suggestions
//!
//! **Health:**
//! - `GET  /health` — server status
//!
//! Build and run: `cargo run --features server --bin flora-server`

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use flora_graph::config::EngineConfig;
use flora_graph::engine::Engine;
use flora_graph::generate::{DescribeRequest, GenerationClient, GenerationOutcome, ScriptRequest};
use flora_graph::query::{EntityDetail, Neighborhood, StructuredRecord};

// ── Server state ──────────────────────────────────────────────────────────

struct ServerState {
    engine: Engine,
    generator: GenerationClient,
    /// Taxonomy tree serialized once at startup.
    taxonomy_json: Bytes,
}

impl ServerState {
    fn new(engine: Engine, generator: GenerationClient) -> serde_json::Result<Self> {
        let taxonomy_json = Bytes::from(serde_json::to_vec(engine.taxonomy().tree())?);
        Ok(Self {
            engine,
            generator,
            taxonomy_json,
        })
    }
}

// ── Request / response types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct KeywordParams {
    #[serde(default)]
    q: String,
}

#[derive(Deserialize)]
struct NameParams {
    #[serde(default)]
    name: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    triples: usize,
    names: usize,
}

#[derive(Serialize)]
struct StructuredInfoResponse {
    info: StructuredRecord,
}

#[derive(Serialize)]
struct ScriptResponse {
    script_suggestions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    let info = state.engine.info();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        triples: info.triple_count,
        names: info.name_count,
    })
}

async fn query(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<KeywordParams>,
) -> Json<Neighborhood> {
    Json(state.engine.neighborhood(&params.q))
}

async fn details(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<NameParams>,
) -> Json<EntityDetail> {
    Json(state.engine.detail(&params.name))
}

async fn structured_info(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<NameParams>,
) -> Json<StructuredInfoResponse> {
    Json(StructuredInfoResponse {
        info: state.engine.structured_info(&params.name),
    })
}

async fn autocomplete(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<KeywordParams>,
) -> Json<Vec<String>> {
    Json(state.engine.autocomplete(&params.q))
}

async fn taxonomy(
    State(state): State<Arc<ServerState>>,
) -> ([(header::HeaderName, &'static str); 1], Bytes) {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.taxonomy_json.clone(),
    )
}

/// Run a blocking generation call off the async runtime.
async fn run_blocking<F>(state: &Arc<ServerState>, call: F) -> GenerationOutcome
where
    F: FnOnce(&GenerationClient) -> GenerationOutcome + Send + 'static,
{
    let client = state.generator.clone();
    match tokio::task::spawn_blocking(move || call(&client)).await {
        Ok(outcome) => outcome,
        Err(e) => GenerationOutcome::Failed {
            error: format!("generation task failed: {e}"),
        },
    }
}

async fn generate(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<DescribeRequest>,
) -> (StatusCode, Json<String>) {
    match run_blocking(&state, move |client| client.describe(&request)).await {
        GenerationOutcome::Generated { text } => (StatusCode::OK, Json(text)),
        GenerationOutcome::Failed { error } => (StatusCode::INTERNAL_SERVER_ERROR, Json(error)),
    }
}

async fn script_suggestions(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ScriptRequest>,
) -> (StatusCode, Json<ScriptResponse>) {
    match run_blocking(&state, move |client| client.script_suggestions(&request)).await {
        GenerationOutcome::Generated { text } => (
            StatusCode::OK,
            Json(ScriptResponse {
                script_suggestions: text,
                error: None,
            }),
        ),
        GenerationOutcome::Failed { error } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ScriptResponse {
                script_suggestions: String::new(),
                error: Some(error),
            }),
        ),
    }
}

// ── Main ──────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::var("FLORA_SERVER_BIND").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("FLORA_SERVER_PORT").unwrap_or_else(|_| "5000".to_string());
    let addr = format!("{bind}:{port}");

    let config_path = std::env::var("FLORA_CONFIG").ok().map(PathBuf::from);
    let config = EngineConfig::load_or_default(config_path.as_deref()).unwrap_or_else(|e| {
        tracing::error!("failed to load config: {e}");
        std::process::exit(1);
    });

    // Startup loads are fail-fast: a missing or malformed data file aborts.
    let engine = Engine::new(&config).unwrap_or_else(|e| {
        tracing::error!("failed to load knowledge graph: {e}");
        std::process::exit(1);
    });
    let generator = GenerationClient::new(config.generation.clone().with_env_api_key());
    if generator.config().api_key.is_none() {
        tracing::warn!("DEEPSEEK_API_KEY not set; text generation requests will fail");
    }

    let state = ServerState::new(engine, generator).unwrap_or_else(|e| {
        tracing::error!("failed to serialize taxonomy tree: {e}");
        std::process::exit(1);
    });

    let app = router(Arc::new(state));

    tracing::info!("flora-graph server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap_or_else(|e| {
        tracing::error!("failed to bind {addr}: {e}");
        std::process::exit(1);
    });
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}

fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/query", get(query))
        .route("/details", get(details))
        .route("/get_structured_info", get(structured_info))
        .route("/autocomplete", get(autocomplete))
        .route("/taxonomy", get(taxonomy))
        .route("/generate", post(generate))
        .route("/script_suggestions", post(script_suggestions))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use flora_graph::autocomplete::AutocompleteIndex;
    use flora_graph::config::GenerationConfig;
    use flora_graph::graph::{Triple, TripleStore};
    use flora_graph::query::StructuredRecord;
    use flora_graph::taxonomy::Taxonomy;

    fn test_state() -> Arc<ServerState> {
        let engine = Engine::from_parts(
            TripleStore::from_triples([
                Triple::new("http://p/Lotus", "http://s#属于科", "http://p/睡莲科"),
                Triple::new("http://p/Lotus", "http://s#特征", "叶圆"),
            ]),
            AutocompleteIndex::new(["Lotus", "Blue Lotus"].map(String::from)),
            Taxonomy::new(serde_json::json!({"睡莲科": {"莲属": ["Lotus"]}})),
        );
        // No API key, so every generation call fails before any network I/O.
        let generator = GenerationClient::new(GenerationConfig::default());
        Arc::new(ServerState::new(engine, generator).unwrap())
    }

    #[tokio::test]
    async fn generate_failure_is_500_with_prefixed_message() {
        let request = DescribeRequest {
            plant_name: "Lotus".into(),
            info: StructuredRecord::new(),
            addition: String::new(),
            n: 1,
        };
        let (status, Json(body)) = generate(State(test_state()), Json(request)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with("生成失败："));
    }

    #[tokio::test]
    async fn script_failure_is_500_with_empty_suggestions_and_error() {
        let request: ScriptRequest = serde_json::from_str(r#"{"plant_name": "Lotus"}"#).unwrap();
        let (status, Json(body)) = script_suggestions(State(test_state()), Json(request)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["script_suggestions"], "");
        assert!(json["error"].as_str().unwrap().starts_with("脚本生成失败："));
    }

    #[tokio::test]
    async fn taxonomy_is_served_from_startup_bytes() {
        let state = test_state();
        let (headers, body) = taxonomy(State(state.clone())).await;
        assert_eq!(headers[0].1, "application/json");
        let tree: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(&tree, state.engine.taxonomy().tree());
    }

    #[tokio::test]
    async fn query_handlers_wrap_engine_results() {
        let state = test_state();

        let Json(graph) = query(
            State(state.clone()),
            Query(KeywordParams { q: "lotus".into() }),
        )
        .await;
        assert_eq!(graph.links.len(), 1);

        let Json(names) = autocomplete(
            State(state.clone()),
            Query(KeywordParams { q: "lotus".into() }),
        )
        .await;
        assert_eq!(names, ["Lotus", "Blue Lotus"]);

        let Json(info) = structured_info(
            State(state),
            Query(NameParams {
                name: "Lotus".into(),
            }),
        )
        .await;
        assert_eq!(info.info.len(), 2);
    }
}
