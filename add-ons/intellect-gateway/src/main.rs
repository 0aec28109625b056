//! intellect-gateway: HTTP surface for the Intellect tutor.
//!
//! Routes:
//! - `POST /api/chat`: tutoring turn, `{ responseText, svgData }`
//! - `POST /api/svg`: direct SVG generation, always `{ svgData }` once a prompt is given
//! - `POST|GET /api/svg-status`: background SVG jobs keyed by message id
//! - `POST /api/quiz/generate`: quiz from document text
//! - `GET /api/auth0-uuid`, `GET /api/check-env`, `GET /health`

mod handlers;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use intellect_core::{AppConfig, ChatModels, CompletionClient, GeminiClient, SvgJobRegistry};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<AppConfig>,
    pub(crate) client: Arc<dyn CompletionClient>,
    pub(crate) models: Arc<ChatModels>,
    pub(crate) svg_jobs: SvgJobRegistry,
}

impl AppState {
    pub(crate) fn new(config: AppConfig, client: Arc<dyn CompletionClient>) -> Self {
        let models = ChatModels::from_config(&config);
        let svg_jobs = SvgJobRegistry::new(Arc::clone(&client), config.svg_model.clone());
        Self {
            config: Arc::new(config),
            client,
            models: Arc::new(models),
            svg_jobs,
        }
    }
}

fn is_local_origin(origin: &HeaderValue) -> bool {
    let s = origin.to_str().unwrap_or("");
    let host_ok = s.starts_with("http://localhost:") || s.starts_with("http://127.0.0.1:");
    let port = s
        .rsplit(':')
        .next()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(0);
    host_ok && ((3000..=3099).contains(&port) || (8000..=8099).contains(&port))
}

fn build_app(state: AppState) -> Router {
    // Browser clients run on the local Next.js dev ports.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
            is_local_origin(origin)
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/svg", post(handlers::svg::svg))
        .route(
            "/api/svg-status",
            get(handlers::svg::svg_status_get).post(handlers::svg::svg_status_start),
        )
        .route("/api/quiz/generate", post(handlers::quiz::generate))
        .route("/api/auth0-uuid", get(handlers::system::auth0_uuid))
        .route("/api/check-env", get(handlers::system::check_env))
        .route("/health", get(handlers::system::health))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[intellect-gateway] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "configuration invalid, refusing to start");
            std::process::exit(1);
        }
    };
    tracing::info!(
        chat_model = %config.chat_model,
        thinking_model = %config.thinking_model,
        svg_model = %config.svg_model,
        "models configured"
    );

    let client: Arc<dyn CompletionClient> = Arc::new(GeminiClient::new(&config));
    let addr = config.bind_addr();
    let app_name = config.app_name.clone();
    let app = build_app(AppState::new(config, client));

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%addr, error = %e, "bind failed");
            std::process::exit(1);
        }
    };
    tracing::info!("{} listening on {}", app_name, addr);

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown initiated (Ctrl+C received)");
        }
    }
}
