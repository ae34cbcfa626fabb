pub mod auth;
pub mod backend;
pub mod catalog;
pub mod error;
pub mod handlers;
pub mod ical;
pub mod listing;
pub mod models;
pub mod navigation;
pub mod openapi;
pub mod session;
pub mod settings;
pub mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use handlers::{
    current_session, get_course, get_navigation, get_webinar, get_webinars_ical, healthz_live,
    healthz_ready, list_courses, list_webinars, login, logout, root,
};
use chrono::Duration;
use http::HeaderValue;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::backend::BackendClient;
use crate::catalog::Catalog;
use crate::ical::ICalExporter;
use crate::openapi::ApiDoc;
use crate::session::SessionStore;
use crate::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub catalog: Arc<Catalog>,
    pub backend: Arc<BackendClient>,
    pub sessions: SessionStore,
    pub exporter: Arc<ICalExporter>,
}

impl AppState {
    pub fn new(settings: Settings, catalog: Catalog) -> Self {
        let sessions =
            SessionStore::with_max_age(Duration::minutes(settings.session_max_age_minutes));
        Self {
            backend: Arc::new(BackendClient::new(settings.backend_base_url.clone())),
            settings,
            catalog: Arc::new(catalog),
            sessions,
            exporter: Arc::new(ICalExporter::new()),
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let catalog = match &settings.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin(),
    };
    info!(backend = %settings.backend_base_url, "Using membership backend");

    let state = AppState::new(settings, catalog);
    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!("Starting USI Membership Portal API on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match settings.cors_origin.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(err)) => {
            warn!(error = %err, "invalid CORS origin, allowing any");
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(current_session))
        .route("/navigation", get(get_navigation))
        .route("/webinars", get(list_webinars))
        .route("/webinars.ical", get(get_webinars_ical))
        .route("/webinars/{id}", get(get_webinar))
        .route("/courses", get(list_courses))
        .route("/courses/{id}", get(get_course))
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(cors_layer(&state.settings)).layer(trace_layer)
}
