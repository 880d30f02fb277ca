use crate::config::Config;
use crate::encora::{EncoraApi, EncoraClient, RecordingMapper};
use crate::error::ProviderError;
use crate::guid::{LIBRARY_MATCHES, LIBRARY_METADATA};
use crate::matching::{MatchRequest, MatchService};
use crate::metadata::{LookupOptions, MetadataService, DEFAULT_COUNTRY, DEFAULT_LANGUAGE};
use crate::models::{ImagesResponse, MetadataResponse};
use crate::nfo::NfoResolver;
use crate::provider::{movie_provider, MediaProviderResponse, PROVIDER_BASE_PATH};
use crate::recordings::RecordingService;
use crate::stagemedia::{StageMediaApi, StageMediaClient};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::{collections::HashMap, net::SocketAddr, sync::Arc};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

const MAX_BODY_BYTES: usize = 1024 * 1024;
const LANGUAGE_HINT: &str = "X-Plex-Language";
const COUNTRY_HINT: &str = "X-Plex-Country";

#[derive(Clone)]
pub struct AppState {
    pub metadata: MetadataService,
    pub matcher: MatchService,
}

impl AppState {
    pub fn new(
        encora: Arc<dyn EncoraApi>,
        stagemedia: Arc<dyn StageMediaApi>,
        mapper: RecordingMapper,
        nfo: NfoResolver,
    ) -> Self {
        let recordings = RecordingService::new(encora, stagemedia, mapper);
        Self {
            metadata: MetadataService::new(recordings.clone(), nfo.clone()),
            matcher: MatchService::new(recordings, nfo),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let encora: Arc<dyn EncoraApi> = Arc::new(EncoraClient::new(
            &config.encora_api_key,
            &config.encora_base_url,
        )?);
        let stagemedia: Arc<dyn StageMediaApi> = Arc::new(StageMediaClient::new(
            &config.stagemedia_api_key,
            &config.stagemedia_base_url,
        )?);
        Ok(Self::new(
            encora,
            stagemedia,
            RecordingMapper::new(config.title_format.clone()),
            NfoResolver::new(config.nfo_base_path.clone()),
        ))
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let metadata_path = format!("{PROVIDER_BASE_PATH}{LIBRARY_METADATA}/:rating_key");
    Router::new()
        .route("/health", get(health))
        .route(PROVIDER_BASE_PATH, get(provider))
        .route(&metadata_path, get(metadata))
        .route(&format!("{metadata_path}/images"), get(images))
        .route(
            &format!("{PROVIDER_BASE_PATH}{LIBRARY_MATCHES}"),
            post(match_items),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn provider() -> Json<MediaProviderResponse> {
    Json(movie_provider())
}

/// Header first, then the same-named query parameter, then the default.
fn hint(headers: &HeaderMap, query: &HashMap<String, String>, name: &str, default: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .or_else(|| query.get(name).map(String::as_str).filter(|v| !v.is_empty()))
        .unwrap_or(default)
        .to_string()
}

fn lookup_options(headers: &HeaderMap, query: &HashMap<String, String>) -> LookupOptions {
    LookupOptions {
        language: hint(headers, query, LANGUAGE_HINT, DEFAULT_LANGUAGE),
        country: hint(headers, query, COUNTRY_HINT, DEFAULT_COUNTRY),
    }
}

async fn metadata(
    State(state): State<AppState>,
    Path(rating_key): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<MetadataResponse>, ProviderError> {
    let options = lookup_options(&headers, &query);
    let result = state.metadata.get_metadata(&rating_key, &options).await?;
    Ok(Json(result))
}

async fn images(
    State(state): State<AppState>,
    Path(rating_key): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<ImagesResponse>, ProviderError> {
    let options = lookup_options(&headers, &query);
    let result = state.metadata.get_images(&rating_key, &options).await?;
    Ok(Json(result))
}

async fn match_items(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(request): Json<MatchRequest>,
) -> Json<MetadataResponse> {
    let options = lookup_options(&headers, &query);
    Json(state.matcher.match_request(&request, &options).await)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
