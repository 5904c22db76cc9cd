pub mod config;
pub mod error;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::{Config, SourceKind};
use error::ServiceError;
use feed::{FeedSource, SearchApiSource, SyndicationSource, assemble, clamp_requested};
use resolver::{ChannelResolver, HttpDocumentFetcher, IdentifierCache, SystemClock};

/// Shared application state: the configured handle, the resolver with its
/// identifier cache, and the configured feed source.
pub struct AppState {
    handle: String,
    resolver: ChannelResolver,
    source: Arc<dyn FeedSource>,
}

impl AppState {
    /// Wires the pipeline from configuration: one shared HTTP client with
    /// the configured timeout, a TTL-bound identifier cache on the system
    /// clock, and the feed source the deployment selected.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        let cache = IdentifierCache::new(config.cache_ttl_secs, Arc::new(SystemClock));
        let resolver = ChannelResolver::new(
            Arc::new(HttpDocumentFetcher::new(client.clone())),
            cache,
            config.resolve_attempts,
        );
        let source: Arc<dyn FeedSource> = match config.source {
            SourceKind::Syndication => Arc::new(SyndicationSource::new(client)),
            SourceKind::SearchApi => {
                Arc::new(SearchApiSource::new(client, config.api_key.clone()))
            }
        };
        Ok(Self {
            handle: config.channel_handle.clone(),
            resolver,
            source,
        })
    }
}

/// Query parameters for the video listing endpoint.
///
/// `max` stays a string so non-numeric input can fall back to the source
/// default instead of failing extraction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub max: Option<String>,
    pub page_token: Option<String>,
}

/// Handler for `GET /videos`: the whole pipeline, strictly sequential.
/// Any stage failure fails the request; no partial results.
async fn list_videos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Response, ServiceError> {
    let channel_id = state.resolver.resolve(&state.handle).await?;
    let limits = state.source.limits();
    let max = clamp_requested(params.max.as_deref(), &limits);
    let page = state
        .source
        .fetch(&channel_id, params.page_token.as_deref(), max)
        .await?;
    let envelope = assemble(
        &state.handle,
        &channel_id,
        page.entries,
        max,
        page.next_page_token,
        Utc::now(),
    );
    tracing::info!(
        handle = %envelope.handle,
        channel_id = %envelope.channel_id,
        count = envelope.count,
        "served video listing"
    );
    let headers = [
        (
            header::CONTENT_TYPE,
            "application/json; charset=utf-8".to_owned(),
        ),
        (
            header::CACHE_CONTROL,
            format!("public, max-age={}", limits.cache_max_age),
        ),
    ];
    Ok((headers, Json(envelope)).into_response())
}

/// Liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the service router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/videos", get(list_videos))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
