//! Single-route image relay.
//!
//! `GET /?url=<upstream>` fetches the upstream image and passes the bytes
//! through with the upstream content type. The URL must start with the
//! configured image-host prefix, otherwise the request is refused with 400.
//! Upstream failures propagate the upstream status. The relay holds no
//! other state.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::config::RelayConfig;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared relay context.
#[derive(Clone)]
pub struct RelayState {
    client: reqwest::Client,
    allowed_prefix: String,
}

impl RelayState {
    pub fn new(config: &RelayConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            allowed_prefix: config.allowed_prefix.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RelayQuery {
    url: Option<String>,
}

/// Create the relay router.
pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/", get(fetch_upstream))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fetch_upstream(
    State(state): State<RelayState>,
    Query(query): Query<RelayQuery>,
) -> Response {
    let Some(url) = query.url else {
        return (StatusCode::BAD_REQUEST, "missing url parameter").into_response();
    };
    if !url.starts_with(&state.allowed_prefix) {
        warn!(url = %url, "refusing disallowed upstream url");
        return (StatusCode::BAD_REQUEST, "url not allowed").into_response();
    }

    let resp = match state.client.get(&url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            warn!(url = %url, error = %e, "upstream fetch failed");
            return (StatusCode::BAD_GATEWAY, "upstream fetch failed").into_response();
        }
    };

    let status = resp.status();
    if !status.is_success() {
        debug!(url = %url, status = %status, "propagating upstream status");
        let status =
            StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        return (status, "upstream error").into_response();
    }

    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    match resp.bytes().await {
        Ok(body) => ([(header::CONTENT_TYPE, content_type)], body.to_vec()).into_response(),
        Err(e) => {
            warn!(url = %url, error = %e, "upstream body read failed");
            (StatusCode::BAD_GATEWAY, "upstream read failed").into_response()
        }
    }
}

/// Bind and serve the relay until the process exits.
pub async fn serve(config: &RelayConfig) -> anyhow::Result<()> {
    let state = RelayState::new(config);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Image relay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
