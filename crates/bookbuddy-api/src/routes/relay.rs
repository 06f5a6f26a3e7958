//! Forwards browser calls on this origin to the API gateway.

use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{header, HeaderMap, HeaderName, Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::any,
    Router,
};
use bookbuddy_types::MessageResponse;
use tracing::{debug, warn};

use crate::state::AppState;

/// Largest request body relayed upstream; spreadsheets are the big case.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
enum RelayError {
    #[error("gateway unreachable: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("failed to build response: {0}")]
    Response(#[from] http::Error),
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/*rest", any(forward))
        .route("/api/*rest", any(forward))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

fn forwarded_headers(headers: &HeaderMap) -> HeaderMap {
    headers
        .iter()
        .filter(|(name, _)| {
            !is_hop_by_hop(name) && **name != header::HOST && **name != header::CONTENT_LENGTH
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

fn message(status: StatusCode, text: String) -> Response {
    (status, Json(MessageResponse { message: Some(text) })).into_response()
}

async fn forward(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let path = uri.path().to_string();

    // Oversized or unreadable bodies never reach the gateway.
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!("rejected {method} {path}: {}", rejection.body_text());
            return message(rejection.status(), rejection.body_text());
        }
    };

    match relay(&state, method.clone(), &uri, &headers, body).await {
        Ok(response) => {
            debug!("relayed {method} {path} -> {}", response.status());
            response
        }
        Err(e) => {
            warn!("relay {method} {path} failed: {e}");
            message(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

async fn relay(
    state: &AppState,
    method: Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response, RelayError> {
    let pathAndQuery = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let target = format!("{}{pathAndQuery}", state.gateway_url);

    let upstream = state
        .http
        .request(method, target)
        .headers(forwarded_headers(headers))
        .body(body)
        .send()
        .await?;

    let status = upstream.status();
    let responseHeaders = forwarded_headers(upstream.headers());
    let responseBytes = upstream.bytes().await?;

    let mut builder = Response::builder().status(status);
    if let Some(headers) = builder.headers_mut() {
        headers.extend(responseHeaders);
    }
    Ok(builder.body(Body::from(responseBytes))?)
}
