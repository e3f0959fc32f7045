//! HTTP host for the web entry point.
//!
//! # Responsibilities
//! - Translate axum requests into dispatcher [`Request`]s and back
//! - Run each dispatch on the blocking pool
//! - Wire up tracing with a per-request id
//! - Graceful shutdown on Ctrl-C

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    extract::State,
    http::{self, HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::any,
};
use gantry_core::application::WebDispatcher;
use gantry_core::domain::{HttpMethod, Request, Response as DispatchResponse};
use percent_encoding::percent_decode_str;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Largest request body read into a form.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the axum router around a shared dispatcher.
pub fn build_router(dispatcher: Arc<WebDispatcher>) -> Router {
    Router::new()
        .route("/{*path}", any(dispatch_handler))
        .route("/", any(dispatch_handler))
        .with_state(dispatcher)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &http::Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
                tracing::info_span!(
                    "request",
                    id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
}

/// Serve until Ctrl-C.
pub async fn run(dispatcher: Arc<WebDispatcher>, listener: TcpListener) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "HTTP server starting");

    axum::serve(listener, build_router(dispatcher))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn dispatch_handler(
    State(dispatcher): State<Arc<WebDispatcher>>,
    request: http::Request<Body>,
) -> Response {
    let (parts, body) = request.into_parts();

    let Ok(method) = parts.method.as_str().parse::<HttpMethod>() else {
        return (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response();
    };
    let body = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, "request body rejected");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let request = to_request(method, &parts.uri, &parts.headers, &body);
    match tokio::task::spawn_blocking(move || dispatcher.handle(&request)).await {
        Ok(response) => into_http(response),
        Err(e) => {
            tracing::error!(error = %e, "dispatch task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Decoded dispatcher request from the HTTP parts.
fn to_request(method: HttpMethod, uri: &http::Uri, headers: &HeaderMap, body: &Bytes) -> Request {
    let mut request = Request::new(method, decode_path(uri.path()));
    request.query = parse_pairs(uri.query().unwrap_or_default());

    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            request = request.with_header(name.as_str(), value);
        }
    }
    let is_form = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
    if is_form {
        request.form = url::form_urlencoded::parse(body)
            .into_owned()
            .collect();
    }
    request
}

/// Percent-decode a request path. `+` is kept literally; invalid UTF-8
/// becomes U+FFFD.
pub fn decode_path(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Decode an `a=1&b=2` string. Later duplicates win.
pub fn parse_pairs(text: &str) -> BTreeMap<String, String> {
    url::form_urlencoded::parse(text.as_bytes())
        .into_owned()
        .collect()
}

fn into_http(response: DispatchResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut http_response = (status, response.body).into_response();
    let headers = http_response.headers_mut();
    for (name, value) in &response.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            headers.insert(name, value);
        }
    }
    http_response
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
