use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::error::ErrorDetail;
use crate::router::AppState;

/// Paths too noisy to log on every hit.
fn is_quiet(path: &str) -> bool {
    path == "/health" || path.starts_with("/static/")
}

/// Logs method, path, status and duration for every request. Server errors
/// are logged with their underlying cause, which replaces the generic body
/// in development.
pub async fn log_request(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let mut resp = next.run(req).await;

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    let status = resp.status();

    if let Some(ErrorDetail(detail)) = resp.extensions_mut().remove::<ErrorDetail>() {
        error!(
            %method,
            %path,
            status = status.as_u16(),
            elapsed_ms,
            error = %detail,
            "request failed"
        );
        if state.env.is_development() {
            *resp.body_mut() = Body::from(detail);
            resp.headers_mut().remove(axum::http::header::CONTENT_LENGTH);
        }
    } else if status.is_client_error() {
        warn!(%method, %path, status = status.as_u16(), elapsed_ms, "request rejected");
    } else if !is_quiet(&path) {
        info!(%method, %path, status = status.as_u16(), elapsed_ms);
    }

    resp
}
