use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::errors::AppError;
use crate::AppState;

/// The relay handler. The inbound request carries no parameters; every
/// invocation fetches the one configured file and either passes its text
/// through untouched or falls into the generic error path.
#[tracing::instrument(skip(state), fields(req_id = %uuid::Uuid::new_v4()))]
pub async fn relay_csv(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let csv = state
        .upstream
        .fetch_raw(&state.config.upstream_url, &state.config.github_token)
        .await?;

    Ok(([(header::CONTENT_TYPE, "text/csv")], csv).into_response())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health endpoint (no auth)
        .route("/healthz", get(|| async { "ok" }))
        .route("/csv", get(relay_csv))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        // The CSV is read by a browser dashboard; reads only, no credentials.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET]),
        )
        .layer(axum::middleware::from_fn(request_id_middleware))
}

/// Middleware: injects a unique X-Request-Id into every response.
/// This allows clients to correlate errors with relay logs.
async fn request_id_middleware(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let req_id = uuid::Uuid::new_v4().to_string();
    let mut resp = next.run(req).await;
    if let Ok(val) = axum::http::HeaderValue::from_str(&req_id) {
        resp.headers_mut().insert("x-request-id", val);
    }
    resp
}
