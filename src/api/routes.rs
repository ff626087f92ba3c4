//! Route table and request handlers

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::response::{ApiError, RecordBody};
use crate::version::refresh::Refresher;

/// Shared state handed to every handler
pub struct AppState {
    pub refresher: Arc<Refresher>,
    /// Bearer token accepted by the refresh endpoint; `None` rejects every request
    pub refresh_secret: Option<String>,
}

impl AppState {
    pub fn new(refresher: Arc<Refresher>, refresh_secret: Option<String>) -> Self {
        Self {
            refresher,
            refresh_secret,
        }
    }
}

/// Build the application router
///
/// `OPTIONS` requests on any path are answered by the CORS layer before routing.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/info", get(info).fallback(info_method_not_allowed))
        .route("/api/v2/info", get(info).fallback(info_method_not_allowed))
        .route("/api/refresh", post(refresh).fallback(refresh_method_not_allowed))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .with_state(state)
}

/// GET /api/info, /api/v2/info
async fn info(State(state): State<Arc<AppState>>) -> Result<RecordBody, ApiError> {
    let record = state
        .refresher
        .cached_or_refresh()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch version info", e))?;

    Ok(RecordBody::new(record))
}

/// POST /api/refresh
async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<RecordBody, ApiError> {
    if !is_authorized(&headers, state.refresh_secret.as_deref()) {
        warn!("Rejected refresh request with invalid or missing secret");
        return Err(ApiError::Unauthorized);
    }

    info!("Manual refresh requested");
    let record = state
        .refresher
        .refresh()
        .await
        .map_err(|e| ApiError::internal("Error refreshing", e))?;

    Ok(RecordBody::new(record).with_message("Version data refreshed"))
}

/// Checks `Authorization: Bearer <token>` against the configured secret
fn is_authorized(headers: &HeaderMap, secret: Option<&str>) -> bool {
    let Some(secret) = secret else {
        return false;
    };

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| !token.is_empty() && token.as_bytes() == secret.as_bytes())
}

async fn info_method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed {
        allowed: Method::GET,
    }
}

async fn refresh_method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed {
        allowed: Method::POST,
    }
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use rstest::rstest;

    fn headers_with(authorization: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = authorization {
            headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[rstest]
    #[case(Some("Bearer s3cret"), Some("s3cret"), true)]
    #[case(Some("Bearer wrong"), Some("s3cret"), false)]
    #[case(Some("Bearer s3cret "), Some("s3cret"), false)]
    #[case(Some("bearer s3cret"), Some("s3cret"), false)]
    #[case(Some("s3cret"), Some("s3cret"), false)]
    #[case(Some("Bearer "), Some(""), false)]
    #[case(None, Some("s3cret"), false)]
    #[case(Some("Bearer s3cret"), None, false)]
    fn is_authorized_compares_bearer_token_exactly(
        #[case] authorization: Option<&str>,
        #[case] secret: Option<&str>,
        #[case] expected: bool,
    ) {
        assert_eq!(is_authorized(&headers_with(authorization), secret), expected);
    }
}
