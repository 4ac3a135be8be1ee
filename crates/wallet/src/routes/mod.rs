//! HTTP route handlers for the wallet API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Health check
//!
//! # Vouchers
//! GET    /api/vouchers                    - Active / used / expired + reminders
//! POST   /api/vouchers                    - Register a voucher
//! GET    /api/vouchers/selected           - Voucher open in the detail view
//! DELETE /api/vouchers/selected           - Close the detail view
//! GET    /api/vouchers/{id}               - Detail with badge (opens it)
//! POST   /api/vouchers/{id}/use           - Mark used
//! POST   /api/vouchers/{id}/notification  - Toggle nearby notification
//! GET    /api/vouchers/{id}/share         - Share texts (?message=)
//! GET    /api/notifications               - Expiry reminders
//!
//! # Registration
//! POST   /api/scan                        - Camera capture (multipart)
//! POST   /api/scan/gallery                - Gallery images (multipart)
//!
//! # Settings
//! GET    /api/settings/ocr                - Provider and whether a key is set
//! PUT    /api/settings/ocr                - Save provider and key
//! DELETE /api/settings/ocr                - Clear
//!
//! # Lookups
//! GET    /api/categories                  - Store categories
//! ```

pub mod scan;
pub mod settings;
pub mod vouchers;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use gifticon_core::{StoreCategory, store_categories};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Upload limit for scan requests (a handful of phone photos).
const SCAN_BODY_LIMIT: usize = 25 * 1024 * 1024;

/// Create the voucher routes router.
pub fn voucher_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(vouchers::index).post(vouchers::create))
        .route("/selected", get(vouchers::selected).delete(vouchers::close))
        .route("/{id}", get(vouchers::show))
        .route("/{id}/use", post(vouchers::mark_used))
        .route("/{id}/notification", post(vouchers::toggle_notification))
        .route("/{id}/share", get(vouchers::share))
}

/// Create the scan routes router.
pub fn scan_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(scan::scan))
        .route("/gallery", post(scan::gallery))
        .layer(DefaultBodyLimit::max(SCAN_BODY_LIMIT))
}

/// Create the settings routes router.
pub fn settings_routes() -> Router<AppState> {
    Router::new().route(
        "/ocr",
        get(settings::show)
            .put(settings::update)
            .delete(settings::clear),
    )
}

/// Create all routes for the wallet API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/vouchers", voucher_routes())
        .route("/api/notifications", get(vouchers::notifications))
        .nest("/api/scan", scan_routes())
        .nest("/api/settings", settings_routes())
        .route("/api/categories", get(categories))
}

/// The full application: routes, request tracing and state.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Store categories for filtering.
///
/// GET /api/categories
async fn categories() -> Json<&'static [StoreCategory]> {
    Json(store_categories())
}
