//! Integration tests for Gifticon Wallet.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gifticon-integration-tests
//! ```
//!
//! Everything runs in-process: the wallet API and a mock OCR provider are
//! served on ephemeral ports and exercised over HTTP with `reqwest`.
//!
//! # Test Categories
//!
//! - `wallet_api` - Voucher list, registration, detail, share and settings
//! - `scan_api` - Camera and gallery uploads
//! - `recognition` - Provider calls against the mock OCR server

#![allow(clippy::missing_panics_doc)]

use std::io::Cursor;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::NaiveDate;
use gifticon_wallet::AppState;
use gifticon_wallet::clock::{FixedClock, SharedClock};
use gifticon_wallet::config::{OcrEndpoints, WalletConfig};
use gifticon_wallet::db::{JsonFileVoucherRepository, MemoryVoucherRepository, VoucherRepository};
use gifticon_wallet::recognition::{PlaceholderProvider, Recognizer};
use gifticon_wallet::routes;
use gifticon_wallet::settings::{
    JsonFileSettingsStore, MemorySettingsStore, OcrSettings, SettingsStore,
};
use image::{ImageFormat, RgbImage};
use serde_json::{Value, json};

/// API key the mock OCR server accepts.
pub const MOCK_API_KEY: &str = "test-key";

/// Seed for the placeholder generator so fallbacks are reproducible.
pub const PLACEHOLDER_SEED: u64 = 7;

/// Calendar date constructor for fixtures.
#[must_use]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// A blank PNG of the given size.
#[must_use]
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    RgbImage::new(width, height)
        .write_to(&mut out, ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

/// Serve a router on an ephemeral local port.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    addr
}

/// A running wallet API with a fixed date.
pub struct TestWallet {
    pub state: AppState,
    pub client: reqwest::Client,
    base_url: String,
}

impl TestWallet {
    /// In-memory wallet with default OCR endpoints.
    pub async fn start(today: NaiveDate) -> Self {
        Self::start_with(today, OcrEndpoints::default(), None).await
    }

    /// Wallet with custom endpoints, stored as JSON in `data_dir` when given.
    pub async fn start_with(
        today: NaiveDate,
        endpoints: OcrEndpoints,
        data_dir: Option<&Path>,
    ) -> Self {
        let clock: SharedClock = Arc::new(FixedClock::on(today));
        let (repo, settings): (Arc<dyn VoucherRepository>, Arc<dyn SettingsStore>) = match data_dir
        {
            Some(dir) => (
                Arc::new(JsonFileVoucherRepository::in_dir(dir)),
                Arc::new(JsonFileSettingsStore::in_dir(dir)),
            ),
            None => (
                Arc::new(MemoryVoucherRepository::new()),
                Arc::new(MemorySettingsStore::new()),
            ),
        };

        let recognizer = Recognizer::new(settings.clone(), endpoints.clone(), clock.clone())
            .with_placeholder(PlaceholderProvider::seeded(PLACEHOLDER_SEED, clock.clone()));

        let mut config = WalletConfig::in_memory();
        config.data_dir = data_dir.map(Path::to_path_buf);
        config.endpoints = endpoints;

        let state = AppState::with_recognizer(config, repo, settings, clock, recognizer);
        state
            .vouchers()
            .refresh()
            .await
            .expect("load vouchers");

        let addr = spawn(routes::app(state.clone())).await;
        Self {
            state,
            client: reqwest::Client::new(),
            base_url: format!("http://{addr}"),
        }
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Insert the three sample vouchers.
    pub async fn seed_samples(&self) {
        self.state
            .vouchers()
            .seed_samples()
            .await
            .expect("seed samples");
    }

    /// Save OCR settings directly in the store.
    pub async fn configure_ocr(&self, provider: &str, api_key: &str) {
        let settings =
            OcrSettings::from_input(Some(provider), Some(api_key)).expect("valid settings");
        self.state
            .settings()
            .save(settings)
            .await
            .expect("save settings");
    }

    /// GET a path and decode the JSON body.
    pub async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("request failed");
        let status = resp.status();
        (status, resp.json().await.expect("JSON body"))
    }

    /// POST a JSON body (or nothing) and decode the JSON response.
    pub async fn post_json(&self, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let resp = request.send().await.expect("request failed");
        let status = resp.status();
        (status, resp.json().await.expect("JSON body"))
    }
}

// ============================================================================
// Mock OCR provider
// ============================================================================

/// Answers the mock chat endpoints return, keyed by route.
pub const OPENAI_JSON_ANSWER: &str = r#"{"store":"스타벅스","name":"아메리카노 T","amount":4500,"expiryDate":"2025-12-31"}"#;
pub const OPENAI_FENCED_ANSWER: &str =
    "```json\n{\"store\":\"CU\",\"name\":\"모바일 상품권\",\"amount\":\"10,000원\",\"expiryDate\":\"2026.01.15\"}\n```";
pub const OPENAI_TEXT_ANSWER: &str = "이 기프티콘은 15,000원 상품권이며 유효기간은 2025/09/30 입니다.";
pub const GOOGLE_TEXT: &str = "GS25\n모바일 교환권\n5,000원\n유효기간 2025.08.20";

/// Endpoints pointing at a running mock OCR server.
#[must_use]
pub fn mock_endpoints(addr: SocketAddr, openai_route: &str) -> OcrEndpoints {
    OcrEndpoints {
        openai_url: format!("http://{addr}/openai/{openai_route}"),
        google_url: format!("http://{addr}/google"),
        ..OcrEndpoints::default()
    }
}

/// Router imitating the `OpenAI` chat completions and Google Vision APIs.
pub fn mock_ocr_router() -> Router {
    Router::new()
        .route(
            "/openai/json",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                chat_reply(&headers, &body, OPENAI_JSON_ANSWER)
            }),
        )
        .route(
            "/openai/fenced",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                chat_reply(&headers, &body, OPENAI_FENCED_ANSWER)
            }),
        )
        .route(
            "/openai/text",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                chat_reply(&headers, &body, OPENAI_TEXT_ANSWER)
            }),
        )
        .route(
            "/openai/overloaded",
            post(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({"error": {"message": "The engine is currently overloaded"}})),
                )
            }),
        )
        .route("/google", post(google_reply))
}

fn api_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"error": {"message": message}}))).into_response()
}

fn chat_reply(headers: &HeaderMap, body: &Value, answer: &str) -> Response {
    let expected = format!("Bearer {MOCK_API_KEY}");
    if headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        != Some(expected.as_str())
    {
        return api_error(StatusCode::UNAUTHORIZED, "Incorrect API key provided");
    }

    let image_url = body
        .pointer("/messages/0/content/1/image_url/url")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if !image_url.starts_with("data:image/") {
        return api_error(StatusCode::BAD_REQUEST, "missing image part");
    }

    Json(json!({
        "choices": [{"message": {"role": "assistant", "content": answer}}]
    }))
    .into_response()
}

async fn google_reply(
    Query(query): Query<std::collections::HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if query.get("key").map(String::as_str) != Some(MOCK_API_KEY) {
        return api_error(StatusCode::FORBIDDEN, "API key not valid");
    }

    let feature = body
        .pointer("/requests/0/features/0/type")
        .and_then(Value::as_str);
    let has_content = body
        .pointer("/requests/0/image/content")
        .and_then(Value::as_str)
        .is_some_and(|c| !c.is_empty());
    if feature != Some("TEXT_DETECTION") || !has_content {
        return api_error(StatusCode::BAD_REQUEST, "invalid annotate request");
    }

    Json(json!({
        "responses": [{"fullTextAnnotation": {"text": GOOGLE_TEXT}}]
    }))
    .into_response()
}
