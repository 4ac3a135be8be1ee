//! Image recognition for voucher registration.
//!
//! Turns a photo of a voucher into best-effort [`ExtractedInfo`] that prefills
//! the registration form. The provider is chosen from the stored OCR settings
//! at call time:
//!
//! | Settings              | Provider                                   |
//! |-----------------------|--------------------------------------------|
//! | none saved            | [`PlaceholderProvider`]                    |
//! | `openai`              | [`OpenAiProvider`]                         |
//! | `google`              | [`GoogleVisionProvider`]                   |
//! | `aws`, `azure`        | [`UnsupportedProvider`] (always errors)    |
//!
//! [`Recognizer::extract_gift_card_info`] never fails. Any provider error is
//! logged and answered with placeholder values, and the returned
//! [`RecognitionSource`] says which path produced the fields.
//!
//! Calls are made once, without retries or timeouts.

pub mod error;
pub mod google;
pub mod openai;
pub mod parse;
pub mod placeholder;
pub mod unsupported;
pub mod validate;

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use gifticon_core::{ExtractedInfo, OcrProvider};
use serde::Serialize;
use tracing::instrument;

use crate::clock::SharedClock;
use crate::config::OcrEndpoints;
use crate::settings::{OcrSettings, SettingsStore};

pub use error::RecognitionError;
pub use google::GoogleVisionProvider;
pub use openai::OpenAiProvider;
pub use placeholder::PlaceholderProvider;
pub use unsupported::UnsupportedProvider;
pub use validate::validate_gift_card_image;

/// MIME type assumed when neither the caller nor the bytes say otherwise.
const FALLBACK_MIME: &str = "image/jpeg";

/// An uploaded or captured image.
#[derive(Debug, Clone, Default)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    /// MIME type reported by the uploader, if any.
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

impl ImageInput {
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Whether this is an image at all: by declared type, else by sniffing the bytes.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content_type.as_deref().map_or_else(
            || image::guess_format(&self.bytes).is_ok(),
            |ct| ct.starts_with("image/"),
        )
    }

    /// Declared image MIME type, else sniffed from the bytes.
    #[must_use]
    pub fn mime_type(&self) -> String {
        self.content_type
            .as_deref()
            .filter(|ct| ct.starts_with("image/"))
            .map(ToString::to_string)
            .or_else(|| {
                image::guess_format(&self.bytes)
                    .ok()
                    .map(|format| format.to_mime_type().to_string())
            })
            .unwrap_or_else(|| FALLBACK_MIME.to_string())
    }

    /// Standard base64 of the raw bytes.
    #[must_use]
    pub fn base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// `data:` URL embedding the image.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), self.base64())
    }
}

/// A source of voucher fields for an image.
#[async_trait]
pub trait RecognitionProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extract whatever voucher fields the provider can read.
    async fn extract(&self, image: &ImageInput) -> Result<ExtractedInfo, RecognitionError>;
}

/// Why placeholder values were returned instead of provider output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No provider and key saved.
    NotConfigured,
    /// The saved provider has no integration.
    Unsupported,
    /// The provider call or the settings lookup failed.
    Failed,
}

/// Which path produced a recognition result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecognitionSource {
    Provider { provider: OcrProvider },
    Placeholder { reason: FallbackReason },
}

impl RecognitionSource {
    #[must_use]
    pub const fn is_placeholder(self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

/// Extracted fields plus where they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recognition {
    pub info: ExtractedInfo,
    pub source: RecognitionSource,
}

/// Picks a provider from the stored settings and falls back to placeholders.
pub struct Recognizer {
    settings: Arc<dyn SettingsStore>,
    endpoints: OcrEndpoints,
    http: reqwest::Client,
    placeholder: PlaceholderProvider,
}

impl Recognizer {
    #[must_use]
    pub fn new(settings: Arc<dyn SettingsStore>, endpoints: OcrEndpoints, clock: SharedClock) -> Self {
        Self {
            settings,
            endpoints,
            http: reqwest::Client::new(),
            placeholder: PlaceholderProvider::new(clock),
        }
    }

    /// Replace the placeholder, e.g. with a seeded one.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: PlaceholderProvider) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Build the provider for the given settings.
    #[must_use]
    pub fn provider_for(&self, settings: &OcrSettings) -> Box<dyn RecognitionProvider> {
        match settings.provider {
            OcrProvider::OpenAi => Box::new(OpenAiProvider::new(
                self.http.clone(),
                settings.api_key.clone(),
                self.endpoints.openai_url.clone(),
                self.endpoints.openai_model.clone(),
            )),
            OcrProvider::Google => Box::new(GoogleVisionProvider::new(
                self.http.clone(),
                settings.api_key.clone(),
                self.endpoints.google_url.clone(),
            )),
            provider @ (OcrProvider::Aws | OcrProvider::Azure) => {
                Box::new(UnsupportedProvider::new(provider))
            }
        }
    }

    /// Extract voucher fields from an image. Never fails.
    #[instrument(skip_all, fields(file_name = ?image.file_name))]
    pub async fn extract_gift_card_info(&self, image: &ImageInput) -> Recognition {
        let settings = match self.settings.load().await {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                tracing::info!("OCR provider not configured, using placeholder recognition");
                return self.fallback(image, FallbackReason::NotConfigured).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read OCR settings, using placeholder recognition");
                return self.fallback(image, FallbackReason::Failed).await;
            }
        };

        let provider = self.provider_for(&settings);
        tracing::debug!(provider = provider.name(), "Starting gift card extraction");

        match provider.extract(image).await {
            Ok(info) => Recognition {
                info,
                source: RecognitionSource::Provider {
                    provider: settings.provider,
                },
            },
            Err(e @ RecognitionError::Unsupported(_)) => {
                tracing::warn!(provider = provider.name(), error = %e, "Falling back to placeholder recognition");
                self.fallback(image, FallbackReason::Unsupported).await
            }
            Err(e) => {
                tracing::warn!(provider = provider.name(), error = %e, "Recognition failed, falling back to placeholder");
                self.fallback(image, FallbackReason::Failed).await
            }
        }
    }

    async fn fallback(&self, image: &ImageInput, reason: FallbackReason) -> Recognition {
        let info = self.placeholder.extract(image).await.unwrap_or_default();
        Recognition {
            info,
            source: RecognitionSource::Placeholder { reason },
        }
    }
}
