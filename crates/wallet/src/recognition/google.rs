//! Google Cloud Vision `TEXT_DETECTION` recognition.

use async_trait::async_trait;
use gifticon_core::ExtractedInfo;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use super::parse::parse_extracted_text;
use super::{ImageInput, RecognitionError, RecognitionProvider};

const MAX_RESULTS: u32 = 10;

/// Runs OCR on the image and pattern-matches the detected text.
pub struct GoogleVisionProvider {
    http: reqwest::Client,
    api_key: SecretString,
    url: String,
}

impl GoogleVisionProvider {
    #[must_use]
    pub const fn new(http: reqwest::Client, api_key: SecretString, url: String) -> Self {
        Self { http, api_key, url }
    }

    fn endpoint(&self) -> Result<Url, RecognitionError> {
        let mut url = Url::parse(&self.url)
            .map_err(|e| RecognitionError::Parse(format!("Invalid Vision endpoint: {e}")))?;
        url.query_pairs_mut()
            .append_pair("key", self.api_key.expose_secret());
        Ok(url)
    }
}

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest {
    image: VisionImage,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct VisionImage {
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    feature_type: &'static str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    full_text_annotation: Option<TextAnnotation>,
    #[serde(default)]
    error: Option<VisionStatus>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct VisionStatus {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

#[async_trait]
impl RecognitionProvider for GoogleVisionProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    #[instrument(skip(self, image))]
    async fn extract(&self, image: &ImageInput) -> Result<ExtractedInfo, RecognitionError> {
        let request = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: VisionImage {
                    content: image.base64(),
                },
                features: vec![Feature {
                    feature_type: "TEXT_DETECTION",
                    max_results: MAX_RESULTS,
                }],
            }],
        };

        let response = self
            .http
            .post(self.endpoint()?)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RecognitionError::from_status(response).await);
        }

        let body = response.text().await?;
        let annotated: AnnotateResponse = serde_json::from_str(&body)
            .map_err(|e| RecognitionError::Parse(format!("Failed to parse response: {e}")))?;

        let first = annotated.responses.into_iter().next();
        if let Some(status) = first.as_ref().and_then(|r| r.error.as_ref()) {
            return Err(RecognitionError::Api {
                status: status.code,
                message: status.message.clone(),
            });
        }

        // No annotation means no text was found in the image.
        let text = first
            .and_then(|r| r.full_text_annotation)
            .map(|a| a.text)
            .unwrap_or_default();

        Ok(parse_extracted_text(&text))
    }
}
