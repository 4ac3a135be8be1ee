//! Error types for recognition providers.

use gifticon_core::OcrProvider;
use thiserror::Error;

/// Errors that can occur when extracting voucher fields from an image.
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message or raw response body.
        message: String,
    },

    /// Rate limited by the provider.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The API key was rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse the provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The provider has no integration yet.
    #[error("{} integration not yet implemented", .0.label())]
    Unsupported(OcrProvider),
}

/// Error envelope shared by the `OpenAI` and Google APIs.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    pub message: String,
}

impl RecognitionError {
    /// Map a non-success provider response to an error.
    pub(crate) async fn from_status(response: reqwest::Response) -> Self {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Self::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Self::Unauthorized("Invalid API key".to_string());
        }

        match response.text().await {
            Ok(body) => {
                let message = serde_json::from_str::<ApiErrorResponse>(&body)
                    .map_or(body, |parsed| parsed.error.message);
                Self::Api {
                    status: status.as_u16(),
                    message,
                }
            }
            Err(e) => Self::Http(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognition_error_display() {
        let err = RecognitionError::RateLimited(30);
        assert_eq!(err.to_string(), "rate limited, retry after 30 seconds");

        let err = RecognitionError::Unsupported(OcrProvider::Aws);
        assert_eq!(err.to_string(), "AWS Textract integration not yet implemented");

        let err = RecognitionError::Api {
            status: 400,
            message: "bad image".to_string(),
        };
        assert_eq!(err.to_string(), "API error (400): bad image");
    }

    #[test]
    fn test_api_error_deserialization() {
        // OpenAI and Google both nest the message under "error".
        let openai = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        let google = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;

        let parsed: ApiErrorResponse = serde_json::from_str(openai).expect("deserialize");
        assert_eq!(parsed.error.message, "Incorrect API key provided");
        let parsed: ApiErrorResponse = serde_json::from_str(google).expect("deserialize");
        assert_eq!(parsed.error.message, "API key not valid.");
    }
}
