//! `OpenAI` vision recognition via chat completions.

use async_trait::async_trait;
use gifticon_core::{ExtractedInfo, Won};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::parse::{parse_date, parse_text_response};
use super::{ImageInput, RecognitionError, RecognitionProvider};

const MAX_TOKENS: u32 = 300;

const EXTRACTION_PROMPT: &str = "이 이미지에서 기프티콘 정보를 추출해주세요. JSON 형태로 응답하며, \
store(사용처), name(상품명), amount(금액, 숫자만), expiryDate(만료일, YYYY-MM-DD 형식) 필드를 포함해주세요.";

/// Asks a vision model to read the voucher and answer in JSON.
pub struct OpenAiProvider {
    http: reqwest::Client,
    api_key: SecretString,
    url: String,
    model: String,
}

impl OpenAiProvider {
    #[must_use]
    pub const fn new(
        http: reqwest::Client,
        api_key: SecretString,
        url: String,
        model: String,
    ) -> Self {
        Self {
            http,
            api_key,
            url,
            model,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Fields the prompt asks the model for.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelAnswer {
    #[serde(default)]
    store: Option<String>,
    #[serde(default)]
    name: Option<String>,
    /// Number or digit string, depending on the model's mood.
    #[serde(default)]
    amount: Option<serde_json::Value>,
    #[serde(default)]
    expiry_date: Option<String>,
}

impl ModelAnswer {
    fn into_info(self) -> ExtractedInfo {
        let amount = self.amount.and_then(|value| match value {
            serde_json::Value::Number(n) => n.as_i64().and_then(|n| Won::new(n).ok()),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        });

        ExtractedInfo {
            store: non_empty(self.store),
            name: non_empty(self.name),
            amount,
            expiry_date: self.expiry_date.as_deref().and_then(parse_date),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Strip a surrounding Markdown code fence, if any.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Interpret the model's answer: JSON first, then free-text patterns.
#[must_use]
pub fn parse_answer(content: &str) -> ExtractedInfo {
    match serde_json::from_str::<ModelAnswer>(strip_code_fence(content)) {
        Ok(answer) => answer.into_info(),
        Err(e) => {
            tracing::debug!(error = %e, "Model answer is not JSON, falling back to text patterns");
            parse_text_response(content)
        }
    }
}

#[async_trait]
impl RecognitionProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[instrument(skip(self, image), fields(model = %self.model))]
    async fn extract(&self, image: &ImageInput) -> Result<ExtractedInfo, RecognitionError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: EXTRACTION_PROMPT,
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image.data_url(),
                        },
                    },
                ],
            }],
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RecognitionError::from_status(response).await);
        }

        let body = response.text().await?;
        let chat: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| RecognitionError::Parse(format!("Failed to parse response: {e}")))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| RecognitionError::Parse("Response has no message content".to_string()))?;

        Ok(parse_answer(&content))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_plain_json_answer() {
        let info = parse_answer(
            r#"{"store":"스타벅스","name":"아메리카노","amount":4500,"expiryDate":"2025-07-05"}"#,
        );
        assert_eq!(info.store.as_deref(), Some("스타벅스"));
        assert_eq!(info.name.as_deref(), Some("아메리카노"));
        assert_eq!(info.amount.map(|a| a.get()), Some(4500));
        assert_eq!(info.expiry_date, NaiveDate::from_ymd_opt(2025, 7, 5));
    }

    #[test]
    fn test_fenced_json_with_string_amount() {
        let content = "```json\n{\"store\": \"GS25\", \"amount\": \"10,000\", \"expiryDate\": \"2025.08.15\"}\n```";
        let info = parse_answer(content);
        assert_eq!(info.store.as_deref(), Some("GS25"));
        assert_eq!(info.amount.map(|a| a.get()), Some(10000));
        assert_eq!(info.expiry_date, NaiveDate::from_ymd_opt(2025, 8, 15));
        assert!(info.name.is_none());
    }

    #[test]
    fn test_free_text_answer_falls_back_to_patterns() {
        let info = parse_answer("사용처는 CU이고 금액은 5,000원, 만료일은 2025-09-01입니다.");
        assert!(info.store.is_none());
        assert_eq!(info.amount.map(|a| a.get()), Some(5000));
        assert_eq!(info.expiry_date, NaiveDate::from_ymd_opt(2025, 9, 1));
    }

    #[test]
    fn test_blank_and_invalid_fields_are_dropped() {
        let info = parse_answer(r#"{"store":"  ","name":null,"amount":0,"expiryDate":"unknown"}"#);
        assert!(info.is_empty());
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "gpt-4o",
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text { text: "hi" },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: "data:image/png;base64,AAAA".to_string(),
                        },
                    },
                ],
            }],
            max_tokens: MAX_TOKENS,
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["max_tokens"], 300);
        assert_eq!(json["messages"][0]["content"][0]["type"], "text");
        assert_eq!(json["messages"][0]["content"][1]["type"], "image_url");
        assert_eq!(
            json["messages"][0]["content"][1]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
    }
}
