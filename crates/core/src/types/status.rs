//! Status enums for vouchers and recognition settings.

use serde::{Deserialize, Serialize};

/// Expiry badge category for a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    /// More than a week left. No badge is shown.
    Normal,
    /// Expires within the week.
    Soon,
    /// Expires today or tomorrow.
    Today,
    /// Expiry date is in the past.
    Expired,
    /// Already redeemed.
    Used,
}

impl std::fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Soon => write!(f, "soon"),
            Self::Today => write!(f, "today"),
            Self::Expired => write!(f, "expired"),
            Self::Used => write!(f, "used"),
        }
    }
}

/// External OCR provider selected in the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrProvider {
    /// `OpenAI` GPT-4 Vision (chat completions with an image part).
    #[serde(rename = "openai")]
    OpenAi,
    /// Google Cloud Vision `TEXT_DETECTION`.
    Google,
    /// AWS Textract. Not integrated yet.
    Aws,
    /// Azure Computer Vision. Not integrated yet.
    Azure,
}

impl OcrProvider {
    /// All providers, in the order the settings screen lists them.
    pub const ALL: [Self; 4] = [Self::OpenAi, Self::Google, Self::Aws, Self::Azure];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI GPT-4 Vision",
            Self::Google => "Google Cloud Vision",
            Self::Aws => "AWS Textract",
            Self::Azure => "Azure Computer Vision",
        }
    }
}

impl std::fmt::Display for OcrProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Google => write!(f, "google"),
            Self::Aws => write!(f, "aws"),
            Self::Azure => write!(f, "azure"),
        }
    }
}

impl std::str::FromStr for OcrProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "google" => Ok(Self::Google),
            "aws" => Ok(Self::Aws),
            "azure" => Ok(Self::Azure),
            _ => Err(format!("invalid OCR provider: {s}")),
        }
    }
}
