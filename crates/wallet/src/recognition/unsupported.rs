//! Providers that can be selected in settings but have no integration.

use async_trait::async_trait;
use gifticon_core::{ExtractedInfo, OcrProvider};

use super::{ImageInput, RecognitionError, RecognitionProvider};

/// AWS Textract and Azure Computer Vision. Always fails with
/// [`RecognitionError::Unsupported`].
pub struct UnsupportedProvider {
    provider: OcrProvider,
}

impl UnsupportedProvider {
    #[must_use]
    pub const fn new(provider: OcrProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl RecognitionProvider for UnsupportedProvider {
    fn name(&self) -> &'static str {
        match self.provider {
            OcrProvider::OpenAi => "openai",
            OcrProvider::Google => "google",
            OcrProvider::Aws => "aws",
            OcrProvider::Azure => "azure",
        }
    }

    async fn extract(&self, _image: &ImageInput) -> Result<ExtractedInfo, RecognitionError> {
        Err(RecognitionError::Unsupported(self.provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_unsupported() {
        let provider = UnsupportedProvider::new(OcrProvider::Azure);
        let err = provider
            .extract(&ImageInput::new(vec![1, 2, 3]))
            .await
            .expect_err("unsupported");
        assert!(matches!(err, RecognitionError::Unsupported(OcrProvider::Azure)));
        assert_eq!(provider.name(), "azure");
    }
}
