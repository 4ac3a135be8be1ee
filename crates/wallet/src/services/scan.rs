//! Camera and gallery registration flows.
//!
//! Both flows turn images into registration drafts: recognised fields that
//! prefill the form, which the user confirms before anything is saved.

use gifticon_core::ExtractedInfo;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::recognition::{ImageInput, RecognitionSource, Recognizer, validate_gift_card_image};

/// Errors from the scan flows.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Nothing in the selection was an image.
    #[error("no images selected")]
    NoImages,
}

/// Form prefill produced by the camera flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationDraft {
    pub info: ExtractedInfo,
    /// Reference to the captured image (its file name, when known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub source: RecognitionSource,
}

/// One recognised image from a gallery selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryResult {
    pub file_name: String,
    pub info: ExtractedInfo,
    pub source: RecognitionSource,
}

/// Camera flow: recognise a single capture without validating it.
#[instrument(skip_all, fields(file_name = ?image.file_name))]
pub async fn scan_single(recognizer: &Recognizer, image: ImageInput) -> RegistrationDraft {
    let recognition = recognizer.extract_gift_card_info(&image).await;
    RegistrationDraft {
        info: recognition.info,
        image: image.file_name,
        source: recognition.source,
    }
}

/// Gallery flow: keep image files, validate and recognise them one by one.
///
/// Images that fail validation are skipped, so the result can be shorter
/// than the selection (or empty). Results keep the selection order.
///
/// # Errors
///
/// Returns `ScanError::NoImages` if the selection contains no images.
#[instrument(skip_all, fields(selected = images.len()))]
pub async fn scan_gallery(
    recognizer: &Recognizer,
    images: Vec<ImageInput>,
) -> Result<Vec<GalleryResult>, ScanError> {
    let images: Vec<ImageInput> = images.into_iter().filter(ImageInput::is_image).collect();
    if images.is_empty() {
        return Err(ScanError::NoImages);
    }

    let total = images.len();
    let mut results = Vec::with_capacity(total);
    for (index, image) in images.into_iter().enumerate() {
        let file_name = image
            .file_name
            .clone()
            .unwrap_or_else(|| format!("image-{}", index + 1));

        if !validate_gift_card_image(&image.bytes) {
            debug!(%file_name, "Skipping image that does not look like a voucher");
            continue;
        }

        let recognition = recognizer.extract_gift_card_info(&image).await;
        results.push(GalleryResult {
            file_name,
            info: recognition.info,
            source: recognition.source,
        });
    }

    info!(total, recognised = results.len(), "Gallery scan finished");
    Ok(results)
}
