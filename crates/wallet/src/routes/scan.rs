//! Image upload endpoints for the camera and gallery flows.
//!
//! Both take `multipart/form-data`. Every part with a body is treated as an
//! upload; the part's content type and file name are passed through.

use axum::{
    Json,
    extract::{Multipart, State},
};

use crate::error::AppError;
use crate::recognition::ImageInput;
use crate::services::{GalleryResult, RegistrationDraft, scan_gallery, scan_single};
use crate::state::AppState;

async fn read_images(mut multipart: Multipart) -> Result<Vec<ImageInput>, AppError> {
    let mut images = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid upload: {e}")))?
    {
        let content_type = field.content_type().map(ToString::to_string);
        let file_name = field.file_name().map(ToString::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("invalid upload: {e}")))?;
        if bytes.is_empty() {
            continue;
        }

        let mut image = ImageInput::new(bytes.to_vec());
        image.content_type = content_type;
        image.file_name = file_name;
        images.push(image);
    }
    Ok(images)
}

/// Recognise a single captured image.
///
/// POST /api/scan
///
/// # Errors
///
/// Returns `AppError::BadRequest` if no image was uploaded.
pub async fn scan(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<RegistrationDraft>, AppError> {
    let image = read_images(multipart)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::BadRequest("no image uploaded".to_string()))?;
    Ok(Json(scan_single(state.recognizer(), image).await))
}

/// Validate and recognise a batch of gallery images.
///
/// POST /api/scan/gallery
///
/// # Errors
///
/// Returns `AppError::Scan(NoImages)` if nothing uploaded is an image.
pub async fn gallery(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Vec<GalleryResult>>, AppError> {
    let images = read_images(multipart).await?;
    Ok(Json(scan_gallery(state.recognizer(), images).await?))
}
