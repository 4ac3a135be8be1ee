//! Image recognition commands.
//!
//! By default the files go through the gallery flow: non-images are dropped,
//! images that do not look like vouchers are skipped and the rest are
//! recognised in order. `--camera` recognises the first file as-is.
//!
//! Nothing is saved; the printed drafts are meant for `gifticon add`.

use std::path::{Path, PathBuf};

use gifticon_core::ExtractedInfo;
use gifticon_wallet::AppState;
use gifticon_wallet::recognition::{ImageInput, RecognitionSource};
use gifticon_wallet::services::{ScanError, scan_gallery, scan_single};
use image::ImageFormat;
use thiserror::Error;
use tracing::{info, warn};

use super::print_lines;

/// Errors from scan commands.
#[derive(Debug, Error)]
pub enum ScanCommandError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0}")]
    Scan(#[from] ScanError),
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load a file, taking the content type from its extension when known.
async fn load_image(path: &Path) -> Result<ImageInput, ScanCommandError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ScanCommandError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let mut image = ImageInput::new(bytes);
    if let Ok(format) = ImageFormat::from_path(path) {
        image = image.with_content_type(format.to_mime_type());
    }
    if let Some(name) = path.file_name() {
        image = image.with_file_name(name.to_string_lossy());
    }
    Ok(image)
}

/// Render recognised fields as suggested `gifticon add` arguments.
fn describe(info: &ExtractedInfo, source: RecognitionSource) -> String {
    let origin = match source {
        RecognitionSource::Provider { provider } => provider.to_string(),
        RecognitionSource::Placeholder { .. } => "placeholder".to_string(),
    };
    if info.is_empty() {
        return format!("(nothing recognised, {origin})");
    }

    let mut parts = Vec::new();
    if let Some(name) = &info.name {
        parts.push(format!("-n \"{name}\""));
    }
    if let Some(store) = &info.store {
        parts.push(format!("-s \"{store}\""));
    }
    if let Some(amount) = info.amount {
        parts.push(format!("-a {}", amount.get()));
    }
    if let Some(expiry) = info.expiry_date {
        parts.push(format!("-e {expiry}"));
    }
    format!("{} ({origin})", parts.join(" "))
}

/// Recognise the given files.
///
/// # Errors
///
/// Returns an error if a file cannot be read or, in the gallery flow, none
/// of the files is an image.
pub async fn run(wallet: &AppState, files: &[PathBuf], camera: bool) -> Result<(), ScanCommandError> {
    let mut images = Vec::with_capacity(files.len());
    for path in files {
        images.push(load_image(path).await?);
    }

    if camera {
        let Some(image) = images.into_iter().next() else {
            return Err(ScanError::NoImages.into());
        };
        let draft = scan_single(wallet.recognizer(), image).await;
        if draft.source.is_placeholder() {
            warn!("No OCR provider result, showing placeholder values");
        }
        let name = draft.image.unwrap_or_default();
        return Ok(print_lines([format!("{name}: {}", describe(&draft.info, draft.source))])?);
    }

    let results = scan_gallery(wallet.recognizer(), images).await?;
    if results.is_empty() {
        info!("None of the images looked like a voucher");
    }
    Ok(print_lines(results.iter().map(|result| {
        format!(
            "{}: {}",
            result.file_name,
            describe(&result.info, result.source)
        )
    }))?)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use gifticon_core::{OcrProvider, Won};
    use gifticon_wallet::recognition::FallbackReason;

    use super::*;

    #[test]
    fn test_describe_full_result() {
        let info = ExtractedInfo {
            store: Some("스타벅스".to_string()),
            name: Some("아메리카노".to_string()),
            amount: Some(Won::new(4500).expect("amount")),
            expiry_date: NaiveDate::from_ymd_opt(2025, 12, 31),
        };
        let text = describe(
            &info,
            RecognitionSource::Provider {
                provider: OcrProvider::OpenAi,
            },
        );
        assert!(text.starts_with("-n \"아메리카노\" -s \"스타벅스\" -a 4500 -e 2025-12-31 ("));
    }

    #[test]
    fn test_describe_empty_placeholder() {
        let text = describe(
            &ExtractedInfo::default(),
            RecognitionSource::Placeholder {
                reason: FallbackReason::NotConfigured,
            },
        );
        assert_eq!(text, "(nothing recognised, placeholder)");
    }

    #[tokio::test]
    async fn test_load_image_missing_file() {
        let result = load_image(Path::new("/nonexistent/coupon.png")).await;
        assert!(matches!(result, Err(ScanCommandError::Read { .. })));
    }
}
