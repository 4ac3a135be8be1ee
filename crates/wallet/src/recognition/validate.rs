//! Cheap shape check run before recognition in the gallery flow.

use std::io::Cursor;

use image::ImageReader;

const MIN_ASPECT_RATIO: f64 = 0.5;
const MAX_ASPECT_RATIO: f64 = 2.0;
const MIN_WIDTH: u32 = 200;
const MIN_HEIGHT: u32 = 100;

/// Whether the image looks like it could be a voucher.
///
/// Reads only the header dimensions. Accepts aspect ratios between 1:2 and
/// 2:1 with at least 200x100 pixels; anything undecodable is rejected.
#[must_use]
pub fn validate_gift_card_image(bytes: &[u8]) -> bool {
    let Some((width, height)) = image_dimensions(bytes) else {
        return false;
    };
    if height == 0 {
        return false;
    }
    let ratio = f64::from(width) / f64::from(height);
    (MIN_ASPECT_RATIO..=MAX_ASPECT_RATIO).contains(&ratio)
        && width >= MIN_WIDTH
        && height >= MIN_HEIGHT
}

/// Decode `(width, height)` from the image header.
pub(crate) fn image_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}
