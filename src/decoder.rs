use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageError, ImageFormat, ImageReader, RgbImage};
use thiserror::Error;
use tracing::debug;

use crate::models::ImageSubmission;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unreadable image data: {0}")]
    Image(#[from] ImageError),
}

/// Drops a leading `data:<mime>;base64,` header if the client left it on.
pub fn strip_data_url(data: &str) -> &str {
    let trimmed = data.trim();
    trimmed
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .unwrap_or(trimmed)
}

/// Characters outside the base64 alphabet (line breaks, stray spaces) are
/// skipped before decoding, so MIME-wrapped payloads still decode.
pub fn decode_base64(data: &str) -> Result<Vec<u8>, DecodeError> {
    let alphabet_only: Vec<u8> = strip_data_url(data)
        .bytes()
        .filter(|&b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
        .collect();
    Ok(STANDARD.decode(alphabet_only)?)
}

/// Decodes the submitted payload into an 8-bit RGB image.
///
/// The format is sniffed from the bytes; `mime_type` is only compared
/// against it for diagnostics.
pub fn decode_image(submission: &ImageSubmission) -> Result<RgbImage, DecodeError> {
    let bytes = decode_base64(&submission.data)?;
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(ImageError::IoError)?;

    if let (Some(detected), Some(declared)) = (
        reader.format(),
        ImageFormat::from_mime_type(&submission.mime_type),
    ) {
        if detected != declared {
            debug!(
                "Declared mime type {} does not match detected format {:?}",
                submission.mime_type, detected
            );
        }
    }

    let image = reader.decode()?.to_rgb8();
    debug!("Decoded {}x{} image", image.width(), image.height());
    Ok(image)
}
