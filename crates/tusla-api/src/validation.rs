//! Uploaded image validation
//!
//! The client-supplied content type header is never trusted. The actual type
//! is determined from the file's leading bytes and checked against the image
//! allowlist.

use tusla_core::constants::MAX_IMAGE_SIZE_BYTES;
use tusla_core::AppError;

/// Detect an image content type from magic bytes. Returns `None` for
/// anything that is not a recognized image format.
pub fn sniff_image_content_type(data: &[u8]) -> Option<&'static str> {
    if data.len() < 12 {
        return None;
    }
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Some("image/png");
    }
    if data.starts_with(b"GIF8") {
        return Some("image/gif");
    }
    if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    None
}

/// File extension for a detected image content type.
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/gif" => ".gif",
        "image/webp" => ".webp",
        _ => ".bin",
    }
}

/// Validate an uploaded image and return its detected content type.
pub fn validate_image(data: &[u8]) -> Result<&'static str, AppError> {
    if data.is_empty() {
        return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
    }

    if data.len() > MAX_IMAGE_SIZE_BYTES {
        return Err(AppError::PayloadTooLarge(format!(
            "Image is {} bytes, the limit is {} bytes",
            data.len(),
            MAX_IMAGE_SIZE_BYTES
        )));
    }

    sniff_image_content_type(data).ok_or_else(|| {
        AppError::InvalidInput(
            "File is not a supported image format (jpeg, png, gif, webp)".to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(prefix: &[u8]) -> Vec<u8> {
        let mut data = prefix.to_vec();
        data.resize(64, 0);
        data
    }

    #[test]
    fn test_sniff_known_formats() {
        assert_eq!(
            sniff_image_content_type(&padded(&[0xFF, 0xD8, 0xFF, 0xE0])),
            Some("image/jpeg")
        );
        assert_eq!(
            sniff_image_content_type(&padded(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])),
            Some("image/png")
        );
        assert_eq!(
            sniff_image_content_type(&padded(b"GIF89a")),
            Some("image/gif")
        );

        let mut webp = b"RIFF".to_vec();
        webp.extend_from_slice(&[0x24, 0x00, 0x00, 0x00]);
        webp.extend_from_slice(b"WEBPVP8 ");
        assert_eq!(sniff_image_content_type(&webp), Some("image/webp"));
    }

    #[test]
    fn test_sniff_rejects_non_images() {
        assert_eq!(sniff_image_content_type(&padded(b"%PDF-1.4")), None);
        assert_eq!(sniff_image_content_type(&padded(b"MZ")), None);
        assert_eq!(sniff_image_content_type(b"short"), None);
    }

    #[test]
    fn test_validate_image_rejects_empty() {
        let err = validate_image(&[]).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_validate_image_rejects_oversize() {
        let mut data = padded(&[0xFF, 0xD8, 0xFF, 0xE0]);
        data.resize(MAX_IMAGE_SIZE_BYTES + 1, 0);
        let err = validate_image(&data).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("image/jpeg"), ".jpg");
        assert_eq!(extension_for("image/webp"), ".webp");
        assert_eq!(extension_for("application/pdf"), ".bin");
    }
}
