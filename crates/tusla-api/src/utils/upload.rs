//! Multipart upload helpers
//!
//! Registration and post creation both use the same shape: one JSON part
//! carrying the request payload plus zero or more image parts. The helpers
//! here collect and validate that shape.

use axum::extract::Multipart;
use serde::de::DeserializeOwned;
use validator::Validate;

use tusla_core::AppError;

use crate::error::HttpAppError;
use crate::validation::validate_image;

/// A validated image from a multipart request
pub struct UploadedImage {
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

/// Collect the JSON part named `data_field` and every image part named
/// `image_field` from a multipart request. Images are validated as they
/// arrive; unknown parts are ignored.
pub async fn read_multipart_payload(
    multipart: &mut Multipart,
    data_field: &str,
    image_field: &str,
    max_images: usize,
) -> Result<(Vec<u8>, Vec<UploadedImage>), HttpAppError> {
    let mut payload: Option<Vec<u8>> = None;
    let mut images = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        if name == data_field {
            payload = Some(field.bytes().await?.to_vec());
        } else if name == image_field {
            if images.len() >= max_images {
                return Err(HttpAppError(AppError::BadRequest(format!(
                    "At most {} images are allowed",
                    max_images
                ))));
            }
            let data = field.bytes().await?.to_vec();
            let content_type = validate_image(&data)?;
            images.push(UploadedImage { content_type, data });
        }
    }

    let payload = payload.ok_or_else(|| {
        HttpAppError(AppError::BadRequest(format!(
            "Missing required field '{}'",
            data_field
        )))
    })?;

    Ok((payload, images))
}

/// Deserialize and validate a JSON payload from a multipart part.
pub fn parse_json_payload<T>(bytes: &[u8]) -> Result<T, HttpAppError>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_json::from_slice(bytes)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON payload: {}", e)))?;
    value.validate()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tusla_core::models::CreatePostRequest;

    #[test]
    fn test_parse_json_payload_valid() {
        let bytes =
            br#"{"title": "Help needed", "description": "moving boxes", "post_type": "request"}"#;
        let request: CreatePostRequest = parse_json_payload(bytes).unwrap();
        assert_eq!(request.title, "Help needed");
    }

    #[test]
    fn test_parse_json_payload_malformed() {
        let result: Result<CreatePostRequest, _> = parse_json_payload(b"{not json");
        let HttpAppError(err) = result.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_parse_json_payload_fails_validation() {
        let bytes = br#"{"title": "", "description": "d", "post_type": "request"}"#;
        let result: Result<CreatePostRequest, _> = parse_json_payload(bytes);
        let HttpAppError(err) = result.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
