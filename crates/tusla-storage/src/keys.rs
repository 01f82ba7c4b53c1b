//! Object key and public URL construction

use chrono::Utc;
use uuid::Uuid;

/// Build an object key for an uploaded image.
///
/// Keys are grouped by prefix and owner, with a nanosecond timestamp and a
/// random component so repeated uploads never collide:
/// `{prefix}/{owner_id}/{timestamp}_{random}{ext}`
pub fn generate_key(prefix: &str, owner_id: Uuid, extension: &str) -> String {
    let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!(
        "{}/{}/{}_{}{}",
        prefix,
        owner_id,
        timestamp,
        Uuid::new_v4(),
        extension
    )
}

/// Public URL for an object.
///
/// With a custom base (MinIO, DigitalOcean Spaces) the path style is
/// `{base}/{bucket}/{key}`. Without one, the standard AWS S3 virtual-hosted
/// form is used.
pub fn public_url(base: Option<&str>, bucket: &str, region: &str, key: &str) -> String {
    match base {
        Some(base) => format!("{}/{}/{}", base.trim_end_matches('/'), bucket, key),
        None => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_key_shape() {
        let owner = Uuid::new_v4();
        let key = generate_key("user_profiles", owner, ".png");
        assert!(key.starts_with(&format!("user_profiles/{}/", owner)));
        assert!(key.ends_with(".png"));

        let other = generate_key("user_profiles", owner, ".png");
        assert_ne!(key, other);
    }

    #[test]
    fn test_public_url_path_style_with_custom_base() {
        let url = public_url(
            Some("http://localhost:9000/"),
            "tusla",
            "us-east-1",
            "post_images/abc.jpg",
        );
        assert_eq!(url, "http://localhost:9000/tusla/post_images/abc.jpg");
    }

    #[test]
    fn test_public_url_aws_default() {
        let url = public_url(None, "tusla", "eu-west-1", "post_images/abc.jpg");
        assert_eq!(
            url,
            "https://tusla.s3.eu-west-1.amazonaws.com/post_images/abc.jpg"
        );
    }
}
