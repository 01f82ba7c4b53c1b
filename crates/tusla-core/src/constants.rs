//! Shared constants

/// Maximum number of images attached to a single post.
pub const MAX_POST_IMAGES: usize = 5;

/// Maximum size of a single uploaded image (profile or post), in bytes.
pub const MAX_IMAGE_SIZE_BYTES: usize = 5 * 1024 * 1024;

/// Default status assigned to a post when the client omits one.
pub const DEFAULT_POST_STATUS: &str = "Хүлээгдэж байгаа";

/// Default priority assigned to a post when the client omits one.
pub const DEFAULT_POST_PRIORITY: &str = "бага";

/// Volunteer application decision states. New applications start as
/// `pending` via the column default.
pub const VOLUNTEER_STATUS_APPROVED: &str = "approved";
pub const VOLUNTEER_STATUS_REJECTED: &str = "rejected";
