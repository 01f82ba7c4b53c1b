//! API-level constants

/// All routes are versioned under this prefix.
pub const API_PREFIX: &str = "/api/v1";

/// Upper bound for a whole multipart request body. Leaves headroom above the
/// per-image limit for the JSON part and multipart framing.
pub const MAX_REQUEST_BODY_BYTES: usize = 32 * 1024 * 1024;
