use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Largest accepted upload, inclusive.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

pub const ALLOWED_CONTENT_TYPES: [&str; 10] = [
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/webp",
    "image/gif",
    "image/bmp",
    "image/tiff",
    "image/svg+xml",
    "image/heic",
    "image/heif",
];

pub static ALLOWED_CONTENT_TYPE_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ALLOWED_CONTENT_TYPES.iter().copied().collect());
