//! User-facing strings: size labels, savings, error messages.

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Human-readable byte size: `512 B`, `1.5 KB`, `2.3 MB`.
pub fn format_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}

/// `Saved 42% storage`.
pub fn savings_label(percent: i64) -> String {
    format!("Saved {}% storage", percent)
}

/// Message shown when the media type is rejected.
pub const UNSUPPORTED_TYPE_MESSAGE: &str = "Only images allowed (JPEG, PNG, WebP)";

/// Message shown when compression fails for any reason.
pub const COMPRESSION_FAILED_MESSAGE: &str = "Failed to optimize image. Try another photo.";

/// Message shown when the file exceeds the intake limit.
pub fn too_large_message(limit_bytes: u64) -> String {
    if limit_bytes % MIB == 0 {
        format!("Image too large (max {}MB)", limit_bytes / MIB)
    } else {
        format!("Image too large (max {})", format_size(limit_bytes))
    }
}
