//! Content type detection for picked and dropped files.
//!
//! Native file pickers and drag-and-drop hand us paths, not declared types, so
//! the type is derived from the extension.

use std::path::Path;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Extensions offered by the file picker's image filter.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff",
];

/// Detect a content type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "heic" => "image/heic",

        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "csv" => "text/csv",

        _ => OCTET_STREAM,
    }
}

/// Whether a content type names an image.
pub fn is_image(content_type: &str) -> bool {
    content_type.starts_with("image/")
}
