//! Content-type policy for deployed objects
//!
//! Types are resolved from file extensions only. Unknown extensions
//! fall back to `binary/octet-stream` so the storage client always has
//! a concrete value to send.

/// Fallback for unmapped extensions
pub const FALLBACK: &str = "binary/octet-stream";

/// Resolve a content type from a file extension
pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    let ct = match extension.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "json" | "map" | "webmanifest" => "application/json",
        "xml" => "application/xml",
        "txt" | "text" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        // hotwire
        "turbo_stream" => "text/vnd.turbo-stream.html",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "ico" => "image/vnd.microsoft.icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",
        "pdf" => "application/pdf",
        "wasm" => "application/wasm",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        _ => return None,
    };
    Some(ct)
}

/// Resolve the content type to send for an object key
///
/// Text-family types get `; charset=utf-8` appended when `charset_utf8`
/// is on (the default).
pub fn content_type_for(key: &str, charset_utf8: bool) -> String {
    let extension = key.rsplit('.').next().filter(|ext| *ext != key);
    let content_type = extension
        .and_then(content_type_for_extension)
        .unwrap_or(FALLBACK);

    if charset_utf8 && content_type.starts_with("text/") {
        format!("{content_type}; charset=utf-8")
    } else {
        content_type.to_string()
    }
}
