//! Content-Type detection from file extensions.

/// Maps a file extension to a Content-Type.
///
/// ```
/// # use revalidate::http::mime::content_type_for;
/// assert_eq!(content_type_for(Some("html")), "text/html; charset=utf-8");
/// assert_eq!(content_type_for(None), "application/octet-stream");
/// ```
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    match extension {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("woff2") => "font/woff2",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
