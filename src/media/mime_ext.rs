/// Fallback when a content type is unknown.
pub const DEFAULT_EXTENSION: &str = "bin";

/// Extensions that differ from the first entry `mime_guess` lists.
const PREFERRED: &[(&str, &str)] = &[
    ("application/octet-stream", "bin"),
    ("text/plain", "txt"),
    ("image/jpeg", "jpeg"),
    ("audio/mpeg", "mp3"),
    ("video/quicktime", "mov"),
    ("text/html", "html"),
];

/// File extension for a `Content-Type` header value (parameters ignored).
pub fn extension_for(content_type: &str) -> String {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if let Some((_, ext)) = PREFERRED.iter().find(|(mime, _)| *mime == essence) {
        return ext.to_string();
    }
    let Some(candidates) = mime_guess::get_mime_extensions_str(&essence) else {
        return DEFAULT_EXTENSION.to_string();
    };
    // "application/pdf" -> "pdf", "video/x-matroska" -> "mkv" (first listed)
    let subtype = essence
        .split_once('/')
        .map(|(_, s)| s.trim_start_matches("x-"))
        .unwrap_or_default();
    candidates
        .iter()
        .find(|ext| **ext == subtype)
        .or_else(|| candidates.first())
        .map(|ext| ext.to_string())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
