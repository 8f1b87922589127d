//! Storage-side filenames for uploaded assets.

/// Builds `<unix-millis>-<8 hex>-<sanitized original name>`.
///
/// The random component keeps two uploads of the same file within the same
/// millisecond apart.
pub fn stored_filename(now_ms: i64, original_name: &str) -> String {
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        now_ms,
        &nonce[..8],
        sanitize_filename(original_name)
    )
}

/// Keeps the final path component and replaces characters that would break a
/// quoted `Content-Disposition` value.
pub fn sanitize_filename(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() {
        "upload.bin".to_string()
    } else {
        cleaned
    }
}
