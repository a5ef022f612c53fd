//! Stored filename generation.
//!
//! Stored filenames have the form `pdf-<unix millis>-<8 hex>-<name>`, where
//! `<name>` is the sanitized original filename. They are opaque to clients
//! and unique per upload.

use chrono::Utc;
use uuid::Uuid;

/// Longest sanitized name kept in a stored filename.
const MAX_NAME_LEN: usize = 180;

/// Generate a fresh stored filename for an uploaded file.
pub fn stored_filename(original: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let nonce = Uuid::new_v4().simple().to_string();
    format!("pdf-{millis}-{}-{}", &nonce[..8], sanitize_filename(original))
}

/// Make a client-supplied filename safe to embed in a storage key.
///
/// Directory components are dropped, whitespace becomes `_`, and any
/// character outside `[A-Za-z0-9._-]` is removed.
pub fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original)
        .trim();

    let mut clean: String = base
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    while clean.starts_with('.') {
        clean.remove(0);
    }
    if clean.len() > MAX_NAME_LEN {
        clean = clean[clean.len() - MAX_NAME_LEN..].to_string();
    }
    if clean.is_empty() {
        clean = "document.pdf".to_string();
    }
    clean
}

/// Title derived from a filename: the name without a trailing `.pdf`.
pub fn default_title(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original)
        .trim();
    let stem = match base.len().checked_sub(4) {
        Some(cut) if base.is_char_boundary(cut) && base[cut..].eq_ignore_ascii_case(".pdf") => {
            &base[..cut]
        }
        _ => base,
    };
    if stem.is_empty() {
        base.to_string()
    } else {
        stem.to_string()
    }
}
