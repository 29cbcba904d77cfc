//! Upload filename sanitization for book cover images.
//!
//! Uploaded files are stored under a flat uploads directory and referenced
//! by filename only, so the client-supplied name is reduced to a safe
//! basename before it touches the filesystem.

use crate::error::CoreError;

/// Image extensions accepted for book covers (lowercase, without the dot).
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Reduce a client-supplied filename to a safe basename.
///
/// Path separators become whitespace, whitespace runs collapse to `_`, and
/// every character outside `[A-Za-z0-9_.-]` is dropped. Leading and
/// trailing `.`/`_` are stripped, which removes `..` traversal segments and
/// hidden-file prefixes. Returns `None` if nothing usable remains.
///
/// # Examples
///
/// ```
/// use bookshelf_core::filename::sanitize_filename;
///
/// assert_eq!(sanitize_filename("My Cover.png").as_deref(), Some("My_Cover.png"));
/// assert_eq!(sanitize_filename("../../etc/passwd").as_deref(), Some("etc_passwd"));
/// assert_eq!(sanitize_filename("..").as_deref(), None);
/// ```
pub fn sanitize_filename(original: &str) -> Option<String> {
    let spaced: String = original
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = filtered.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Sanitize an image filename and check its extension.
pub fn image_filename(original: &str) -> Result<String, CoreError> {
    let name = sanitize_filename(original)
        .ok_or_else(|| CoreError::Validation(format!("Invalid image filename '{original}'")))?;

    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CoreError::Validation(format!(
            "Unsupported image format '.{ext}'. Supported: {}",
            ALLOWED_IMAGE_EXTENSIONS.join(", ")
        )));
    }

    Ok(name)
}
