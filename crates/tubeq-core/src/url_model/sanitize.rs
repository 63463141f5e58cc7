//! Filesystem-safe names and folders.

const NAME_MAX: usize = 255;

/// Reduces a custom name or folder to characters safe in a single path component.
///
/// - Keeps alphanumerics, `-`, `_` and `.`
/// - Replaces everything else (separators, spaces, control chars, commas) with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots and underscores (no `..`, no hidden names)
/// - Limits length to 255 bytes (Linux NAME_MAX)
pub fn sanitize_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_underscore = false;

    for c in raw.trim().chars() {
        let keep = c.is_alphanumeric() || c == '-' || c == '.';
        if keep {
            out.push(c);
            prev_underscore = false;
        } else if !prev_underscore {
            out.push('_');
            prev_underscore = true;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');

    if trimmed.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Trims a URL field. The URL itself is passed to the downloader as-is.
pub fn sanitize_url(raw: &str) -> String {
    raw.trim().to_string()
}
