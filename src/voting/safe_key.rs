//! Storage-safe artist keys.

/// Turns a display name into a key usable as a path segment.
///
/// Letters and digits (any script), `-` and `_` are kept, every other
/// character becomes `_`. The result is stable under repeated application.
pub fn sanitize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Characters the key-value store refuses in keys.
const FORBIDDEN_KEY_CHARS: [char; 6] = ['.', '$', '#', '[', ']', '/'];

/// Whether `key` can be used as a single key-value store path segment.
pub fn is_path_segment(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| !c.is_control() && !FORBIDDEN_KEY_CHARS.contains(&c))
}
