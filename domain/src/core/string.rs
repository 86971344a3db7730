//! String utilities for the domain layer.

/// Lowercase ASCII slug of `s`, at most `max_len` bytes, words joined by `-`.
///
/// Non-alphanumeric runs collapse into a single separator. Returns
/// `"untitled"` when nothing usable remains.
pub fn slugify(s: &str, max_len: usize) -> String {
    let mut slug = String::with_capacity(s.len().min(max_len));
    let mut pending_dash = false;

    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
        if slug.len() >= max_len {
            break;
        }
    }

    slug.truncate(max_len);
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}
