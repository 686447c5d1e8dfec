//! URL slugs for books and accounts.

/// Converts a display name into a slug.
///
/// Lower-cases ASCII letters, keeps alphanumerics, `_` and `-`, drops other
/// punctuation and collapses whitespace/hyphen runs into a single `-`.
/// Leading and trailing separators are trimmed.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_separator = true;
        }
    }

    slug
}
