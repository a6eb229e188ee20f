//! URL slugs derived from article titles.
//!
//! Slugs are not stored upstream; they are recomputed from the title every
//! time the article list is fetched, so the derivation must stay stable.

/// Derive the slug of an article title.
///
/// The title is lowercased, every character that is neither an ASCII word
/// character nor whitespace is dropped, and each whitespace run becomes a
/// single `-`. Leading or trailing whitespace therefore yields a leading or
/// trailing `-`.
pub fn derive_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_whitespace = false;

    for ch in title.to_lowercase().chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
                in_whitespace = true;
            }
            continue;
        }

        if ch.is_ascii_alphanumeric() || ch == '_' {
            slug.push(ch);
            in_whitespace = false;
        }
    }

    slug
}
