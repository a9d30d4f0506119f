//! URL slug derivation for blog post titles.

/// Derive the URL-safe slug stored alongside a post.
///
/// Lower-cases the title, drops everything outside `[a-z0-9]` and whitespace,
/// then joins the remaining words with single hyphens. Hyphens in the title are
/// dropped like any other punctuation, so `"--Multiple   Spaces--"` becomes
/// `"multiple-spaces"`.
pub fn slugify_title(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if is_separator(c) {
            pending_separator = true;
        }
    }

    slug
}

/// The `\s` class of ECMAScript regexes. Differs from `char::is_whitespace`
/// on U+0085 (not a separator) and U+FEFF (a separator).
fn is_separator(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}
