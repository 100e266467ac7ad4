//! HTML/XML escaping.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Characters replaced by [`escape_html`] and their entities.
pub static ESCAPE_HTML: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ('&', "&amp;"),
        ('<', "&lt;"),
        ('>', "&gt;"),
        ('\'', "&#x27;"),
        ('"', "&quot;"),
        ('/', "&#x2F;"),
    ])
});

/// Escapes ampersands, brackets, quotes and slashes to their HTML/XML entities.
///
/// This is a single pass over the input: already-escaped text is escaped again
/// (`&amp;` becomes `&amp;amp;`).
///
/// # Example
///
/// ```rust
/// use tagsmith::escape_html;
///
/// assert_eq!(escape_html("<a href='/'>"), "&lt;a href=&#x27;&#x2F;&#x27;&gt;");
/// ```
pub fn escape_html(input: impl AsRef<str>) -> String {
    let input = input.as_ref();
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match ESCAPE_HTML.get(&c) {
            Some(entity) => escaped.push_str(entity),
            None => escaped.push(c),
        }
    }
    escaped
}
