//! Text filters applied to user-supplied strings before they are stored.
//!
//! Seller submissions and display names end up inside rendered HTML, so
//! they are escaped once on the way in.

/// Escape the five HTML-significant characters.
///
/// `&` `<` `>` `"` `'` become `&amp;` `&lt;` `&gt;` `&quot;` `&#039;`.
/// Each input character is replaced at most once, so an `&` in the input
/// is never double-escaped within one call.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}
