//! Telegram HTML formatting helpers.
//!
//! Every helper escapes its input, so callers pass plain text and can nest
//! the results freely.

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn bold(text: &str) -> String {
    format!("<b>{}</b>", escape_html(text))
}

pub fn code(text: &str) -> String {
    format!("<code>{}</code>", escape_html(text))
}

pub fn pre(text: &str) -> String {
    format!("<pre>{}</pre>", escape_html(text))
}

/// Wraps already-formatted HTML; the body is not escaped again.
pub fn blockquote(html: &str) -> String {
    format!("<blockquote>{html}</blockquote>")
}

/// Collapsed by default in Telegram clients. The body is not escaped again.
pub fn expandable_blockquote(html: &str) -> String {
    format!("<blockquote expandable>{html}</blockquote>")
}
