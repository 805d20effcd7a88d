//! HTML fragment helpers for the incrementally loaded lists
//!
//! Everything passing through here is escaped except lyric HTML, which the
//! host application produced and the loader inserts untouched.

/// Escape text for HTML content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Anchor element with escaped href and text
pub fn anchor(href: &str, text: &str) -> String {
    format!("<a href=\"{}\">{}</a>", escape(href), escape(text))
}

/// Span with a class, containing already-rendered inner HTML
pub fn span(class: &str, inner_html: &str) -> String {
    format!("<span class=\"{}\">{}</span>", escape(class), inner_html)
}

/// List item containing already-rendered inner HTML
pub fn list_item(class: &str, inner_html: &str) -> String {
    format!("<li class=\"{}\">{}</li>", escape(class), inner_html)
}
