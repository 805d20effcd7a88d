//! Minimal SVG document assembly
//!
//! The widgets emit complete SVG documents as strings; this module keeps
//! the escaping and element plumbing in one place.

use std::fmt::Write;

/// Escape text for use in SVG/XML content and attribute values
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

/// Render one element with escaped attribute values
///
/// `inner` is written as-is; pass pre-escaped content or nested elements.
pub fn element(name: &str, attrs: &[(&str, String)], inner: Option<&str>) -> String {
    let mut out = String::new();
    out.push('<');
    out.push_str(name);
    for (key, value) in attrs {
        let _ = write!(out, " {}=\"{}\"", key, escape(value));
    }
    match inner {
        Some(content) => {
            out.push('>');
            out.push_str(content);
            let _ = write!(out, "</{}>", name);
        }
        None => out.push_str("/>"),
    }
    out
}

/// Top-level SVG document accumulating child elements
pub struct SvgDoc {
    width: f64,
    height: f64,
    body: String,
}

impl SvgDoc {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    pub fn push(&mut self, fragment: &str) {
        self.body.push_str(fragment);
    }

    pub fn into_string(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{}\" height=\"{}\">{}</svg>",
            self.width, self.height, self.body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape("O.C. & Big L"), "O.C. &amp; Big L");
        assert_eq!(escape("<\"'>"), "&lt;&quot;&#39;&gt;");
    }

    #[test]
    fn test_self_closing_element() {
        let circle = element(
            "circle",
            &[("r", "4.5".to_string()), ("class", "treeNode".to_string())],
            None,
        );
        assert_eq!(circle, "<circle r=\"4.5\" class=\"treeNode\"/>");
    }

    #[test]
    fn test_nested_document() {
        let mut doc = SvgDoc::new(100.0, 50.0);
        doc.push(&element("g", &[], Some("<circle r=\"1\"/>")));
        let out = doc.into_string();
        assert!(out.starts_with("<svg "));
        assert!(out.contains("width=\"100\""));
        assert!(out.contains("<g><circle r=\"1\"/></g>"));
        assert!(out.ends_with("</svg>"));
    }
}
