//! Turns display text into HTML for the chat widget. Everything is
//! escaped except paired `**` which become `<strong>`.
use std::sync::LazyLock;

use regex::Regex;

static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("Invalid emphasis pattern"));

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_html(text: &str) -> String {
    EMPHASIS
        .replace_all(&escape_html(text), "<strong>${1}</strong>")
        .into_owned()
}
