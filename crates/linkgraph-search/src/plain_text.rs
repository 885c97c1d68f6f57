use anyhow::Result;
use regex::{Captures, Regex};

/// Markdown/MDX → plain text for search snippets.
///
/// Link and image syntax keeps its visible text; code fences, HTML tags and
/// MDX import/export lines are dropped. Whitespace is collapsed.
pub struct MarkdownStripper {
    fences: Regex,
    mdx_statements: Regex,
    html: Regex,
    images: Regex,
    wiki_links: Regex,
    links: Regex,
    inline_code: Regex,
    line_markers: Regex,
    emphasis: Regex,
    whitespace: Regex,
}

impl MarkdownStripper {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fences: Regex::new(r"(?s)(```|~~~).*?(```|~~~)")?,
            mdx_statements: Regex::new(r"(?m)^(?:import|export)\s.*$")?,
            html: Regex::new(r"<[^>\n]+>")?,
            images: Regex::new(r"!\[([^\]]*)\]\([^)]*\)")?,
            wiki_links: Regex::new(r"\[\[([^\]|]+)(?:\|([^\]]+))?\]\]")?,
            links: Regex::new(r"\[([^\]]+)\]\([^)]*\)")?,
            inline_code: Regex::new(r"`([^`]*)`")?,
            line_markers: Regex::new(r"(?m)^[ \t]{0,3}(?:#{1,6}[ \t]+|>[ \t]?|[-*+][ \t]+|\d+\.[ \t]+)")?,
            emphasis: Regex::new(r"\*{1,3}|_{2,3}|~~")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    pub fn strip(&self, markdown: &str) -> String {
        let text = self.fences.replace_all(markdown, " ");
        let text = self.mdx_statements.replace_all(&text, "");
        let text = self.html.replace_all(&text, " ");
        let text = self.images.replace_all(&text, "$1");
        let text = self.wiki_links.replace_all(&text, |caps: &Captures| {
            caps.get(2).or_else(|| caps.get(1)).map(|m| m.as_str().trim().to_string()).unwrap_or_default()
        });
        let text = self.links.replace_all(&text, "$1");
        let text = self.inline_code.replace_all(&text, "$1");
        let text = self.line_markers.replace_all(&text, "");
        let text = self.emphasis.replace_all(&text, "");
        self.whitespace.replace_all(&text, " ").trim().to_string()
    }
}

/// First `max_chars` characters of `text`; never splits a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}
