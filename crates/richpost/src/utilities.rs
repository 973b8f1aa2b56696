//! Utility functions and constants for HTML processing.

use once_cell::sync::Lazy;
use regex::Regex;
use richpost_core::{Align, Mark};

static TEXT_ALIGN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|;)\s*text-align\s*:\s*(left|center|right)\b").unwrap());

/// Block-level HTML elements
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "center", "dd", "div",
    "dl", "dt", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4",
    "h5", "h6", "header", "hr", "html", "li", "main", "nav", "ol", "p", "pre",
    "section", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Elements whose content is never document text
pub const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Check if a tag is a block-level element
pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Check if a tag's content should be dropped
pub fn is_skipped(tag: &str) -> bool {
    SKIPPED_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// The mark an inline formatting tag stands for
pub fn mark_for_tag(tag: &str) -> Option<Mark> {
    match tag.to_lowercase().as_str() {
        "strong" | "b" => Some(Mark::Bold),
        "em" | "i" => Some(Mark::Italic),
        "u" | "ins" => Some(Mark::Underline),
        _ => None,
    }
}

/// Extract the `text-align` declaration of an inline style attribute
pub fn parse_text_align(style: &str) -> Option<Align> {
    let captures = TEXT_ALIGN.captures(style)?;
    Align::from_keyword(captures.get(1)?.as_str())
}

/// Collapse runs of whitespace into a single space
pub fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_whitespace = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !prev_was_whitespace {
                result.push(' ');
                prev_was_whitespace = true;
            }
        } else {
            result.push(c);
            prev_was_whitespace = false;
        }
    }

    result
}

/// Whether a stored value carries no content at all
pub fn is_blank_html(html: &str) -> bool {
    html.trim().is_empty()
}
