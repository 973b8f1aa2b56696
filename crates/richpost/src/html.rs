//! HTML deserialization.
//!
//! Turns a stored post body back into a document when an existing post is
//! opened for editing. The default conversion is deliberately lossy: only the
//! text survives, in one paragraph. [`DeserializeMode::Structured`] recovers
//! the block structure, alignment, marks and images the serializer emits.

use scraper::{ElementRef, Html, Node as ScraperNode};

use richpost_core::{Descendant, Document, Element, ElementKind, HeadingLevel, Marks, Text};

use crate::options::DeserializeMode;
use crate::utilities::{
    collapse_whitespace, is_blank_html, is_block, is_skipped, mark_for_tag, parse_text_align,
};

/// Parse stored HTML with the default, text-only conversion.
///
/// # Example
///
/// ```rust
/// use richpost::deserialize;
///
/// let doc = deserialize("<h1>Title</h1><p>Body</p>");
/// assert_eq!(doc.roots().len(), 1);
/// assert_eq!(doc.text_content(), "TitleBody");
/// ```
pub fn deserialize(html: &str) -> Document {
    deserialize_with(html, DeserializeMode::PlainText)
}

/// Parse stored HTML. Blank input always yields the default document (one
/// empty paragraph); parsing never fails.
pub fn deserialize_with(html: &str, mode: DeserializeMode) -> Document {
    if is_blank_html(html) {
        return Document::new();
    }

    let fragment = Html::parse_fragment(html);
    let root = fragment.root_element();

    match mode {
        DeserializeMode::PlainText => {
            let text: String = root.text().collect();
            Document::from_descendants(vec![Descendant::plain_paragraph(text)])
        }
        DeserializeMode::Structured => {
            let mut blocks = Vec::new();
            convert_blocks(root, &mut blocks);
            if blocks.is_empty() {
                Document::new()
            } else {
                Document::from_descendants(blocks)
            }
        }
    }
}

/// Convert the children of a block container. Inline content found between
/// blocks is gathered into paragraphs.
fn convert_blocks(element: ElementRef, out: &mut Vec<Descendant>) {
    let mut pending: Vec<Descendant> = Vec::new();

    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                push_text(&mut pending, &collapse_whitespace(&text.text), Marks::default());
            }
            ScraperNode::Element(_) => {
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                let tag = child_element.value().name().to_lowercase();

                if is_skipped(&tag) {
                    continue;
                }
                if !is_block(&tag) {
                    collect_inlines(child_element, Marks::default(), &mut pending);
                    continue;
                }

                flush_paragraph(&mut pending, out);
                match tag.as_str() {
                    "ul" | "ol" => {
                        if let Some(list) = convert_list(child_element, tag == "ol") {
                            out.push(list);
                        }
                    }
                    "p" | "li" => out.extend(text_blocks(child_element, ElementKind::Paragraph)),
                    "blockquote" => out.extend(text_blocks(child_element, ElementKind::BlockQuote)),
                    other => match heading_level(other) {
                        Some(level) => {
                            out.extend(text_blocks(child_element, ElementKind::Heading(level)))
                        }
                        // Other containers contribute their blocks
                        None => convert_blocks(child_element, out),
                    },
                }
            }
            _ => {}
        }
    }

    flush_paragraph(&mut pending, out);
}

/// `h1` to `h3` keep their level; deeper headings become level three
fn heading_level(tag: &str) -> Option<HeadingLevel> {
    let level: u8 = tag.strip_prefix('h')?.parse().ok()?;
    if !(1..=6).contains(&level) {
        return None;
    }
    HeadingLevel::from_number(level.min(3))
}

/// Blocks of `kind` holding the element's inline content. Each nested block
/// element starts a new block of the same kind, so text from separate
/// paragraphs never runs together.
fn text_blocks(element: ElementRef, kind: ElementKind) -> Vec<Descendant> {
    let align = element.value().attr("style").and_then(parse_text_align);
    let mut runs: Vec<Vec<Descendant>> = vec![Vec::new()];
    split_runs(element, Marks::default(), &mut runs);

    let mut blocks: Vec<Descendant> = runs
        .iter_mut()
        .filter_map(take_content)
        .map(|children| {
            Descendant::Element(Element {
                kind: kind.clone(),
                align,
                children,
            })
        })
        .collect();
    if blocks.is_empty() {
        blocks.push(Descendant::Element(Element {
            kind,
            align,
            children: vec![Descendant::text("")],
        }));
    }
    blocks
}

/// Like [`collect_inlines`], but nested block elements close the current run
fn split_runs(element: ElementRef, marks: Marks, runs: &mut Vec<Vec<Descendant>>) {
    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                if let Some(run) = runs.last_mut() {
                    push_text(run, &collapse_whitespace(&text.text), marks);
                }
            }
            ScraperNode::Element(_) => {
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                let tag = child_element.value().name();
                if is_skipped(tag) {
                    continue;
                }
                if is_block(tag) {
                    runs.push(Vec::new());
                    split_runs(child_element, marks, runs);
                    runs.push(Vec::new());
                } else if let Some(run) = runs.last_mut() {
                    collect_inlines(child_element, marks, run);
                }
            }
            _ => {}
        }
    }
}

fn convert_list(element: ElementRef, ordered: bool) -> Option<Descendant> {
    let mut items = Vec::new();
    let mut stray: Vec<Descendant> = Vec::new();

    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                push_text(&mut stray, &collapse_whitespace(&text.text), Marks::default());
            }
            ScraperNode::Element(_) => {
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                if is_skipped(child_element.value().name()) {
                    continue;
                }
                if child_element.value().name().eq_ignore_ascii_case("li") {
                    flush_list_item(&mut stray, &mut items);
                    items.extend(text_blocks(child_element, ElementKind::ListItem));
                } else {
                    collect_inlines(child_element, Marks::default(), &mut stray);
                }
            }
            _ => {}
        }
    }
    flush_list_item(&mut stray, &mut items);

    if items.is_empty() {
        return None;
    }
    let mut list = Descendant::list(ordered, items);
    if let Some(align) = element.value().attr("style").and_then(parse_text_align) {
        list = list.with_align(align);
    }
    Some(list)
}

/// Gather text leaves and images below `element`, applying formatting tags
fn collect_inlines(element: ElementRef, marks: Marks, out: &mut Vec<Descendant>) {
    let tag = element.value().name();
    if is_skipped(tag) {
        return;
    }
    if tag.eq_ignore_ascii_case("img") {
        if let Some(src) = element.value().attr("src") {
            let alt = element
                .value()
                .attr("alt")
                .filter(|alt| !alt.is_empty())
                .map(str::to_string);
            out.push(Descendant::image(src, alt));
        }
        return;
    }

    let marks = match mark_for_tag(tag) {
        Some(mark) => marks.with(mark, true),
        None => marks,
    };

    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                push_text(out, &collapse_whitespace(&text.text), marks);
            }
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_inlines(child_element, marks, out);
                }
            }
            _ => {}
        }
    }
}

/// Append text, merging with a preceding leaf that has the same marks
fn push_text(out: &mut Vec<Descendant>, text: &str, marks: Marks) {
    if text.is_empty() {
        return;
    }
    if let Some(Descendant::Text(last)) = out.last_mut() {
        if last.marks == marks {
            last.text.push_str(text);
            return;
        }
    }
    out.push(Descendant::Text(Text::with_marks(text, marks)));
}

/// Trim the block edges and make sure every image has a text position on
/// both sides
fn normalize_inlines(inlines: Vec<Descendant>) -> Vec<Descendant> {
    let mut inlines = inlines;
    if let Some(Descendant::Text(first)) = inlines.first_mut() {
        first.text = first.text.trim_start().to_string();
    }
    if let Some(Descendant::Text(last)) = inlines.last_mut() {
        last.text = last.text.trim_end().to_string();
    }

    let mut result: Vec<Descendant> = Vec::with_capacity(inlines.len() + 2);
    for node in inlines {
        if node.is_text() {
            result.push(node);
            continue;
        }
        if !result.last().is_some_and(Descendant::is_text) {
            result.push(Descendant::text(""));
        }
        result.push(node);
        result.push(Descendant::text(""));
    }

    // Merge the empty leaf placed after an image into following text
    let mut merged: Vec<Descendant> = Vec::with_capacity(result.len());
    for node in result {
        let (prev_empty, next_empty) = match (merged.last(), &node) {
            (Some(Descendant::Text(prev)), Descendant::Text(next)) => {
                (Some(prev.text.is_empty()), next.text.is_empty())
            }
            _ => (None, false),
        };
        match prev_empty {
            Some(true) if !next_empty => {
                merged.pop();
            }
            Some(_) if next_empty => continue,
            _ => {}
        }
        merged.push(node);
    }

    if merged.is_empty() {
        merged.push(Descendant::text(""));
    }
    merged
}

fn flush_paragraph(pending: &mut Vec<Descendant>, out: &mut Vec<Descendant>) {
    if let Some(children) = take_content(pending) {
        out.push(Descendant::paragraph(children));
    }
}

fn flush_list_item(pending: &mut Vec<Descendant>, items: &mut Vec<Descendant>) {
    if let Some(children) = take_content(pending) {
        items.push(Descendant::list_item(children));
    }
}

/// Drain gathered inline content unless it is only whitespace
fn take_content(pending: &mut Vec<Descendant>) -> Option<Vec<Descendant>> {
    let meaningful = pending.iter().any(|node| match node {
        Descendant::Text(text) => !text.text.trim().is_empty(),
        Descendant::Element(_) => true,
    });
    let content = std::mem::take(pending);
    meaningful.then(|| normalize_inlines(content))
}
