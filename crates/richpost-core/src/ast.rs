//! Rich document node types
//!
//! This module defines the node variants of a board post document.
//! [`Descendant`] is the owned form of a subtree, used to build documents and
//! to snapshot them; the editable form lives in [`crate::Document`].

use std::fmt;

/// Horizontal alignment of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    /// All alignments in toolbar order
    pub const ALL: [Align; 3] = [Align::Left, Align::Center, Align::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }

    /// Parse the CSS keyword form (`left`, `center`, `right`)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Align::Left),
            "center" => Some(Align::Center),
            "right" => Some(Align::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A boolean text style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
}

impl Mark {
    pub const ALL: [Mark; 3] = [Mark::Bold, Mark::Italic, Mark::Underline];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mark::Bold => "bold",
            Mark::Italic => "italic",
            Mark::Underline => "underline",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full mark set of one text leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Marks {
    pub fn get(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
        }
    }

    pub fn set(&mut self, mark: Mark, value: bool) {
        match mark {
            Mark::Bold => self.bold = value,
            Mark::Italic => self.italic = value,
            Mark::Underline => self.underline = value,
        }
    }

    /// Builder-style variant of [`Marks::set`]
    pub fn with(mut self, mark: Mark, value: bool) -> Self {
        self.set(mark, value);
        self
    }

    /// Copy of this set with `mark` flipped
    pub fn toggled(self, mark: Mark) -> Self {
        let current = self.get(mark);
        self.with(mark, !current)
    }

    /// Marks present in both sets
    pub fn intersect(self, other: Marks) -> Self {
        Self {
            bold: self.bold && other.bold,
            italic: self.italic && other.italic,
            underline: self.underline && other.underline,
        }
    }

    pub fn is_plain(&self) -> bool {
        *self == Marks::default()
    }
}

/// Heading levels offered by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    One,
    Two,
    Three,
}

impl HeadingLevel {
    pub fn from_number(level: u8) -> Option<Self> {
        match level {
            1 => Some(HeadingLevel::One),
            2 => Some(HeadingLevel::Two),
            3 => Some(HeadingLevel::Three),
            _ => None,
        }
    }
}

/// The variant of an element node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Paragraph,
    Heading(HeadingLevel),
    BlockQuote,
    BulletedList,
    NumberedList,
    /// Only valid as a direct child of a list
    ListItem,
    /// Void inline node; never has children
    Image { url: String, alt: Option<String> },
}

impl ElementKind {
    pub fn is_list(&self) -> bool {
        matches!(self, ElementKind::BulletedList | ElementKind::NumberedList)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, ElementKind::Image { .. })
    }

    /// Inline elements live among text leaves inside a block
    pub fn is_inline(&self) -> bool {
        self.is_void()
    }

    pub fn is_block(&self) -> bool {
        !self.is_inline()
    }

    /// HTML tag emitted for this element
    pub fn tag(&self) -> &'static str {
        match self {
            ElementKind::Paragraph => "p",
            ElementKind::Heading(HeadingLevel::One) => "h1",
            ElementKind::Heading(HeadingLevel::Two) => "h2",
            ElementKind::Heading(HeadingLevel::Three) => "h3",
            ElementKind::BlockQuote => "blockquote",
            ElementKind::BulletedList => "ul",
            ElementKind::NumberedList => "ol",
            ElementKind::ListItem => "li",
            ElementKind::Image { .. } => "img",
        }
    }
}

/// A text leaf: a run of text sharing one mark set
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Text {
    pub text: String,
    pub marks: Marks,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Marks::default(),
        }
    }

    pub fn with_marks(text: impl Into<String>, marks: Marks) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    /// Length in chars, the unit of selection offsets
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// An element with its children, in owned form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub align: Option<Align>,
    pub children: Vec<Descendant>,
}

/// An owned document subtree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descendant {
    Element(Element),
    Text(Text),
}

impl Descendant {
    pub fn element(kind: ElementKind, children: Vec<Descendant>) -> Self {
        Descendant::Element(Element {
            kind,
            align: None,
            children,
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Descendant::Text(Text::new(text))
    }

    pub fn marked(text: impl Into<String>, marks: Marks) -> Self {
        Descendant::Text(Text::with_marks(text, marks))
    }

    pub fn paragraph(children: Vec<Descendant>) -> Self {
        Self::element(ElementKind::Paragraph, children)
    }

    /// A paragraph holding a single unmarked leaf
    pub fn plain_paragraph(text: impl Into<String>) -> Self {
        Self::paragraph(vec![Self::text(text)])
    }

    pub fn heading(level: HeadingLevel, children: Vec<Descendant>) -> Self {
        Self::element(ElementKind::Heading(level), children)
    }

    pub fn block_quote(children: Vec<Descendant>) -> Self {
        Self::element(ElementKind::BlockQuote, children)
    }

    pub fn list(ordered: bool, items: Vec<Descendant>) -> Self {
        let kind = if ordered {
            ElementKind::NumberedList
        } else {
            ElementKind::BulletedList
        };
        Self::element(kind, items)
    }

    pub fn list_item(children: Vec<Descendant>) -> Self {
        Self::element(ElementKind::ListItem, children)
    }

    pub fn image(url: impl Into<String>, alt: Option<String>) -> Self {
        Self::element(
            ElementKind::Image {
                url: url.into(),
                alt,
            },
            Vec::new(),
        )
    }

    /// Set the alignment of an element; text leaves are returned unchanged
    pub fn with_align(mut self, align: Align) -> Self {
        if let Descendant::Element(ref mut element) = self {
            element.align = Some(align);
        }
        self
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Descendant::Text(_))
    }

    /// Concatenated text of this subtree
    pub fn text_content(&self) -> String {
        match self {
            Descendant::Text(text) => text.text.clone(),
            Descendant::Element(element) => element
                .children
                .iter()
                .map(|child| child.text_content())
                .collect(),
        }
    }
}
