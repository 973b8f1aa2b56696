//! Toolbar formats
//!
//! A [`Format`] is one toolbar intent: a text mark, a block type or an
//! alignment. Block types and alignments are distinct variants, so a block
//! type can never be mistaken for an alignment when checking activity.

use std::fmt;

use crate::ast::{Align, ElementKind, HeadingLevel, Mark};

/// Block types a selection can be switched to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockFormat {
    Paragraph,
    HeadingOne,
    HeadingTwo,
    HeadingThree,
    BlockQuote,
    BulletedList,
    NumberedList,
}

impl BlockFormat {
    pub const ALL: [BlockFormat; 7] = [
        BlockFormat::Paragraph,
        BlockFormat::HeadingOne,
        BlockFormat::HeadingTwo,
        BlockFormat::HeadingThree,
        BlockFormat::BlockQuote,
        BlockFormat::BulletedList,
        BlockFormat::NumberedList,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockFormat::Paragraph => "paragraph",
            BlockFormat::HeadingOne => "heading-one",
            BlockFormat::HeadingTwo => "heading-two",
            BlockFormat::HeadingThree => "heading-three",
            BlockFormat::BlockQuote => "block-quote",
            BlockFormat::BulletedList => "bulleted-list",
            BlockFormat::NumberedList => "numbered-list",
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, BlockFormat::BulletedList | BlockFormat::NumberedList)
    }

    /// Element kind of the block (the list container for list formats)
    pub fn kind(&self) -> ElementKind {
        match self {
            BlockFormat::Paragraph => ElementKind::Paragraph,
            BlockFormat::HeadingOne => ElementKind::Heading(HeadingLevel::One),
            BlockFormat::HeadingTwo => ElementKind::Heading(HeadingLevel::Two),
            BlockFormat::HeadingThree => ElementKind::Heading(HeadingLevel::Three),
            BlockFormat::BlockQuote => ElementKind::BlockQuote,
            BlockFormat::BulletedList => ElementKind::BulletedList,
            BlockFormat::NumberedList => ElementKind::NumberedList,
        }
    }

    pub fn matches(&self, kind: &ElementKind) -> bool {
        self.kind() == *kind
    }
}

/// One toolbar intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Mark(Mark),
    Block(BlockFormat),
    Align(Align),
}

impl Format {
    /// Look up a format by its toolbar name (`bold`, `heading-one`, `center`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Mark::ALL
            .iter()
            .find(|mark| mark.as_str() == name)
            .map(|&mark| Format::Mark(mark))
            .or_else(|| {
                BlockFormat::ALL
                    .iter()
                    .find(|block| block.as_str() == name)
                    .map(|&block| Format::Block(block))
            })
            .or_else(|| Align::from_keyword(name).map(Format::Align))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Format::Mark(mark) => mark.as_str(),
            Format::Block(block) => block.as_str(),
            Format::Align(align) => align.as_str(),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Mark> for Format {
    fn from(mark: Mark) -> Self {
        Format::Mark(mark)
    }
}

impl From<BlockFormat> for Format {
    fn from(block: BlockFormat) -> Self {
        Format::Block(block)
    }
}

impl From<Align> for Format {
    fn from(align: Align) -> Self {
        Format::Align(align)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for name in [
            "bold",
            "italic",
            "underline",
            "heading-one",
            "heading-three",
            "block-quote",
            "numbered-list",
            "left",
            "right",
        ] {
            let format = Format::from_name(name).unwrap();
            assert_eq!(format.to_string(), name);
        }
        assert_eq!(Format::from_name("strikethrough"), None);
    }

    #[test]
    fn test_block_format_kinds() {
        assert!(BlockFormat::BulletedList.is_list());
        assert!(!BlockFormat::BlockQuote.is_list());
        assert!(BlockFormat::HeadingTwo.matches(&ElementKind::Heading(HeadingLevel::Two)));
    }
}
