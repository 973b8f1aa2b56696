//! Toolbar registry
//!
//! Maps control names to the formats they toggle, in display order, and
//! reports which controls should be highlighted for the current selection.

use indexmap::IndexMap;
use richpost_core::{Align, BlockFormat, Format, Mark};

use crate::editor::Editor;
use crate::{Result, RichPostError};

/// Highlight state of one toolbar control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub name: String,
    pub format: Format,
    pub active: bool,
}

/// Ordered collection of toolbar controls
#[derive(Debug, Clone)]
pub struct Toolbar {
    controls: IndexMap<String, Format>,
}

impl Toolbar {
    /// The post editor's toolbar
    pub fn new() -> Self {
        let mut toolbar = Self::empty();
        for mark in Mark::ALL {
            toolbar.add(mark.as_str(), mark.into());
        }
        for block in [
            BlockFormat::HeadingOne,
            BlockFormat::HeadingTwo,
            BlockFormat::HeadingThree,
        ] {
            toolbar.add(block.as_str(), block.into());
        }
        for align in Align::ALL {
            toolbar.add(align.as_str(), align.into());
        }
        for block in [
            BlockFormat::NumberedList,
            BlockFormat::BulletedList,
            BlockFormat::BlockQuote,
        ] {
            toolbar.add(block.as_str(), block.into());
        }
        toolbar
    }

    /// A toolbar without controls
    pub fn empty() -> Self {
        Self {
            controls: IndexMap::new(),
        }
    }

    /// Add a control, or replace the format of an existing one in place
    pub fn add(&mut self, name: &str, format: Format) -> &mut Self {
        self.controls.insert(name.to_string(), format);
        self
    }

    /// Remove a control, keeping the order of the others
    pub fn remove(&mut self, name: &str) -> Option<Format> {
        self.controls.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Format> {
        self.controls.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.controls.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Highlight state of every control, in order
    pub fn state(&self, editor: &Editor) -> Vec<ControlState> {
        self.controls
            .iter()
            .map(|(name, &format)| ControlState {
                name: name.clone(),
                format,
                active: editor.is_block_active(format),
            })
            .collect()
    }

    /// Run the command of the named control
    pub fn press(&self, editor: &mut Editor, name: &str) -> Result<bool> {
        let format = self
            .get(name)
            .ok_or_else(|| RichPostError::UnknownFormat(name.to_string()))?;
        Ok(editor.execute(format))
    }
}

impl Default for Toolbar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use richpost_core::{Descendant, Document};

    #[test]
    fn test_default_order() {
        let toolbar = Toolbar::new();
        let names: Vec<&str> = toolbar.names().collect();
        assert_eq!(
            names,
            vec![
                "bold",
                "italic",
                "underline",
                "heading-one",
                "heading-two",
                "heading-three",
                "left",
                "center",
                "right",
                "numbered-list",
                "bulleted-list",
                "block-quote",
            ]
        );
    }

    #[test]
    fn test_add_and_remove_keep_order() {
        let mut toolbar = Toolbar::new();
        assert_eq!(toolbar.remove("italic"), Some(Format::Mark(Mark::Italic)));
        toolbar.add("paragraph", BlockFormat::Paragraph.into());

        let names: Vec<&str> = toolbar.names().collect();
        assert_eq!(names[..2], ["bold", "underline"]);
        assert_eq!(names.last(), Some(&"paragraph"));
        assert_eq!(toolbar.len(), 12);
        assert!(Toolbar::empty().is_empty());
    }

    #[test]
    fn test_state_follows_selection() {
        let mut editor = Editor::new();
        editor.set_document(Document::from_descendants(vec![Descendant::plain_paragraph(
            "hello",
        )]));
        let toolbar = Toolbar::new();

        assert!(toolbar.state(&editor).iter().all(|control| !control.active));

        editor.select_all();
        assert!(toolbar.press(&mut editor, "bold").unwrap());
        assert!(toolbar.press(&mut editor, "heading-two").unwrap());

        let active: Vec<String> = toolbar
            .state(&editor)
            .into_iter()
            .filter(|control| control.active)
            .map(|control| control.name)
            .collect();
        assert_eq!(active, vec!["bold", "heading-two"]);
    }

    #[test]
    fn test_press_unknown_control() {
        let mut editor = Editor::new();
        let err = Toolbar::empty().press(&mut editor, "bold").unwrap_err();
        assert!(matches!(err, RichPostError::UnknownFormat(_)));
    }
}
