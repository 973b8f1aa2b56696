//! Editing commands
//!
//! Each command turns one toolbar or typing intent into tree mutations
//! relative to the current selection. Commands return whether the document
//! changed; without a selection they do nothing.

use crate::ast::{Align, Descendant, ElementKind, Mark, Marks};
use crate::format::{BlockFormat, Format};
use crate::selection::{Point, Selection};
use crate::tree::{Document, Location, NodeData, NodeId, NodeProperties};

/// A document together with the host's selection
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub document: Document,
    pub selection: Option<Selection>,
    /// Marks for the next inserted text at a collapsed cursor
    pub pending_marks: Option<Marks>,
}

impl EditorState {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            selection: None,
            pending_marks: None,
        }
    }

    /// Replace the selection; pending marks belong to the old cursor
    pub fn select(&mut self, selection: Option<Selection>) {
        self.selection = selection;
        self.pending_marks = None;
    }

    /// Add or remove a mark. A collapsed cursor only updates the pending
    /// marks; a range applies the mark to exactly the selected text.
    pub fn toggle_mark(&mut self, mark: Mark) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };

        if selection.is_collapsed() {
            let current = self.marks().unwrap_or_default();
            self.pending_marks = Some(current.toggled(mark));
            return false;
        }

        let active = self.is_mark_active(mark);
        let leaves = self.isolate_selection();
        let mut changed = false;
        for id in leaves {
            let marks = match self.document.text(id) {
                Some(text) => text.marks.with(mark, !active),
                None => continue,
            };
            changed |= self.document.set_marks(id, marks);
        }
        self.normalize();
        changed
    }

    /// Toggle a block type or alignment over the selected blocks. Marks are
    /// routed to [`EditorState::toggle_mark`].
    pub fn toggle_block(&mut self, format: Format) -> bool {
        match format {
            Format::Mark(mark) => self.toggle_mark(mark),
            Format::Align(align) => self.toggle_align(align),
            Format::Block(block) => self.toggle_block_type(block),
        }
    }

    /// Insert an inline image at the cursor followed by an empty text leaf,
    /// which receives the cursor. A range collapses to its focus first.
    pub fn insert_image(&mut self, url: &str, alt: Option<String>) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        let point = selection.focus;
        let Some(leaf) = self.document.text(point.node) else {
            return false;
        };
        let leaf_len = leaf.len();
        let leaf_marks = leaf.marks;
        let parent = self.document.parent(point.node);
        let Some(mut index) = self.document.index_in_parent(point.node) else {
            return false;
        };

        if point.offset == 0 && leaf_len > 0 {
            // Keep a text position in front of the image
            self.document
                .insert_node(Descendant::marked("", leaf_marks), Location { parent, index });
        } else {
            self.document.split_text(point.node, point.offset);
        }
        index += 1;

        self.document.insert_node(
            Descendant::image(url, alt),
            Location { parent, index },
        );
        let Some(trailing) = self.document.insert_node(
            Descendant::marked("", leaf_marks),
            Location {
                parent,
                index: index + 1,
            },
        ) else {
            return false;
        };

        self.select(Some(Selection::collapsed(Point::new(trailing, 0))));
        self.normalize();
        true
    }

    /// Type text at the focus. Pending marks that differ from the leaf's
    /// marks start a new leaf.
    pub fn insert_text(&mut self, content: &str) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        if content.is_empty() {
            return false;
        }
        let point = selection.focus;
        let Some(leaf) = self.document.text(point.node) else {
            return false;
        };
        let leaf_marks = leaf.marks;
        let leaf_empty = leaf.is_empty();
        let marks = self.pending_marks.take().unwrap_or(leaf_marks);
        let typed = content.chars().count();

        if marks == leaf_marks || leaf_empty {
            self.document.set_marks(point.node, marks);
            self.document.insert_text_at(point.node, point.offset, content);
            self.selection = Some(Selection::collapsed(Point::new(
                point.node,
                point.offset + typed,
            )));
            return true;
        }

        let parent = self.document.parent(point.node);
        let Some(index) = self.document.index_in_parent(point.node) else {
            return false;
        };
        self.document.split_text(point.node, point.offset);
        let at = if point.offset == 0 { index } else { index + 1 };
        let Some(inserted) = self
            .document
            .insert_node(Descendant::marked(content, marks), Location { parent, index: at })
        else {
            return false;
        };
        self.selection = Some(Selection::collapsed(Point::new(inserted, typed)));
        self.normalize();
        true
    }

    /// Merge text leaves that became adjacent twins and carry the selection
    /// over to the surviving leaves
    fn normalize(&mut self) {
        let merges = self.document.merge_text_runs();
        let Some(selection) = self.selection.as_mut() else {
            return;
        };
        for (removed, kept, shift) in merges {
            for point in [&mut selection.anchor, &mut selection.focus] {
                if point.node == removed {
                    *point = Point::new(kept, shift + point.offset);
                }
            }
        }
    }

    fn toggle_align(&mut self, align: Align) -> bool {
        let active = self.has_alignment(align);
        let value = if active { None } else { Some(align) };
        let mut changed = false;
        for block in self.selected_blocks() {
            changed |= self
                .document
                .set_node_properties(block, NodeProperties::align(value));
        }
        changed
    }

    /// Lift the selected blocks out of their lists, retype them, and wrap
    /// them in a new list when a list type is switched on. The targets are
    /// resolved once, before any mutation.
    fn toggle_block_type(&mut self, format: BlockFormat) -> bool {
        let active = self.has_block_type(format);
        let targets = self.selected_blocks();
        if targets.is_empty() {
            return false;
        }

        let mut changed = false;
        for &target in &targets {
            changed |= self.lift_out_of_lists(target);
        }

        let kind = if active {
            ElementKind::Paragraph
        } else if format.is_list() {
            ElementKind::ListItem
        } else {
            format.kind()
        };
        for &target in &targets {
            changed |= self
                .document
                .set_node_properties(target, NodeProperties::kind(kind.clone()));
        }

        if !active && format.is_list() {
            changed |= !self.document.wrap_nodes(&targets, format.kind()).is_empty();
        }
        changed
    }

    /// Move a block out of every enclosing list, splitting the lists
    fn lift_out_of_lists(&mut self, target: NodeId) -> bool {
        let mut lifted = false;
        loop {
            let mut child = target;
            let list = loop {
                match self.document.parent(child) {
                    Some(parent) if self.document.get(parent).is_some_and(NodeData::is_list) => {
                        break Some(parent)
                    }
                    Some(parent) => child = parent,
                    None => break None,
                }
            };
            match list {
                Some(list) if self.document.lift_children(list, &[child]) => lifted = true,
                _ => return lifted,
            }
        }
    }

    /// Split the edge leaves so the selection covers whole leaves, remap the
    /// selection onto them and return them in document order
    fn isolate_selection(&mut self) -> Vec<NodeId> {
        let Some(selection) = self.selection else {
            return Vec::new();
        };
        let backward = selection.is_backward(&self.document);
        let Some((start, end)) = selection.unhang(&self.document) else {
            return Vec::new();
        };

        let leaves = if start.node == end.node {
            if start.offset >= end.offset {
                return Vec::new();
            }
            self.document.split_text(end.node, end.offset);
            let first = if start.offset == 0 {
                Some(start.node)
            } else {
                self.document.split_text(start.node, start.offset)
            };
            first.into_iter().collect()
        } else {
            self.document.split_text(end.node, end.offset);
            let first = if start.offset == 0 {
                Some(start.node)
            } else {
                self.document.split_text(start.node, start.offset)
            };

            let order = self.document.text_leaves();
            let position = |id: NodeId| order.iter().position(|&leaf| leaf == id);
            let from = match first {
                Some(id) => position(id),
                None => position(start.node).map(|p| p + 1),
            };
            let to = match position(end.node) {
                Some(p) if end.offset == 0 => p.checked_sub(1),
                other => other,
            };
            match (from, to) {
                (Some(from), Some(to)) if from <= to => order[from..=to].to_vec(),
                _ => Vec::new(),
            }
        };

        if let (Some(&first), Some(&last)) = (leaves.first(), leaves.last()) {
            let last_len = self.document.text(last).map(|t| t.len()).unwrap_or(0);
            let (start, end) = (Point::new(first, 0), Point::new(last, last_len));
            self.selection = Some(if backward {
                Selection::new(end, start)
            } else {
                Selection::new(start, end)
            });
        }
        leaves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::HeadingLevel;

    fn bold() -> Marks {
        Marks::default().with(Mark::Bold, true)
    }

    fn state_with(nodes: Vec<Descendant>) -> EditorState {
        let mut state = EditorState::new(Document::from_descendants(nodes));
        state.selection = state.document.select_all();
        state
    }

    fn cursor_at(state: &mut EditorState, leaf: usize, offset: usize) {
        let id = state.document.text_leaves()[leaf];
        state.select(Some(Selection::collapsed(Point::new(id, offset))));
    }

    #[test]
    fn test_toggle_mark_whole_leaf() {
        let mut state = state_with(vec![Descendant::plain_paragraph("hello")]);
        assert!(state.toggle_mark(Mark::Bold));
        assert_eq!(
            state.document.to_descendants(),
            vec![Descendant::paragraph(vec![Descendant::marked("hello", bold())])]
        );
        assert!(state.is_mark_active(Mark::Bold));
    }

    #[test]
    fn test_toggle_mark_partial_leaf_splits() {
        let mut state = state_with(vec![Descendant::plain_paragraph("hello")]);
        let leaf = state.document.text_leaves()[0];
        state.select(Some(Selection::new(Point::new(leaf, 1), Point::new(leaf, 3))));

        assert!(state.toggle_mark(Mark::Italic));
        let italic = Marks::default().with(Mark::Italic, true);
        assert_eq!(
            state.document.to_descendants(),
            vec![Descendant::paragraph(vec![
                Descendant::text("h"),
                Descendant::marked("el", italic),
                Descendant::text("lo"),
            ])]
        );

        // Selection now spans exactly the split leaf
        assert!(state.toggle_mark(Mark::Italic));
        assert_eq!(state.document.text_content(), "hello");
        assert_eq!(state.document.text_leaves().len(), 1);
        assert!(state
            .document
            .text_leaves()
            .iter()
            .all(|&id| state.document.text(id).unwrap().marks.is_plain()));
    }

    #[test]
    fn test_toggle_mark_across_blocks_backward() {
        let mut state = state_with(vec![
            Descendant::plain_paragraph("abc"),
            Descendant::plain_paragraph("def"),
        ]);
        let leaves = state.document.text_leaves();
        state.select(Some(Selection::new(Point::new(leaves[1], 1), Point::new(leaves[0], 2))));

        assert!(state.toggle_mark(Mark::Underline));
        let underline = Marks::default().with(Mark::Underline, true);
        assert_eq!(
            state.document.to_descendants(),
            vec![
                Descendant::paragraph(vec![
                    Descendant::text("ab"),
                    Descendant::marked("c", underline)
                ]),
                Descendant::paragraph(vec![
                    Descendant::marked("d", underline),
                    Descendant::text("ef")
                ]),
            ]
        );
        assert!(state.selection.unwrap().is_backward(&state.document));
    }

    #[test]
    fn test_toggle_mark_collapsed_sets_pending() {
        let mut state = state_with(vec![Descendant::plain_paragraph("ab")]);
        cursor_at(&mut state, 0, 2);

        assert!(!state.toggle_mark(Mark::Bold));
        assert_eq!(state.pending_marks, Some(bold()));
        assert!(state.insert_text("cd"));
        assert_eq!(
            state.document.to_descendants(),
            vec![Descendant::paragraph(vec![
                Descendant::text("ab"),
                Descendant::marked("cd", bold()),
            ])]
        );
        assert_eq!(state.pending_marks, None);
    }

    #[test]
    fn test_insert_text_extends_leaf() {
        let mut state = state_with(vec![Descendant::plain_paragraph("big")]);
        cursor_at(&mut state, 0, 3);
        assert!(state.insert_text(" 붕어"));
        assert_eq!(state.document.text_content(), "big 붕어");
        let selection = state.selection.unwrap();
        assert_eq!(selection.focus.offset, 6);
    }

    #[test]
    fn test_toggle_alignment_twice_restores() {
        let mut state = state_with(vec![
            Descendant::plain_paragraph("a"),
            Descendant::plain_paragraph("b"),
        ]);
        let original = state.document.to_descendants();

        assert!(state.toggle_block(Format::Align(Align::Center)));
        assert!(state
            .document
            .roots()
            .iter()
            .all(|&id| state.document.get(id).unwrap().align() == Some(Align::Center)));
        assert!(state.toggle_block(Format::Align(Align::Center)));
        assert_eq!(state.document.to_descendants(), original);
    }

    #[test]
    fn test_toggle_heading_twice_restores_paragraph() {
        let mut state = state_with(vec![Descendant::plain_paragraph("title")]);
        assert!(state.toggle_block(Format::Block(BlockFormat::HeadingOne)));
        assert_eq!(
            state.document.to_descendants(),
            vec![Descendant::heading(HeadingLevel::One, vec![Descendant::text("title")])]
        );
        assert!(state.toggle_block(Format::Block(BlockFormat::HeadingOne)));
        assert_eq!(
            state.document.to_descendants(),
            vec![Descendant::plain_paragraph("title")]
        );
    }

    #[test]
    fn test_toggle_list_wraps_and_unwraps() {
        let mut state = state_with(vec![Descendant::plain_paragraph("item")]);
        assert!(state.toggle_block(Format::Block(BlockFormat::BulletedList)));
        assert_eq!(
            state.document.to_descendants(),
            vec![Descendant::list(
                false,
                vec![Descendant::list_item(vec![Descendant::text("item")])]
            )]
        );

        assert!(state.toggle_block(Format::Block(BlockFormat::BulletedList)));
        assert_eq!(
            state.document.to_descendants(),
            vec![Descendant::plain_paragraph("item")]
        );
    }

    #[test]
    fn test_switch_list_type() {
        let mut state = state_with(vec![
            Descendant::plain_paragraph("a"),
            Descendant::plain_paragraph("b"),
        ]);
        state.toggle_block(Format::Block(BlockFormat::BulletedList));
        state.toggle_block(Format::Block(BlockFormat::NumberedList));

        assert_eq!(
            state.document.to_descendants(),
            vec![Descendant::list(
                true,
                vec![
                    Descendant::list_item(vec![Descendant::text("a")]),
                    Descendant::list_item(vec![Descendant::text("b")]),
                ]
            )]
        );
    }

    #[test]
    fn test_heading_inside_list_splits_list() {
        let mut state = state_with(vec![Descendant::list(
            false,
            vec![
                Descendant::list_item(vec![Descendant::text("a")]),
                Descendant::list_item(vec![Descendant::text("b")]),
                Descendant::list_item(vec![Descendant::text("c")]),
            ],
        )]);
        cursor_at(&mut state, 1, 0);

        assert!(state.toggle_block(Format::Block(BlockFormat::HeadingTwo)));
        assert_eq!(
            state.document.to_descendants(),
            vec![
                Descendant::list(false, vec![Descendant::list_item(vec![Descendant::text("a")])]),
                Descendant::heading(HeadingLevel::Two, vec![Descendant::text("b")]),
                Descendant::list(false, vec![Descendant::list_item(vec![Descendant::text("c")])]),
            ]
        );
    }

    #[test]
    fn test_insert_image_at_end() {
        let mut state = state_with(vec![Descendant::plain_paragraph("hello")]);
        cursor_at(&mut state, 0, 5);

        assert!(state.insert_image("https://x/y.png", None));
        assert_eq!(
            state.document.to_descendants(),
            vec![Descendant::paragraph(vec![
                Descendant::text("hello"),
                Descendant::image("https://x/y.png", None),
                Descendant::text(""),
            ])]
        );
        let cursor = state.selection.unwrap().focus;
        assert_eq!(state.document.text(cursor.node).unwrap().text, "");
    }

    #[test]
    fn test_insert_image_mid_text() {
        let mut state = state_with(vec![Descendant::plain_paragraph("abcd")]);
        cursor_at(&mut state, 0, 2);
        state.insert_image("a.png", Some("bait".to_string()));

        assert_eq!(
            state.document.to_descendants(),
            vec![Descendant::paragraph(vec![
                Descendant::text("ab"),
                Descendant::image("a.png", Some("bait".to_string())),
                Descendant::text("cd"),
            ])]
        );
        // The cursor sits right after the image
        let cursor = state.selection.unwrap().focus;
        assert_eq!(state.document.text(cursor.node).unwrap().text, "cd");
        assert_eq!(cursor.offset, 0);
    }

    #[test]
    fn test_image_in_bold_text_keeps_bold_uniform() {
        let mut state = state_with(vec![Descendant::paragraph(vec![Descendant::marked(
            "abcd",
            bold(),
        )])]);
        cursor_at(&mut state, 0, 2);
        assert!(state.insert_image("a.png", None));

        state.select(state.document.select_all());
        assert!(state.is_mark_active(Mark::Bold));

        assert!(state.toggle_mark(Mark::Bold));
        assert_eq!(
            state.document.to_descendants(),
            vec![Descendant::paragraph(vec![
                Descendant::text("ab"),
                Descendant::image("a.png", None),
                Descendant::text("cd"),
            ])]
        );
    }

    #[test]
    fn test_image_at_end_of_bold_text_keeps_bold_active() {
        let mut state = state_with(vec![Descendant::paragraph(vec![Descendant::marked(
            "abcd",
            bold(),
        )])]);
        cursor_at(&mut state, 0, 4);
        assert!(state.insert_image("a.png", None));
        assert!(state.is_mark_active(Mark::Bold));

        state.select(state.document.select_all());
        assert!(state.is_mark_active(Mark::Bold));
        assert!(state.toggle_mark(Mark::Bold));
        assert!(!state.is_mark_active(Mark::Bold));
    }

    #[test]
    fn test_toggle_back_merges_split_leaves() {
        let mut state = state_with(vec![Descendant::plain_paragraph("hello")]);
        let leaf = state.document.text_leaves()[0];
        state.select(Some(Selection::new(Point::new(leaf, 1), Point::new(leaf, 3))));
        state.toggle_mark(Mark::Bold);

        // Extend the bold run over the rest of the word
        let leaves = state.document.text_leaves();
        state.select(Some(Selection::new(Point::new(leaves[2], 0), Point::new(leaves[2], 2))));
        assert!(state.toggle_mark(Mark::Bold));
        assert_eq!(
            state.document.to_descendants(),
            vec![Descendant::paragraph(vec![
                Descendant::text("h"),
                Descendant::marked("ello", bold()),
            ])]
        );

        // The selection follows the merged text
        let selection = state.selection.unwrap();
        let merged = state.document.text_leaves()[1];
        assert_eq!(selection.anchor, Point::new(merged, 2));
        assert_eq!(selection.focus, Point::new(merged, 4));
    }

    #[test]
    fn test_commands_without_selection_are_noops() {
        let mut state = EditorState::new(Document::new());
        assert!(!state.toggle_mark(Mark::Bold));
        assert!(!state.toggle_block(Format::Block(BlockFormat::BlockQuote)));
        assert!(!state.insert_image("a.png", None));
        assert!(!state.insert_text("x"));
        assert_eq!(state.document, Document::new());
    }
}
