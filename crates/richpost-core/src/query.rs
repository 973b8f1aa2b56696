//! Activity detection for the toolbar
//!
//! These queries never mutate the document. Without a selection every query
//! reports an empty or negative result.

use crate::ast::{Align, Mark, Marks};
use crate::commands::EditorState;
use crate::format::{BlockFormat, Format};
use crate::tree::{NodeData, NodeId};

impl EditorState {
    /// Text leaves covered by a non-empty part of the selection, in document
    /// order. A collapsed selection yields its leaf.
    pub fn selected_leaves(&self) -> Vec<NodeId> {
        let Some(selection) = self.selection else {
            return Vec::new();
        };
        let Some((start, end)) = selection.unhang(&self.document) else {
            return Vec::new();
        };
        if selection.is_collapsed() {
            return vec![start.node];
        }
        if start.node == end.node {
            return if start.offset < end.offset {
                vec![start.node]
            } else {
                Vec::new()
            };
        }

        let leaves = self.document.text_leaves();
        let (Some(from), Some(to)) = (
            leaves.iter().position(|&id| id == start.node),
            leaves.iter().position(|&id| id == end.node),
        ) else {
            return Vec::new();
        };

        leaves[from..=to]
            .iter()
            .copied()
            .filter(|&id| {
                let len = self.document.text(id).map(|t| t.len()).unwrap_or(0);
                !(id == start.node && start.offset >= len) && !(id == end.node && end.offset == 0)
            })
            .collect()
    }

    /// Lowest blocks touched by the selection, in document order
    pub fn selected_blocks(&self) -> Vec<NodeId> {
        let mut blocks: Vec<NodeId> = Vec::new();
        for leaf in self.leaves_in_range() {
            if let Some(block) = self.document.nearest_block(leaf) {
                if !blocks.contains(&block) {
                    blocks.push(block);
                }
            }
        }
        blocks
    }

    /// Every element intersecting the selection: ancestors of its start and
    /// all elements between its edges
    pub fn intersecting_elements(&self) -> Vec<NodeId> {
        let Some((start, end)) = self
            .selection
            .and_then(|selection| selection.unhang(&self.document))
        else {
            return Vec::new();
        };

        let order = self.document.descendants();
        let (Some(from), Some(to)) = (
            order.iter().position(|&id| id == start.node),
            order.iter().position(|&id| id == end.node),
        ) else {
            return Vec::new();
        };

        let mut elements: Vec<NodeId> = self.document.ancestors(start.node);
        elements.reverse();
        elements.extend(
            order[from..=to]
                .iter()
                .copied()
                .filter(|&id| self.document.get(id).is_some_and(|data| !data.is_text())),
        );
        elements
    }

    /// The uniform mark set at the selection. A collapsed cursor reports the
    /// pending marks if any, otherwise its leaf's marks; a range reports the
    /// marks shared by every selected leaf.
    pub fn marks(&self) -> Option<Marks> {
        let selection = self.selection?;
        if selection.is_collapsed() {
            if let Some(pending) = self.pending_marks {
                return Some(pending);
            }
            return self.document.text(selection.anchor.node).map(|t| t.marks);
        }

        // Empty leaves beside images carry no visible text
        let leaves = self.selected_leaves();
        let visible: Vec<NodeId> = leaves
            .iter()
            .copied()
            .filter(|&id| self.document.text(id).is_some_and(|t| !t.is_empty()))
            .collect();
        let counted = if visible.is_empty() { leaves } else { visible };
        let shared = counted
            .into_iter()
            .filter_map(|id| self.document.text(id).map(|t| t.marks))
            .reduce(Marks::intersect);
        shared.or_else(|| self.document.text(selection.anchor.node).map(|t| t.marks))
    }

    pub fn is_mark_active(&self, mark: Mark) -> bool {
        self.marks().is_some_and(|marks| marks.get(mark))
    }

    /// Whether any element intersecting the selection has the block type
    pub fn has_block_type(&self, format: BlockFormat) -> bool {
        self.intersecting_elements().into_iter().any(|id| {
            self.document
                .get(id)
                .and_then(NodeData::kind)
                .is_some_and(|kind| format.matches(kind))
        })
    }

    /// Whether any element intersecting the selection has the alignment
    pub fn has_alignment(&self, align: Align) -> bool {
        self.intersecting_elements()
            .into_iter()
            .any(|id| self.document.get(id).and_then(NodeData::align) == Some(align))
    }

    /// Toolbar highlight state of any format
    pub fn is_block_active(&self, format: Format) -> bool {
        match format {
            Format::Mark(mark) => self.is_mark_active(mark),
            Format::Block(block) => self.has_block_type(block),
            Format::Align(align) => self.has_alignment(align),
        }
    }

    /// All leaves between the unhung edges, including edge leaves the range
    /// only touches
    fn leaves_in_range(&self) -> Vec<NodeId> {
        let Some((start, end)) = self
            .selection
            .and_then(|selection| selection.unhang(&self.document))
        else {
            return Vec::new();
        };
        let leaves = self.document.text_leaves();
        match (
            leaves.iter().position(|&id| id == start.node),
            leaves.iter().position(|&id| id == end.node),
        ) {
            (Some(from), Some(to)) => leaves[from..=to].to_vec(),
            _ => Vec::new(),
        }
    }
}
