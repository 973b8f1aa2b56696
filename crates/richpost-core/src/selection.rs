//! Cursor and range positions within a document

use crate::tree::{Document, NodeId};

/// A position inside a text leaf; `offset` counts chars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub node: NodeId,
    pub offset: usize,
}

impl Point {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// The host's current selection. `anchor` is where it started, `focus`
/// where it ends; the two may be in either document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point,
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Both points name live text leaves and offsets fit
    pub fn is_valid(&self, doc: &Document) -> bool {
        [self.anchor, self.focus].iter().all(|point| {
            doc.text(point.node)
                .is_some_and(|text| point.offset <= text.len())
        })
    }

    /// Whether the focus comes before the anchor
    pub fn is_backward(&self, doc: &Document) -> bool {
        match self.edges(doc) {
            Some((start, _)) => start == self.focus && self.anchor != self.focus,
            None => false,
        }
    }

    /// Start and end of the selection in document order
    pub fn edges(&self, doc: &Document) -> Option<(Point, Point)> {
        if !self.is_valid(doc) {
            return None;
        }
        if self.anchor.node == self.focus.node {
            return Some(if self.anchor.offset <= self.focus.offset {
                (self.anchor, self.focus)
            } else {
                (self.focus, self.anchor)
            });
        }

        let leaves = doc.text_leaves();
        let anchor_pos = leaves.iter().position(|&id| id == self.anchor.node)?;
        let focus_pos = leaves.iter().position(|&id| id == self.focus.node)?;
        Some(if anchor_pos < focus_pos {
            (self.anchor, self.focus)
        } else {
            (self.focus, self.anchor)
        })
    }

    /// Pull back a range that starts at the beginning of a leaf and ends at
    /// offset 0 of a later leaf, so the untouched trailing leaf does not count
    /// as selected.
    pub fn unhang(&self, doc: &Document) -> Option<(Point, Point)> {
        let (start, end) = self.edges(doc)?;
        if self.is_collapsed() || start.offset != 0 || end.offset != 0 || start.node == end.node {
            return Some((start, end));
        }

        let leaves = doc.text_leaves();
        let end_pos = leaves.iter().position(|&id| id == end.node)?;
        let previous = leaves[..end_pos].last().copied()?;
        let len = doc.text(previous).map(|text| text.len()).unwrap_or(0);
        Some((start, Point::new(previous, len)))
    }
}

impl Document {
    /// Offset 0 of the first text leaf
    pub fn start_point(&self) -> Option<Point> {
        self.text_leaves().first().map(|&id| Point::new(id, 0))
    }

    /// End of the last text leaf
    pub fn end_point(&self) -> Option<Point> {
        let id = *self.text_leaves().last()?;
        let len = self.text(id)?.len();
        Some(Point::new(id, len))
    }

    /// A selection spanning the whole document
    pub fn select_all(&self) -> Option<Selection> {
        Some(Selection::new(self.start_point()?, self.end_point()?))
    }
}
