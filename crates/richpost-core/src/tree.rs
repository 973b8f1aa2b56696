//! Editable document tree
//!
//! Nodes live in an arena and are addressed by [`NodeId`]s that stay valid for
//! the lifetime of the node, so a command can compute its targets once and
//! apply several mutations without recomputing positions. Paths are only used
//! at the boundary with hosts that address nodes structurally.

use std::collections::HashSet;

use crate::ast::{Align, Descendant, Element, ElementKind, Marks, Text};

/// Stable handle to a node of a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The payload of one tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element {
        kind: ElementKind,
        align: Option<Align>,
    },
    Text(Text),
}

impl NodeData {
    pub fn is_text(&self) -> bool {
        matches!(self, NodeData::Text(_))
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            NodeData::Text(text) => Some(text),
            NodeData::Element { .. } => None,
        }
    }

    pub fn kind(&self) -> Option<&ElementKind> {
        match self {
            NodeData::Element { kind, .. } => Some(kind),
            NodeData::Text(_) => None,
        }
    }

    pub fn align(&self) -> Option<Align> {
        match self {
            NodeData::Element { align, .. } => *align,
            NodeData::Text(_) => None,
        }
    }

    /// Block elements; text leaves and inline voids are not blocks
    pub fn is_block(&self) -> bool {
        self.kind().is_some_and(|kind| kind.is_block())
    }

    pub fn is_list(&self) -> bool {
        self.kind().is_some_and(|kind| kind.is_list())
    }

    fn accepts_children(&self) -> bool {
        self.kind().is_some_and(|kind| !kind.is_void())
    }
}

/// Where to insert a node: a parent (or the root) and a child index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub parent: Option<NodeId>,
    pub index: usize,
}

impl Location {
    pub fn root(index: usize) -> Self {
        Self {
            parent: None,
            index,
        }
    }

    pub fn child(parent: NodeId, index: usize) -> Self {
        Self {
            parent: Some(parent),
            index,
        }
    }
}

/// Partial element properties, merged by [`Document::set_node_properties`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeProperties {
    pub kind: Option<ElementKind>,
    /// `Some(None)` clears the alignment
    pub align: Option<Option<Align>>,
}

impl NodeProperties {
    pub fn kind(kind: ElementKind) -> Self {
        Self {
            kind: Some(kind),
            align: None,
        }
    }

    pub fn align(align: Option<Align>) -> Self {
        Self {
            kind: None,
            align: Some(align),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// The in-memory tree of one post
#[derive(Debug, Clone)]
pub struct Document {
    entries: Vec<Option<Entry>>,
    roots: Vec<NodeId>,
    /// Vacant slots of `entries`, reused by later allocations
    free_slots: Vec<usize>,
}

impl Document {
    /// A document with one empty paragraph
    pub fn new() -> Self {
        Self::from_descendants(vec![Descendant::plain_paragraph("")])
    }

    pub fn from_descendants(nodes: Vec<Descendant>) -> Self {
        let mut doc = Self {
            entries: Vec::new(),
            roots: Vec::new(),
            free_slots: Vec::new(),
        };
        for node in nodes {
            let index = doc.roots.len();
            doc.insert_node(node, Location::root(index));
        }
        doc
    }

    /// Snapshot the whole tree in owned form
    pub fn to_descendants(&self) -> Vec<Descendant> {
        self.roots
            .iter()
            .filter_map(|&id| self.descendant(id))
            .collect()
    }

    /// Snapshot one subtree in owned form
    pub fn descendant(&self, id: NodeId) -> Option<Descendant> {
        let entry = self.entry(id)?;
        Some(match &entry.data {
            NodeData::Text(text) => Descendant::Text(text.clone()),
            NodeData::Element { kind, align } => Descendant::Element(Element {
                kind: kind.clone(),
                align: *align,
                children: entry
                    .children
                    .iter()
                    .filter_map(|&child| self.descendant(child))
                    .collect(),
            }),
        })
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.entry(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.entry(id).map(|entry| &entry.data)
    }

    pub fn text(&self, id: NodeId) -> Option<&Text> {
        self.get(id)?.as_text()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.entry(id)
            .map(|entry| entry.children.as_slice())
            .unwrap_or(&[])
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.entries.len() - self.free_slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Position of a node among its siblings
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.entry(id)?.parent;
        self.siblings(parent)?.iter().position(|&sibling| sibling == id)
    }

    /// Ancestors of a node, nearest first
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            result.push(ancestor);
            current = self.parent(ancestor);
        }
        result
    }

    /// The closest block element containing `id` (or `id` itself)
    pub fn nearest_block(&self, id: NodeId) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&candidate| self.get(candidate).is_some_and(NodeData::is_block))
    }

    /// A block element whose children are text and inline nodes only
    pub fn is_text_block(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(NodeData::is_block)
            && self
                .children(id)
                .iter()
                .all(|&child| !self.get(child).is_some_and(NodeData::is_block))
    }

    /// Every node in document (depth-first, pre-order) order
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        for &root in &self.roots {
            self.walk(root, &mut out);
        }
        out
    }

    /// Text leaves in document order
    pub fn text_leaves(&self) -> Vec<NodeId> {
        self.descendants()
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(NodeData::is_text))
            .collect()
    }

    /// Concatenated text of all leaves
    pub fn text_content(&self) -> String {
        self.text_leaves()
            .into_iter()
            .filter_map(|id| self.text(id))
            .map(|text| text.text.as_str())
            .collect()
    }

    /// Structural path (child indices from the root) of a node
    pub fn path_of(&self, id: NodeId) -> Option<Vec<usize>> {
        let mut path = vec![self.index_in_parent(id)?];
        for ancestor in self.ancestors(id) {
            path.push(self.index_in_parent(ancestor)?);
        }
        path.reverse();
        Some(path)
    }

    pub fn node_at_path(&self, path: &[usize]) -> Option<NodeId> {
        let (&first, rest) = path.split_first()?;
        let mut current = *self.roots.get(first)?;
        for &index in rest {
            current = *self.children(current).get(index)?;
        }
        Some(current)
    }

    /// Insert a subtree. Refused when the parent is missing, a text leaf or a
    /// void element; the index is clamped to the child count.
    pub fn insert_node(&mut self, node: Descendant, at: Location) -> Option<NodeId> {
        let accepts = match at.parent {
            None => true,
            Some(parent) => self.get(parent).is_some_and(NodeData::accepts_children),
        };
        if !accepts {
            return None;
        }

        let id = self.build(node, at.parent);
        let siblings = self.siblings_mut(at.parent)?;
        let index = at.index.min(siblings.len());
        siblings.insert(index, id);
        Some(id)
    }

    /// Insert a subtree at a structural path; the last path segment is the
    /// child index
    pub fn insert_at_path(&mut self, node: Descendant, path: &[usize]) -> Option<NodeId> {
        let (&index, parent_path) = path.split_last()?;
        let parent = if parent_path.is_empty() {
            None
        } else {
            Some(self.node_at_path(parent_path)?)
        };
        self.insert_node(node, Location { parent, index })
    }

    /// Merge element properties into a node. Returns whether anything changed.
    pub fn set_node_properties(&mut self, id: NodeId, props: NodeProperties) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        let has_children = !entry.children.is_empty();
        let NodeData::Element { kind, align } = &mut entry.data else {
            return false;
        };

        let mut changed = false;
        if let Some(new_kind) = props.kind {
            // Void nodes are leaves
            if *kind != new_kind && !(new_kind.is_void() && has_children) {
                *kind = new_kind;
                changed = true;
            }
        }
        if let Some(new_align) = props.align {
            if *align != new_align {
                *align = new_align;
                changed = true;
            }
        }
        changed
    }

    pub fn set_marks(&mut self, id: NodeId, marks: Marks) -> bool {
        match self.entry_mut(id).map(|entry| &mut entry.data) {
            Some(NodeData::Text(text)) if text.marks != marks => {
                text.marks = marks;
                true
            }
            _ => false,
        }
    }

    /// Insert `content` into a text leaf at a char offset
    pub fn insert_text_at(&mut self, id: NodeId, offset: usize, content: &str) -> bool {
        match self.entry_mut(id).map(|entry| &mut entry.data) {
            Some(NodeData::Text(text)) => {
                let at = byte_offset(&text.text, offset);
                text.text.insert_str(at, content);
                true
            }
            _ => false,
        }
    }

    /// Split a text leaf at a char offset strictly inside it. The original id
    /// keeps the left part; the new right leaf is returned.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Option<NodeId> {
        let text = self.text(id)?;
        if offset == 0 || offset >= text.len() {
            return None;
        }

        let at = byte_offset(&text.text, offset);
        let right = Text::with_marks(&text.text[at..], text.marks);
        let parent = self.parent(id);
        let index = self.index_in_parent(id)?;

        if let Some(NodeData::Text(left)) = self.entry_mut(id).map(|entry| &mut entry.data) {
            left.text.truncate(at);
        }
        self.insert_node(
            Descendant::Text(right),
            Location {
                parent,
                index: index + 1,
            },
        )
    }

    /// Wrap each run of consecutive siblings among `ids` in a new element of
    /// `kind`. Returns the wrappers in document order.
    pub fn wrap_nodes(&mut self, ids: &[NodeId], kind: ElementKind) -> Vec<NodeId> {
        if kind.is_void() {
            return Vec::new();
        }

        let wanted: HashSet<NodeId> = ids.iter().copied().collect();
        let ordered: Vec<NodeId> = self
            .descendants()
            .into_iter()
            .filter(|id| wanted.contains(id))
            .filter(|&id| !self.ancestors(id).iter().any(|a| wanted.contains(a)))
            .collect();

        // Runs of adjacent siblings: (parent, first index, members)
        let mut runs: Vec<(Option<NodeId>, usize, Vec<NodeId>)> = Vec::new();
        for id in ordered {
            let (Some(index), parent) = (self.index_in_parent(id), self.parent(id)) else {
                continue;
            };
            match runs.last_mut() {
                Some((run_parent, start, members))
                    if *run_parent == parent && *start + members.len() == index =>
                {
                    members.push(id)
                }
                _ => runs.push((parent, index, vec![id])),
            }
        }

        // Later runs first so earlier indices stay valid
        let mut wrappers = Vec::with_capacity(runs.len());
        for (parent, start, members) in runs.into_iter().rev() {
            let wrapper = self.alloc(
                NodeData::Element {
                    kind: kind.clone(),
                    align: None,
                },
                parent,
            );
            if let Some(siblings) = self.siblings_mut(parent) {
                siblings.splice(start..start + members.len(), [wrapper]);
            }
            for &member in &members {
                if let Some(entry) = self.entry_mut(member) {
                    entry.parent = Some(wrapper);
                }
            }
            if let Some(entry) = self.entry_mut(wrapper) {
                entry.children = members;
            }
            wrappers.push(wrapper);
        }
        wrappers.reverse();
        wrappers
    }

    /// Move the given children of `parent` up one level. `parent` keeps the
    /// children before them, a copy of `parent` receives the children after
    /// them, and `parent` is removed if it ends up empty.
    pub fn lift_children(&mut self, parent: NodeId, children: &[NodeId]) -> bool {
        let Some(entry) = self.entry(parent) else {
            return false;
        };
        let positions: Vec<usize> = children
            .iter()
            .filter_map(|child| entry.children.iter().position(|c| c == child))
            .collect();
        let (Some(&first), Some(&last)) = (positions.iter().min(), positions.iter().max()) else {
            return false;
        };

        let data = entry.data.clone();
        let grandparent = entry.parent;
        let Some(parent_index) = self.index_in_parent(parent) else {
            return false;
        };

        let Some(entry) = self.entry_mut(parent) else {
            return false;
        };
        let trailing: Vec<NodeId> = entry.children.split_off(last + 1);
        let lifted: Vec<NodeId> = entry.children.split_off(first);
        let now_empty = entry.children.is_empty();

        for &child in &lifted {
            if let Some(child_entry) = self.entry_mut(child) {
                child_entry.parent = grandparent;
            }
        }
        let lifted_count = lifted.len();
        if let Some(siblings) = self.siblings_mut(grandparent) {
            let at = parent_index + 1;
            siblings.splice(at..at, lifted);
        }

        if !trailing.is_empty() {
            let copy = self.alloc(data, grandparent);
            for &child in &trailing {
                if let Some(child_entry) = self.entry_mut(child) {
                    child_entry.parent = Some(copy);
                }
            }
            if let Some(copy_entry) = self.entry_mut(copy) {
                copy_entry.children = trailing;
            }
            if let Some(siblings) = self.siblings_mut(grandparent) {
                siblings.insert(parent_index + 1 + lifted_count, copy);
            }
        }

        if now_empty {
            self.remove_node(parent);
        }
        true
    }

    /// Merge neighbouring text leaves that share marks, and fold empty leaves
    /// into a text neighbour. Leaves on either side of an inline void are
    /// never merged. Returns `(removed, kept, shift)` per merge: the text of
    /// `removed` now starts at char `shift` of `kept`.
    pub fn merge_text_runs(&mut self) -> Vec<(NodeId, NodeId, usize)> {
        let parents: Vec<NodeId> = self
            .descendants()
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(|data| !data.is_text()))
            .collect();

        let mut merges = Vec::new();
        for parent in parents {
            let mut previous: Option<NodeId> = None;
            for child in self.children(parent).to_vec() {
                let Some(right) = self.text(child).cloned() else {
                    previous = None;
                    continue;
                };
                let Some(left_id) = previous else {
                    previous = Some(child);
                    continue;
                };
                let Some(NodeData::Text(left)) = self.entry_mut(left_id).map(|e| &mut e.data)
                else {
                    previous = Some(child);
                    continue;
                };
                if left.marks != right.marks && !left.is_empty() && !right.is_empty() {
                    previous = Some(child);
                    continue;
                }

                let shift = left.len();
                if left.is_empty() {
                    left.marks = right.marks;
                }
                left.text.push_str(&right.text);
                self.remove_node(child);
                merges.push((child, left_id, shift));
            }
        }
        merges
    }

    /// Replace an element by its children
    pub fn unwrap_node(&mut self, id: NodeId) -> bool {
        let children = self.children(id).to_vec();
        if children.is_empty() || !self.get(id).is_some_and(|data| !data.is_text()) {
            return false;
        }
        self.lift_children(id, &children)
    }

    /// Unwrap every element matching `predicate`. Returns how many were
    /// unwrapped.
    pub fn unwrap_nodes<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&NodeData) -> bool,
    {
        let matching: Vec<NodeId> = self
            .descendants()
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(|data| !data.is_text() && predicate(data)))
            .collect();

        matching
            .into_iter()
            .rev()
            .filter(|&id| self.unwrap_node(id))
            .count()
    }

    /// Detach and drop a subtree, returning its owned form
    pub fn remove_node(&mut self, id: NodeId) -> Option<Descendant> {
        let snapshot = self.descendant(id)?;
        let parent = self.parent(id);
        if let Some(siblings) = self.siblings_mut(parent) {
            siblings.retain(|&sibling| sibling != id);
        }
        self.free(id);
        Some(snapshot)
    }

    fn entry(&self, id: NodeId) -> Option<&Entry> {
        self.entries.get(id.0)?.as_ref()
    }

    fn entry_mut(&mut self, id: NodeId) -> Option<&mut Entry> {
        self.entries.get_mut(id.0)?.as_mut()
    }

    fn siblings(&self, parent: Option<NodeId>) -> Option<&Vec<NodeId>> {
        match parent {
            None => Some(&self.roots),
            Some(id) => self.entry(id).map(|entry| &entry.children),
        }
    }

    fn siblings_mut(&mut self, parent: Option<NodeId>) -> Option<&mut Vec<NodeId>> {
        match parent {
            None => Some(&mut self.roots),
            Some(id) => self.entry_mut(id).map(|entry| &mut entry.children),
        }
    }

    fn alloc(&mut self, data: NodeData, parent: Option<NodeId>) -> NodeId {
        let entry = Entry {
            data,
            parent,
            children: Vec::new(),
        };
        match self.free_slots.pop() {
            Some(slot) => {
                self.entries[slot] = Some(entry);
                NodeId(slot)
            }
            None => {
                self.entries.push(Some(entry));
                NodeId(self.entries.len() - 1)
            }
        }
    }

    fn build(&mut self, node: Descendant, parent: Option<NodeId>) -> NodeId {
        match node {
            Descendant::Text(text) => self.alloc(NodeData::Text(text), parent),
            Descendant::Element(element) => {
                let is_void = element.kind.is_void();
                let id = self.alloc(
                    NodeData::Element {
                        kind: element.kind,
                        align: element.align,
                    },
                    parent,
                );
                if !is_void {
                    let children: Vec<NodeId> = element
                        .children
                        .into_iter()
                        .map(|child| self.build(child, Some(id)))
                        .collect();
                    if let Some(entry) = self.entry_mut(id) {
                        entry.children = children;
                    }
                }
                id
            }
        }
    }

    fn free(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.free(child);
        }
        if let Some(slot) = self.entries.get_mut(id.0) {
            if slot.take().is_some() {
                self.free_slots.push(id.0);
            }
        }
    }

    fn walk(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        for &child in self.children(id) {
            self.walk(child, out);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Document {
    /// Documents are equal when their trees are, regardless of node ids
    fn eq(&self, other: &Self) -> bool {
        self.to_descendants() == other.to_descendants()
    }
}

/// Byte index of a char offset, clamped to the end of the string
pub(crate) fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::HeadingLevel;

    fn items(texts: &[&str]) -> Vec<Descendant> {
        texts
            .iter()
            .map(|t| Descendant::list_item(vec![Descendant::text(*t)]))
            .collect()
    }

    #[test]
    fn test_default_document() {
        let doc = Document::new();
        assert_eq!(doc.to_descendants(), vec![Descendant::plain_paragraph("")]);
        assert_eq!(doc.text_leaves().len(), 1);
    }

    #[test]
    fn test_paths_round_trip() {
        let doc = Document::from_descendants(vec![
            Descendant::plain_paragraph("a"),
            Descendant::list(false, items(&["b", "c"])),
        ]);
        let leaf = doc.node_at_path(&[1, 1, 0]).unwrap();
        assert_eq!(doc.text(leaf).unwrap().text, "c");
        assert_eq!(doc.path_of(leaf), Some(vec![1, 1, 0]));
        assert_eq!(doc.node_at_path(&[2]), None);
    }

    #[test]
    fn test_insert_refuses_void_and_text_parents() {
        let mut doc = Document::from_descendants(vec![Descendant::paragraph(vec![
            Descendant::text("x"),
            Descendant::image("a.png", None),
        ])]);
        let leaf = doc.node_at_path(&[0, 0]).unwrap();
        let image = doc.node_at_path(&[0, 1]).unwrap();

        assert!(doc
            .insert_node(Descendant::text("y"), Location::child(image, 0))
            .is_none());
        assert!(doc
            .insert_node(Descendant::text("y"), Location::child(leaf, 0))
            .is_none());
        assert!(doc
            .insert_at_path(Descendant::plain_paragraph("z"), &[9])
            .is_some());
        assert_eq!(doc.text_content(), "xz");
    }

    #[test]
    fn test_set_node_properties_merges() {
        let mut doc = Document::from_descendants(vec![Descendant::plain_paragraph("t")]);
        let block = doc.roots()[0];

        assert!(doc.set_node_properties(block, NodeProperties::align(Some(Align::Center))));
        assert!(doc.set_node_properties(
            block,
            NodeProperties::kind(ElementKind::Heading(HeadingLevel::One))
        ));
        assert!(!doc.set_node_properties(block, NodeProperties::align(Some(Align::Center))));

        let data = doc.get(block).unwrap();
        assert_eq!(data.kind(), Some(&ElementKind::Heading(HeadingLevel::One)));
        assert_eq!(data.align(), Some(Align::Center));

        // A block with children cannot become void
        let image = ElementKind::Image {
            url: "a.png".to_string(),
            alt: None,
        };
        assert!(!doc.set_node_properties(block, NodeProperties::kind(image)));
    }

    #[test]
    fn test_split_text_keeps_marks() {
        let bold = Marks::default().with(crate::ast::Mark::Bold, true);
        let mut doc = Document::from_descendants(vec![Descendant::paragraph(vec![
            Descendant::marked("붕어빵", bold),
        ])]);
        let leaf = doc.text_leaves()[0];

        let right = doc.split_text(leaf, 1).unwrap();
        assert_eq!(doc.text(leaf).unwrap().text, "붕");
        assert_eq!(doc.text(right).unwrap().text, "어빵");
        assert_eq!(doc.text(right).unwrap().marks, bold);
        assert!(doc.split_text(leaf, 1).is_none());
        assert!(doc.split_text(leaf, 0).is_none());
    }

    #[test]
    fn test_wrap_nodes_groups_adjacent_siblings() {
        let mut doc = Document::from_descendants(vec![
            Descendant::plain_paragraph("a"),
            Descendant::plain_paragraph("b"),
            Descendant::plain_paragraph("c"),
            Descendant::plain_paragraph("d"),
        ]);
        let roots = doc.roots().to_vec();

        let wrappers = doc.wrap_nodes(&[roots[3], roots[0], roots[1]], ElementKind::BulletedList);
        assert_eq!(wrappers.len(), 2);
        assert_eq!(
            doc.to_descendants(),
            vec![
                Descendant::list(
                    false,
                    vec![
                        Descendant::plain_paragraph("a"),
                        Descendant::plain_paragraph("b")
                    ]
                ),
                Descendant::plain_paragraph("c"),
                Descendant::list(false, vec![Descendant::plain_paragraph("d")]),
            ]
        );
        assert_eq!(doc.parent(roots[0]), Some(wrappers[0]));
    }

    #[test]
    fn test_lift_children_splits_parent() {
        let mut doc =
            Document::from_descendants(vec![Descendant::list(true, items(&["a", "b", "c", "d"]))]);
        let list = doc.roots()[0];
        let children = doc.children(list).to_vec();

        assert!(doc.lift_children(list, &children[1..3]));
        assert_eq!(
            doc.to_descendants(),
            vec![
                Descendant::list(true, items(&["a"])),
                items(&["b"]).remove(0),
                items(&["c"]).remove(0),
                Descendant::list(true, items(&["d"])),
            ]
        );
        assert_eq!(doc.parent(children[1]), None);
    }

    #[test]
    fn test_lift_all_children_removes_parent() {
        let mut doc = Document::from_descendants(vec![Descendant::list(false, items(&["a"]))]);
        let list = doc.roots()[0];
        let item = doc.children(list)[0];

        assert!(doc.lift_children(list, &[item]));
        assert!(!doc.contains(list));
        assert_eq!(doc.roots(), &[item]);
    }

    #[test]
    fn test_unwrap_nodes_by_predicate() {
        let mut doc = Document::from_descendants(vec![
            Descendant::list(false, items(&["a", "b"])),
            Descendant::plain_paragraph("c"),
            Descendant::list(true, items(&["d"])),
        ]);

        let count = doc.unwrap_nodes(NodeData::is_list);
        assert_eq!(count, 2);
        assert_eq!(doc.roots().len(), 4);
        assert_eq!(doc.text_content(), "abcd");
    }

    #[test]
    fn test_remove_node_frees_subtree() {
        let mut doc = Document::from_descendants(vec![
            Descendant::list(false, items(&["a", "b"])),
            Descendant::plain_paragraph("c"),
        ]);
        let before = doc.len();
        let removed = doc.remove_node(doc.roots()[0]).unwrap();

        assert_eq!(removed.text_content(), "ab");
        assert_eq!(doc.len(), before - 5);
        assert_eq!(doc.text_content(), "c");
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut doc = Document::from_descendants(vec![Descendant::plain_paragraph("a")]);
        let block = doc.roots()[0];

        for _ in 0..10 {
            let wrappers = doc.wrap_nodes(&[block], ElementKind::BulletedList);
            assert_eq!(wrappers.len(), 1);
            assert!(doc.unwrap_node(wrappers[0]));
        }
        assert_eq!(doc.entries.len(), 3);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.to_descendants(), vec![Descendant::plain_paragraph("a")]);
    }

    #[test]
    fn test_merge_text_runs() {
        let bold = Marks::default().with(crate::ast::Mark::Bold, true);
        let mut doc = Document::from_descendants(vec![Descendant::paragraph(vec![
            Descendant::marked("ab", bold),
            Descendant::marked("cd", bold),
            Descendant::text("e"),
            Descendant::image("a.png", None),
            Descendant::text(""),
            Descendant::marked("f", bold),
        ])]);
        let leaves = doc.text_leaves();

        let merges = doc.merge_text_runs();
        assert_eq!(
            merges,
            vec![(leaves[1], leaves[0], 2), (leaves[4], leaves[3], 0)]
        );
        assert_eq!(
            doc.to_descendants(),
            vec![Descendant::paragraph(vec![
                Descendant::marked("abcd", bold),
                Descendant::text("e"),
                Descendant::image("a.png", None),
                Descendant::marked("f", bold),
            ])]
        );
        assert!(doc.merge_text_runs().is_empty());
    }

    #[test]
    fn test_merge_keeps_empty_leaf_after_image() {
        let mut doc = Document::from_descendants(vec![Descendant::paragraph(vec![
            Descendant::text("a"),
            Descendant::image("a.png", None),
            Descendant::text(""),
        ])]);
        assert!(doc.merge_text_runs().is_empty());
        assert_eq!(doc.text_leaves().len(), 2);
    }

    #[test]
    fn test_text_block_and_nearest_block() {
        let doc = Document::from_descendants(vec![Descendant::list(false, items(&["a"]))]);
        let list = doc.roots()[0];
        let item = doc.children(list)[0];
        let leaf = doc.children(item)[0];

        assert!(doc.is_text_block(item));
        assert!(!doc.is_text_block(list));
        assert_eq!(doc.nearest_block(leaf), Some(item));
        assert_eq!(doc.ancestors(leaf), vec![item, list]);
    }
}
