//! richpost-core - rich document model for board posts
//!
//! This crate provides the document tree, the editing commands that toolbar
//! buttons map to, and HTML serialization. It is used by `richpost`, which
//! adds HTML import, change notification and the toolbar registry.
//!
//! # Architecture
//!
//! ```text
//!                 ┌──────────────────────────┐
//! toolbar intent ─▶ EditorState              │
//!                 │   commands ─▶ Document   │ ──serialize──▶ HTML String
//! selection ─────▶│   queries  ◀─ (arena)    │
//!                 └──────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use richpost_core::{serialize, Descendant, Document, EditorState, Mark, Options};
//!
//! let doc = Document::from_descendants(vec![Descendant::plain_paragraph("hello")]);
//! let mut state = EditorState::new(doc);
//! state.selection = state.document.select_all();
//! state.toggle_mark(Mark::Bold);
//!
//! let html = serialize(&state.document, &Options::default());
//! assert_eq!(html, "<p><strong>hello</strong></p>");
//! ```

mod ast;
mod commands;
mod format;
mod options;
mod query;
mod selection;
mod serialize;
mod tree;

pub use ast::{Align, Descendant, Element, ElementKind, HeadingLevel, Mark, Marks, Text};
pub use commands::EditorState;
pub use format::{BlockFormat, Format};
pub use options::{Options, DEFAULT_IMAGE_STYLE};
pub use selection::{Point, Selection};
pub use serialize::{serialize, serialize_node_to_string};
pub use tree::{Document, Location, NodeData, NodeId, NodeProperties};
