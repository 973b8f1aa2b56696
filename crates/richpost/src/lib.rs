//! # richpost
//!
//! Rich text editing for board posts.
//!
//! The document model, editing commands and HTML serialization live in
//! [`richpost_core`]. This crate wraps them in an [`Editor`] that keeps the
//! stored HTML value in sync and notifies the host on every change, a
//! [`Toolbar`] registry, and (with the default `html` feature) conversion of
//! stored HTML back into a document.
//!
//! ## Example
//!
//! ```rust
//! use richpost::{Editor, Mark};
//!
//! let mut editor = Editor::new();
//! editor.collapse_to_end();
//! editor.insert_text("hello");
//! editor.select_all();
//! editor.toggle_mark(Mark::Bold);
//!
//! assert_eq!(editor.value(), "<p><strong>hello</strong></p>");
//! assert!(editor.is_mark_active(Mark::Bold));
//! ```
//!
//! ## Example (toolbar)
//!
//! ```rust
//! use richpost::{Editor, EditorOptions, Toolbar};
//!
//! let mut editor = Editor::from_html("<p>item</p>", EditorOptions::default());
//! editor.select_all();
//!
//! let toolbar = Toolbar::new();
//! toolbar.press(&mut editor, "bulleted-list").unwrap();
//! assert_eq!(editor.value(), "<ul><li>item</li></ul>");
//! ```

mod editor;
mod format;
#[cfg(feature = "html")]
pub mod html;
mod options;
mod toolbar;
mod utilities;

pub use editor::Editor;
pub use format::parse_format;
#[cfg(feature = "html")]
pub use html::{deserialize, deserialize_with};
pub use options::{DeserializeMode, EditorOptions, SerializeOptions};
pub use toolbar::{ControlState, Toolbar};
pub use utilities::parse_text_align;

pub use richpost_core::{
    serialize, Align, BlockFormat, Descendant, Document, EditorState, Element, ElementKind,
    Format, HeadingLevel, Mark, Marks, NodeId, Point, Selection, Text, DEFAULT_IMAGE_STYLE,
};

/// Error type for editor operations
#[derive(Debug, thiserror::Error)]
pub enum RichPostError {
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Image upload failed: {0}")]
    ImageUpload(String),
}

pub type Result<T> = std::result::Result<T, RichPostError>;
