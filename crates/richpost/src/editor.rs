//! Editor - the main entry point for editing a board post.

use std::fmt;
use std::future::Future;

use richpost_core::{
    serialize, Align, BlockFormat, Document, EditorState, Format, Mark, NodeData, Selection,
};
use tracing::{debug, trace, warn};

use crate::format::parse_format;
use crate::options::EditorOptions;
use crate::{Result, RichPostError};

type ChangeCallback = Box<dyn FnMut(&str)>;

/// A post being edited: the document, the host's selection and the HTML
/// value kept in sync with every change.
pub struct Editor {
    state: EditorState,
    options: EditorOptions,
    value: String,
    on_change: Option<ChangeCallback>,
}

impl Editor {
    /// Create an editor holding one empty paragraph
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    /// Create an empty editor with custom options
    pub fn with_options(options: EditorOptions) -> Self {
        let state = EditorState::new(Document::new());
        let value = serialize(&state.document, &options.serialize);
        Self {
            state,
            options,
            value,
            on_change: None,
        }
    }

    /// Open a stored post for editing
    #[cfg(feature = "html")]
    pub fn from_html(value: &str, options: EditorOptions) -> Self {
        let mut editor = Self::with_options(options);
        editor.set_value(value);
        editor
    }

    /// Replace the content from outside, e.g. when the form is reset.
    /// The selection is cleared and the change callback is not invoked.
    #[cfg(feature = "html")]
    pub fn set_value(&mut self, value: &str) {
        let document = crate::html::deserialize_with(value, self.options.deserialize_mode);
        debug!(mode = ?self.options.deserialize_mode, "reset editor value");
        self.set_document(document);
    }

    /// Replace the whole document without notifying the change callback
    pub fn set_document(&mut self, document: Document) {
        self.state = EditorState::new(document);
        self.value = serialize(&self.state.document, &self.options.serialize);
    }

    /// The HTML of the current document
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Register the callback that receives the HTML after every change
    pub fn on_change<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnMut(&str) + 'static,
    {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn document(&self) -> &Document {
        &self.state.document
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Get the current options
    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut EditorOptions {
        &mut self.options
    }

    pub fn selection(&self) -> Option<Selection> {
        self.state.selection
    }

    /// Set the host's selection. Points must name text leaves of this
    /// document at offsets within their text.
    pub fn set_selection(&mut self, selection: Option<Selection>) -> Result<()> {
        if let Some(selection) = selection {
            if !selection.is_valid(&self.state.document) {
                return Err(RichPostError::InvalidSelection(format!(
                    "{:?} does not address this document",
                    selection
                )));
            }
        }
        self.state.select(selection);
        Ok(())
    }

    /// Select the whole document
    pub fn select_all(&mut self) {
        let selection = self.state.document.select_all();
        self.state.select(selection);
    }

    /// Put a collapsed cursor at the end of the document
    pub fn collapse_to_end(&mut self) {
        let selection = self.state.document.end_point().map(Selection::collapsed);
        self.state.select(selection);
    }

    pub fn toggle_mark(&mut self, mark: Mark) -> bool {
        let changed = self.state.toggle_mark(mark);
        self.commit(changed, mark.as_str())
    }

    pub fn toggle_block(&mut self, format: Format) -> bool {
        let changed = self.state.toggle_block(format);
        self.commit(changed, format.name())
    }

    /// Insert an image without alternative text
    pub fn insert_image(&mut self, url: &str) -> bool {
        self.insert_image_with_alt(url, None)
    }

    pub fn insert_image_with_alt(&mut self, url: &str, alt: Option<String>) -> bool {
        let changed = self.state.insert_image(url, alt);
        self.commit(changed, "insert-image")
    }

    pub fn insert_text(&mut self, content: &str) -> bool {
        let changed = self.state.insert_text(content);
        self.commit(changed, "insert-text")
    }

    /// Run the command behind a toolbar format
    pub fn execute(&mut self, format: Format) -> bool {
        match format {
            Format::Mark(mark) => self.toggle_mark(mark),
            _ => self.toggle_block(format),
        }
    }

    /// Run the command behind a toolbar name such as `"heading-one"`
    pub fn execute_named(&mut self, name: &str) -> Result<bool> {
        let format = parse_format(name)?;
        Ok(self.execute(format))
    }

    pub fn is_mark_active(&self, mark: Mark) -> bool {
        self.state.is_mark_active(mark)
    }

    pub fn is_block_active(&self, format: Format) -> bool {
        self.state.is_block_active(format)
    }

    pub fn has_block_type(&self, format: BlockFormat) -> bool {
        self.state.has_block_type(format)
    }

    pub fn has_alignment(&self, align: Align) -> bool {
        self.state.has_alignment(align)
    }

    /// Await an image upload and insert the returned URL at the cursor.
    /// A failed upload leaves the document untouched.
    pub async fn insert_uploaded_image<Fut, E>(&mut self, upload: Fut) -> Result<bool>
    where
        Fut: Future<Output = std::result::Result<String, E>>,
        E: fmt::Display,
    {
        match upload.await {
            Ok(url) => Ok(self.insert_image(&url)),
            Err(err) => {
                warn!(error = %err, "image upload failed");
                Err(RichPostError::ImageUpload(err.to_string()))
            }
        }
    }

    /// Whether the post has neither text nor images
    pub fn is_blank(&self) -> bool {
        let doc = &self.state.document;
        let has_image = doc.descendants().into_iter().any(|id| {
            matches!(
                doc.get(id).and_then(NodeData::kind),
                Some(kind) if kind.is_void()
            )
        });
        !has_image && doc.text_content().trim().is_empty()
    }

    fn commit(&mut self, changed: bool, command: &str) -> bool {
        if !changed {
            trace!(command, "command left the document unchanged");
            return false;
        }

        self.value = serialize(&self.state.document, &self.options.serialize);
        debug!(command, len = self.value.len(), "document changed");
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.value);
        }
        true
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
