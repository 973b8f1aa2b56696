//! Editor configuration

pub use richpost_core::Options as SerializeOptions;

/// How stored HTML is turned back into a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeserializeMode {
    /// Keep only the text, in a single paragraph
    #[default]
    PlainText,
    /// Recover blocks, alignment, marks and images
    Structured,
}

/// Options for [`crate::Editor`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorOptions {
    /// Options for the HTML handed to the change callback
    pub serialize: SerializeOptions,

    /// Deserialization used by `from_html` and `set_value`
    pub deserialize_mode: DeserializeMode,
}
