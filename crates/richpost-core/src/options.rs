//! Configuration options for HTML serialization

/// Inline style given to serialized images unless configured otherwise
pub const DEFAULT_IMAGE_STYLE: &str = "max-width: 100%; height: auto;";

/// Options for HTML serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Value of the `style` attribute on `<img>` tags; omitted when empty
    pub image_style: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            image_style: DEFAULT_IMAGE_STYLE.to_string(),
        }
    }
}
