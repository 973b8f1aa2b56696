//! Toolbar format names

use richpost_core::Format;

use crate::{Result, RichPostError};

/// Parse a toolbar name such as `"bold"`, `"heading-two"` or `"center"`.
///
/// ```rust
/// use richpost::{parse_format, Align, Format};
///
/// assert_eq!(parse_format("center").unwrap(), Format::Align(Align::Center));
/// assert!(parse_format("code").is_err());
/// ```
pub fn parse_format(name: &str) -> Result<Format> {
    Format::from_name(name.trim()).ok_or_else(|| RichPostError::UnknownFormat(name.to_string()))
}
