//! Error handling for dom-template
//!
//! The core template operations have no error taxonomy of their own: an
//! unresolved anchor is a defined no-op during rendering, and errors raised by
//! caller-supplied closures pass through the `try_*` operations unmodified.
//! This module covers everything around that core.
//!
//! # Error Types
//!
//! - [`Error::AnchorError`] - Anchor lists that break offset ordering or bounds
//! - [`Error::CacheError`] - Failures reported while filling the template cache
//! - [`Error::Utf8Error`] - Rendered output that is not valid UTF-8
//! - [`Error::JsonError`] - JSON conversion of serializable segment sources
//! - [`Error::IoError`] - Writing rendered output to an [`std::io::Write`]
//!
//! # Usage
//!
//! ```rust,ignore
//! use dom_template::{Error, Template};
//!
//! match Template::<&str>::from_parts(b"ab".to_vec(), vec![("k", 3).into()]) {
//!     Ok(template) => println!("{} anchors", template.anchors().len()),
//!     Err(Error::AnchorError(msg)) => println!("Bad anchors: {}", msg),
//!     Err(err) => println!("Other error: {}", err),
//! }
//! ```
//!
//! Messages use `Cow<'static, str>` so static messages cost no allocation.

use std::borrow::Cow;
use thiserror::Error;

/// Error type for all fallible dom-template operations
#[derive(Error, Debug)]
pub enum Error {
    /// Anchor ordering or bounds violations
    ///
    /// Raised when a template is assembled from raw parts (directly or through
    /// deserialization) and an anchor offset decreases or points past the end
    /// of the literal buffer.
    #[error("Anchor error: {0}")]
    AnchorError(Cow<'static, str>),

    /// Template cache errors
    ///
    /// Raised by loaders passed to [`TemplateCache::get_or_freeze`] that cannot
    /// produce a template.
    ///
    /// [`TemplateCache::get_or_freeze`]: crate::cache::TemplateCache::get_or_freeze
    #[error("Cache error: {0}")]
    CacheError(Cow<'static, str>),

    /// Rendered bytes were requested as a `String` but are not UTF-8
    #[error("UTF-8 error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// JSON parsing and serialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// I/O errors while writing rendered output
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Create an anchor error with a static string
    pub fn anchor_static(msg: &'static str) -> Self {
        Error::AnchorError(Cow::Borrowed(msg))
    }

    /// Create an anchor error with an owned string
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use dom_template::Error;
    ///
    /// let error = Error::anchor_owned(format!("offset {} out of bounds", 12));
    /// ```
    pub fn anchor_owned(msg: String) -> Self {
        Error::AnchorError(Cow::Owned(msg))
    }

    /// Create a cache error with a static string
    pub fn cache_static(msg: &'static str) -> Self {
        Error::CacheError(Cow::Borrowed(msg))
    }

    /// Create a cache error with an owned string
    pub fn cache_owned(msg: String) -> Self {
        Error::CacheError(Cow::Owned(msg))
    }
}

/// Result type alias for dom-template operations
pub type Result<T> = std::result::Result<T, Error>;
