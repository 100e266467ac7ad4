//! Error types for markup rendering.
//!
//! [`RenderError`] covers the three kinds of failure a rendering pass can hit:
//!
//! - Configuration errors, raised while a [`Template`](crate::Template) is being
//!   bound and before any output is written.
//! - Evaluation errors, raised by source bodies and propagated unchanged to the
//!   caller (file-origin sources add their name and line).
//! - Stack-discipline violations, which indicate mismatched scope push/pop calls.

use std::fmt;

use thiserror::Error;

/// Error type for rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No output was supplied to the template builder.
    #[error("please provide an output to render into")]
    MissingOutput,

    /// One or more data keys shadow a public template operation.
    #[error("data conflicts with template operations: {}", keys.join(", "))]
    DataConflict { keys: Vec<String> },

    /// A source body asked for a data binding that does not exist.
    #[error("undefined data: {key}")]
    UndefinedData { key: String },

    /// Data could not be converted to or from its serialized form.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An error raised while evaluating a file-origin source.
    #[error("{name}:{line}: {source}")]
    Source {
        name: String,
        line: u32,
        #[source]
        source: Box<RenderError>,
    },

    /// A failure reported by a source body itself.
    #[error("{0}")]
    Body(String),

    /// `pop_scope` was called with only the root scope left.
    #[error("cannot pop the root scope")]
    ScopeUnderflow,

    /// `push_scope` was called with no element to descend into.
    #[error("no element to push as the current scope")]
    NothingToPush,

    /// `push_scope` or `element` tried to descend into a closed element.
    #[error("<{name} /> cannot contain children")]
    ClosedElement { name: String },

    /// The output sink rejected a write.
    #[error("write error: {0}")]
    Write(#[from] fmt::Error),
}

impl RenderError {
    /// Builds an evaluation error from a message.
    ///
    /// Source bodies use this to fail a render with their own diagnostics.
    pub fn body(msg: impl Into<String>) -> Self {
        RenderError::Body(msg.into())
    }

    /// Returns the innermost error, unwrapping any file-origin context.
    pub fn root_cause(&self) -> &RenderError {
        match self {
            RenderError::Source { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Serialization(err.to_string())
    }
}
