//! What a template can render as a partial.

use crate::source::Source;

/// Either a source to render in a nested template, or markup to splice in as is.
#[derive(Debug, Clone)]
pub enum Partial {
    /// Rendered by a nested template with its own data, sharing the output.
    Source(Source),
    /// Inserted verbatim into the current scope. Never escaped.
    Markup(String),
}

impl From<Source> for Partial {
    fn from(source: Source) -> Self {
        Partial::Source(source)
    }
}

impl From<&Source> for Partial {
    fn from(source: &Source) -> Self {
        Partial::Source(source.clone())
    }
}

impl From<&str> for Partial {
    fn from(markup: &str) -> Self {
        Partial::Markup(markup.to_string())
    }
}

impl From<String> for Partial {
    fn from(markup: String) -> Self {
        Partial::Markup(markup)
    }
}
