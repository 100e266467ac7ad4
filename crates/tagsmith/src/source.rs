//! Renderable sources and the stack that composes them.
//!
//! A [`Source`] is a body of rendering code: a closure that receives the
//! [`Template`] it runs in. Sources come in two flavors:
//!
//! - **File** sources carry the name of the resource they were loaded from.
//!   Errors raised while evaluating them are wrapped in
//!   [`RenderError::Source`] with that name, so failures point at the resource.
//! - **Inline** sources are anonymous. Their errors propagate unchanged.
//!
//! # Layouts
//!
//! A source may name a layout, and that layout may name its own. Seeding a
//! [`SourceStack`] with such a chain leaves the outermost layout on top, so it
//! is evaluated first and each [`Template::yield_content`] call descends one
//! level:
//!
//! ```rust
//! use tagsmith::{render_to_string, Data, Source};
//!
//! let layout = Source::file("layouts/page", |t| {
//!     t.element("html", |t| t.yield_content())
//! });
//! let page = Source::inline(|t| t.text("hello")).with_layout(layout);
//!
//! let html = render_to_string(page, Data::new()).unwrap();
//! assert_eq!(html, "<html>hello</html>");
//! ```

use std::fmt;
use std::panic::Location;
use std::rc::Rc;

use log::debug;

use crate::error::RenderError;
use crate::template::Template;

/// The signature every source body has.
pub type Body = dyn Fn(&mut Template<'_, '_>) -> Result<(), RenderError>;

/// Where a source came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// A named resource, such as a template file.
    File { name: String },
    /// An anonymous closure.
    Inline,
}

/// A unit of renderable code.
///
/// Sources are cheap to clone; clones share the same body.
#[derive(Clone)]
pub struct Source {
    origin: Origin,
    body: Rc<Body>,
    layout: Option<Box<Source>>,
    defined_at: &'static Location<'static>,
}

impl Source {
    /// Creates an anonymous source.
    #[track_caller]
    pub fn inline<F>(body: F) -> Self
    where
        F: Fn(&mut Template<'_, '_>) -> Result<(), RenderError> + 'static,
    {
        Self {
            origin: Origin::Inline,
            body: Rc::new(body),
            layout: None,
            defined_at: Location::caller(),
        }
    }

    /// Creates a source for the resource `name`.
    #[track_caller]
    pub fn file<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Template<'_, '_>) -> Result<(), RenderError> + 'static,
    {
        Self {
            origin: Origin::File { name: name.into() },
            ..Self::inline(body)
        }
    }

    /// A source that renders nothing.
    #[track_caller]
    pub fn empty() -> Self {
        Self::inline(|_| Ok(()))
    }

    /// Wraps this source in `layout`. The layout's `yield_content` renders
    /// this source.
    pub fn with_layout(mut self, layout: Source) -> Self {
        self.layout = Some(Box::new(layout));
        self
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn is_file(&self) -> bool {
        matches!(self.origin, Origin::File { .. })
    }

    /// The resource name of a file source.
    pub fn name(&self) -> Option<&str> {
        match &self.origin {
            Origin::File { name } => Some(name),
            Origin::Inline => None,
        }
    }

    pub fn layout(&self) -> Option<&Source> {
        self.layout.as_deref()
    }

    /// Where in Rust code this source was constructed.
    pub fn defined_at(&self) -> &'static Location<'static> {
        self.defined_at
    }

    /// Runs the body against `template`.
    pub(crate) fn evaluate(&self, template: &mut Template<'_, '_>) -> Result<(), RenderError> {
        match &self.origin {
            Origin::File { name } => {
                debug!("evaluating source {}", name);
                (self.body)(template).map_err(|err| RenderError::Source {
                    name: name.clone(),
                    line: 1,
                    source: Box::new(err),
                })
            }
            Origin::Inline => {
                debug!("evaluating inline source defined at {}", self.defined_at);
                (self.body)(template)
            }
        }
    }
}

impl Default for Source {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("origin", &self.origin)
            .field("layout", &self.layout)
            .field("defined_at", &self.defined_at)
            .finish_non_exhaustive()
    }
}

/// A LIFO stack of sources.
#[derive(Debug, Default)]
pub struct SourceStack {
    sources: Vec<Source>,
}

impl SourceStack {
    /// Seeds a stack with `source` followed by its chain of layouts.
    ///
    /// The outermost layout ends up on top.
    pub fn new(source: Source) -> Self {
        let mut stack = Self::default();
        let mut next = Some(source);
        while let Some(mut source) = next {
            next = source.layout.take().map(|layout| *layout);
            stack.push(source);
        }
        stack
    }

    pub fn push(&mut self, source: Source) {
        self.sources.push(source);
    }

    /// Removes the top source. An empty stack yields `None`.
    pub fn pop(&mut self) -> Option<Source> {
        self.sources.pop()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(stack: &mut SourceStack) -> Vec<Option<String>> {
        std::iter::from_fn(|| stack.pop())
            .map(|source| source.name().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_file_and_inline_origins() {
        let file = Source::file("pages/index", |_| Ok(()));
        assert!(file.is_file());
        assert_eq!(file.name(), Some("pages/index"));

        let inline = Source::inline(|_| Ok(()));
        assert!(!inline.is_file());
        assert_eq!(inline.name(), None);
        assert_eq!(inline.origin(), &Origin::Inline);
    }

    #[test]
    fn test_defined_at_points_at_caller() {
        let source = Source::empty();
        assert_eq!(source.defined_at().file(), file!());
    }

    #[test]
    fn test_stack_is_lifo() {
        let mut stack = SourceStack::default();
        stack.push(Source::file("a", |_| Ok(())));
        stack.push(Source::file("b", |_| Ok(())));
        assert_eq!(stack.len(), 2);
        assert_eq!(
            names(&mut stack),
            vec![Some("b".to_string()), Some("a".to_string())]
        );
    }

    #[test]
    fn test_pop_on_empty_is_none() {
        let mut stack = SourceStack::default();
        assert!(stack.is_empty());
        assert!(stack.pop().is_none());
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_layout_chain_puts_outermost_on_top() {
        let outer = Source::file("outer", |_| Ok(()));
        let inner = Source::file("inner", |_| Ok(())).with_layout(outer);
        let page = Source::file("page", |_| Ok(())).with_layout(inner);

        let mut stack = SourceStack::new(page);
        assert_eq!(
            names(&mut stack),
            vec![
                Some("outer".to_string()),
                Some("inner".to_string()),
                Some("page".to_string()),
            ]
        );
    }

    #[test]
    fn test_stack_drops_layout_links() {
        let page = Source::inline(|_| Ok(())).with_layout(Source::empty());
        assert!(page.layout().is_some());

        let mut stack = SourceStack::new(page);
        while let Some(source) = stack.pop() {
            assert!(source.layout().is_none());
        }
    }
}
