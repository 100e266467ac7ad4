//! A single rendering pass.
//!
//! [`Template`] ties together an [`Output`], a set of [`Data`] bindings and a
//! [`SourceStack`]. Every source body receives the template as `&mut Template`
//! and builds markup by calling its methods.
//!
//! # Lifecycle
//!
//! 1. **Bound**: [`Template::new`] (or [`TemplateBuilder::build`]) checks the
//!    data against [`RESERVED_NAMES`] and seeds the source stack.
//! 2. **Rendering**: [`Template::render`] opens a root scope if the output has
//!    none yet, then yields to the top of the source stack once.
//! 3. **Flushed**: when evaluation returns, the output's current scope is
//!    flushed so nothing is left held back.

use std::fmt;

use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::partial::Partial;
use crate::data::Data;
use crate::element::{Attributes, Element};
use crate::error::RenderError;
use crate::escape::escape_html;
use crate::node::Node;
use crate::output::Output;
use crate::source::{Source, SourceStack};

/// Names of the public [`Template`] operations.
///
/// Data keys may not use these names, so a binding can never be confused with
/// an operation.
pub const RESERVED_NAMES: &[&str] = &[
    "attrs",
    "builder",
    "data",
    "depth",
    "element",
    "emit",
    "flush",
    "get",
    "get_as",
    "new",
    "partial",
    "pop_scope",
    "push_scope",
    "raw",
    "render",
    "text",
    "yield_content",
];

/// One rendering pass over a source stack.
///
/// # Example
///
/// ```rust
/// use tagsmith::{Data, Element, Output, Source, Template};
///
/// let source = Source::inline(|t| {
///     let title = t.get("title")?.as_str().unwrap_or_default().to_string();
///     t.element(Element::new("div").class("card"), |t| {
///         t.element("h1", |t| t.text(&title))?;
///         t.emit(Element::closed("hr"))
///     })
/// });
///
/// let mut html = String::new();
/// let mut output = Output::new(&mut html);
/// Template::new(&mut output, Data::new().with("title", "Fish & Chips"), source)
///     .unwrap()
///     .render()
///     .unwrap();
///
/// assert_eq!(
///     html,
///     r#"<div class="card"><h1>Fish &amp; Chips</h1><hr /></div>"#
/// );
/// ```
pub struct Template<'o, 'w> {
    output: &'o mut Output<'w>,
    data: Data,
    sources: SourceStack,
}

impl<'o, 'w> Template<'o, 'w> {
    /// Binds `data` and `source` to `output`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::DataConflict`] if any data key is one of
    /// [`RESERVED_NAMES`], or [`RenderError::Serialization`] if a value given
    /// to [`Data::with`] failed to serialize. Nothing is written in either case.
    pub fn new(output: &'o mut Output<'w>, data: Data, source: Source) -> Result<Self, RenderError> {
        data.check()?;
        let conflicts = data.conflicts(RESERVED_NAMES);
        if !conflicts.is_empty() {
            return Err(RenderError::DataConflict { keys: conflicts });
        }
        Ok(Self {
            output,
            data,
            sources: SourceStack::new(source),
        })
    }

    pub fn builder() -> TemplateBuilder<'o, 'w> {
        TemplateBuilder::default()
    }

    /// Renders the source stack into the output.
    pub fn render(mut self) -> Result<(), RenderError> {
        if self.output.seed(Node::Root) {
            trace!("seeded root scope");
        }
        debug!(
            "rendering {} source(s) at depth {}",
            self.sources.len(),
            self.output.depth()
        );
        self.yield_content()?;
        self.flush()?;
        debug!("render complete");
        Ok(())
    }

    /// Emits `element` and renders `body` inside it.
    ///
    /// If `body` fails, every scope it left open is closed before the error is
    /// returned, so a caller that recovers keeps writing into its own scope.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ClosedElement`] for a closed element, which is
    /// still emitted but cannot hold children. Use [`emit`](Self::emit) for
    /// those.
    pub fn element<F>(&mut self, element: impl Into<Element>, body: F) -> Result<(), RenderError>
    where
        F: FnOnce(&mut Self) -> Result<(), RenderError>,
    {
        self.output.add_element(element.into())?;
        let depth = self.output.depth();
        self.output.push()?;
        if let Err(err) = body(self) {
            self.output.unwind(depth);
            return Err(err);
        }
        self.output.pop()
    }

    /// Emits `element` without a body.
    ///
    /// The element stays held back until the next write, so
    /// [`push_scope`](Self::push_scope) can still descend into it.
    pub fn emit(&mut self, element: impl Into<Element>) -> Result<(), RenderError> {
        self.output.add_element(element.into())
    }

    /// Writes escaped text into the current scope.
    pub fn text(&mut self, text: impl AsRef<str>) -> Result<(), RenderError> {
        self.output.add_markup(&escape_html(text))
    }

    /// Writes markup into the current scope without escaping.
    pub fn raw(&mut self, markup: impl AsRef<str>) -> Result<(), RenderError> {
        self.output.add_markup(markup.as_ref())
    }

    /// Makes the element last emitted into the current scope the new current
    /// scope.
    ///
    /// Must be paired with [`pop_scope`](Self::pop_scope).
    pub fn push_scope(&mut self) -> Result<(), RenderError> {
        self.output.push()
    }

    /// Closes the current scope and returns to its parent.
    pub fn pop_scope(&mut self) -> Result<(), RenderError> {
        self.output.pop()
    }

    /// Writes out anything the current scope is holding back.
    pub fn flush(&mut self) -> Result<(), RenderError> {
        self.output.flush()
    }

    /// Renders the next source on this template's stack.
    ///
    /// Layouts call this where their content belongs. With nothing left on the
    /// stack it does nothing.
    pub fn yield_content(&mut self) -> Result<(), RenderError> {
        match self.sources.pop() {
            Some(source) => source.evaluate(self),
            None => {
                trace!("nothing left to yield");
                Ok(())
            }
        }
    }

    /// Renders a partial into the current scope.
    ///
    /// A [`Source`] is rendered by a new template that shares this output but
    /// sees only `data`. Anything else is inserted verbatim and `data` is
    /// unused.
    pub fn partial(&mut self, partial: impl Into<Partial>, data: Data) -> Result<(), RenderError> {
        match partial.into() {
            Partial::Source(source) => {
                debug!(
                    "rendering partial {}",
                    source.name().unwrap_or("<inline>")
                );
                let depth = self.output.depth();
                let result =
                    Template::new(&mut *self.output, data, source).and_then(Template::render);
                if result.is_err() {
                    self.output.unwind(depth);
                }
                result
            }
            Partial::Markup(markup) => self.output.add_markup(&markup),
        }
    }

    /// Merges attributes into the current scope's element.
    ///
    /// Only takes effect before the element's start tag has been written, which
    /// happens as soon as it receives content. Later calls are ignored and
    /// return `false`.
    pub fn attrs(&mut self, attrs: impl Into<Attributes>) -> bool {
        self.output.attrs(attrs.into())
    }

    /// This template's data bindings.
    pub fn data(&self) -> &Data {
        &self.data
    }

    /// Looks up a data binding.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UndefinedData`] if `key` is not bound.
    pub fn get(&self, key: &str) -> Result<&Value, RenderError> {
        self.data.get(key).ok_or_else(|| RenderError::UndefinedData {
            key: key.to_string(),
        })
    }

    /// Looks up a data binding and deserializes it.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, RenderError> {
        let value = self.get(key)?;
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Number of open scopes in the shared output.
    pub fn depth(&self) -> usize {
        self.output.depth()
    }
}

impl fmt::Debug for Template<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("data", &self.data)
            .field("sources", &self.sources)
            .field("depth", &self.output.depth())
            .finish_non_exhaustive()
    }
}

/// Collects the parts of a [`Template`] one at a time.
///
/// ```rust
/// use tagsmith::{Data, Output, RenderError, Source, Template};
///
/// let missing = Template::builder().source(Source::empty()).build();
/// assert!(matches!(missing, Err(RenderError::MissingOutput)));
///
/// let mut html = String::new();
/// let mut output = Output::new(&mut html);
/// Template::builder()
///     .output(&mut output)
///     .data(Data::new().with("name", "world"))
///     .source(Source::inline(|t| {
///         let name = t.get_as::<String>("name")?;
///         t.text(format!("hello {}", name))
///     }))
///     .render()
///     .unwrap();
/// assert_eq!(html, "hello world");
/// ```
pub struct TemplateBuilder<'o, 'w> {
    output: Option<&'o mut Output<'w>>,
    data: Data,
    source: Option<Source>,
}

impl Default for TemplateBuilder<'_, '_> {
    fn default() -> Self {
        Self {
            output: None,
            data: Data::new(),
            source: None,
        }
    }
}

impl<'o, 'w> TemplateBuilder<'o, 'w> {
    pub fn output(mut self, output: &'o mut Output<'w>) -> Self {
        self.output = Some(output);
        self
    }

    pub fn data(mut self, data: Data) -> Self {
        self.data = data;
        self
    }

    /// Sets the entry source. Defaults to [`Source::empty`].
    pub fn source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    /// Binds the collected parts.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingOutput`] if no output was given, or
    /// [`RenderError::DataConflict`] as [`Template::new`] does.
    pub fn build(self) -> Result<Template<'o, 'w>, RenderError> {
        let output = self.output.ok_or(RenderError::MissingOutput)?;
        Template::new(output, self.data, self.source.unwrap_or_default())
    }

    /// Builds and renders in one step.
    pub fn render(self) -> Result<(), RenderError> {
        self.build()?.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn render(source: Source, data: Data) -> Result<String, RenderError> {
        let mut buf = String::new();
        {
            let mut output = Output::new(&mut buf);
            Template::new(&mut output, data, source)?.render()?;
        }
        Ok(buf)
    }

    #[test]
    fn test_single_element() {
        let out = render(
            Source::inline(|t| t.element("div", |t| t.text("hi"))),
            Data::new(),
        )
        .unwrap();
        assert_eq!(out, "<div>hi</div>");
    }

    #[test]
    fn test_emitted_element_is_flushed_at_end() {
        let out = render(
            Source::inline(|t| t.emit(Element::new("p").text("last"))),
            Data::new(),
        )
        .unwrap();
        assert_eq!(out, "<p>last</p>");
    }

    #[test]
    fn test_empty_source_renders_nothing() {
        assert_eq!(render(Source::empty(), Data::new()).unwrap(), "");
    }

    #[test]
    fn test_text_is_escaped_raw_is_not() {
        let out = render(
            Source::inline(|t| {
                t.text("<i>")?;
                t.raw("<i>")
            }),
            Data::new(),
        )
        .unwrap();
        assert_eq!(out, "&lt;i&gt;<i>");
    }

    #[test]
    fn test_manual_push_and_pop() {
        let out = render(
            Source::inline(|t| {
                t.emit("ul")?;
                t.push_scope()?;
                t.emit(Element::new("li").text("a"))?;
                t.pop_scope()
            }),
            Data::new(),
        )
        .unwrap();
        assert_eq!(out, "<ul><li>a</li></ul>");
    }

    #[test]
    fn test_push_scope_without_element_fails() {
        let err = render(Source::inline(|t| t.push_scope()), Data::new()).unwrap_err();
        assert!(matches!(err, RenderError::NothingToPush));
    }

    #[test]
    fn test_pop_scope_at_root_fails() {
        let err = render(Source::inline(|t| t.pop_scope()), Data::new()).unwrap_err();
        assert!(matches!(err, RenderError::ScopeUnderflow));
    }

    #[test]
    fn test_unclosed_scope_start_tag_is_flushed() {
        let out = render(
            Source::inline(|t| {
                t.emit(Element::new("section").id("s"))?;
                t.push_scope()
            }),
            Data::new(),
        )
        .unwrap();
        assert_eq!(out, r#"<section id="s">"#);
    }

    #[test]
    fn test_attrs_before_content_apply() {
        let out = render(
            Source::inline(|t| {
                t.element("div", |t| {
                    assert!(t.attrs([("class", "box")]));
                    t.text("x")
                })
            }),
            Data::new(),
        )
        .unwrap();
        assert_eq!(out, r#"<div class="box">x</div>"#);
    }

    #[test]
    fn test_attrs_after_content_are_ignored() {
        let with_late_attrs = render(
            Source::inline(|t| {
                t.element("div", |t| {
                    t.text("x")?;
                    assert!(!t.attrs([("class", "late")]));
                    Ok(())
                })
            }),
            Data::new(),
        )
        .unwrap();
        let without = render(
            Source::inline(|t| t.element("div", |t| t.text("x"))),
            Data::new(),
        )
        .unwrap();
        assert_eq!(with_late_attrs, without);
    }

    #[test]
    fn test_data_accessors() {
        #[derive(Deserialize, PartialEq, Debug)]
        struct User {
            name: String,
        }

        let data = Data::new()
            .with("user", serde_json::json!({"name": "Ada"}))
            .with("count", 2);
        let out = render(
            Source::inline(|t| {
                let user: User = t.get_as("user")?;
                let count: u32 = t.get_as("count")?;
                assert_eq!(t.data().len(), 2);
                t.text(format!("{} x{}", user.name, count))
            }),
            data,
        )
        .unwrap();
        assert_eq!(out, "Ada x2");
    }

    #[test]
    fn test_undefined_data_is_an_error() {
        let err = render(
            Source::inline(|t| t.get("missing").map(|_| ())),
            Data::new(),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::UndefinedData { key } if key == "missing"));
    }

    #[test]
    fn test_every_reserved_name_conflicts() {
        for name in RESERVED_NAMES {
            let mut buf = String::new();
            let mut output = Output::new(&mut buf);
            let result = Template::new(&mut output, Data::new().with(*name, 1), Source::empty());
            assert!(
                matches!(result, Err(RenderError::DataConflict { ref keys }) if keys == &[name.to_string()]),
                "{} should be reserved",
                name
            );
        }
    }

    #[test]
    fn test_conflict_fails_before_rendering() {
        let mut buf = String::new();
        {
            let mut output = Output::new(&mut buf);
            let result = Template::new(
                &mut output,
                Data::new().with("render", true),
                Source::inline(|t| t.text("never")),
            );
            assert!(result.is_err());
            assert!(output.is_empty());
        }
        assert_eq!(buf, "");
    }

    #[test]
    fn test_builder_requires_output() {
        let result = Template::builder().data(Data::new()).build();
        assert!(matches!(result, Err(RenderError::MissingOutput)));
    }

    #[test]
    fn test_file_source_errors_carry_name() {
        let err = render(
            Source::file("pages/broken", |_| Err(RenderError::body("bad markup"))),
            Data::new(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "pages/broken:1: bad markup");
    }

    #[test]
    fn test_inline_source_errors_are_unwrapped() {
        let err = render(
            Source::inline(|_| Err(RenderError::body("bad markup"))),
            Data::new(),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::Body(_)));
    }

    #[test]
    fn test_yield_with_nothing_left_is_noop() {
        let out = render(
            Source::inline(|t| {
                t.yield_content()?;
                t.yield_content()?;
                t.text("done")
            }),
            Data::new(),
        )
        .unwrap();
        assert_eq!(out, "done");
    }

    #[test]
    fn test_recovered_body_error_closes_its_scope() {
        let out = render(
            Source::inline(|t| {
                t.element("outer", |t| {
                    let inner = t.element("inner", |_| Err(RenderError::body("x")));
                    assert!(matches!(inner, Err(RenderError::Body(_))));
                    assert_eq!(t.depth(), 2);
                    t.text("after")
                })
            }),
            Data::new(),
        )
        .unwrap();
        assert_eq!(out, "<outer><inner></inner>after</outer>");
    }

    #[test]
    fn test_failed_body_closes_manually_pushed_scopes() {
        let out = render(
            Source::inline(|t| {
                let result = t.element("div", |t| {
                    t.emit("ul")?;
                    t.push_scope()?;
                    t.emit("li")?;
                    t.push_scope()?;
                    Err(RenderError::body("x"))
                });
                assert!(result.is_err());
                assert_eq!(t.depth(), 1);
                t.emit(Element::closed("hr"))
            }),
            Data::new(),
        )
        .unwrap();
        assert_eq!(out, "<div><ul><li></li></ul></div><hr />");
    }

    #[test]
    fn test_recovered_partial_error_closes_its_scopes() {
        let broken = Source::file("broken", |t| {
            t.emit("p")?;
            t.push_scope()?;
            Err(RenderError::body("x"))
        });
        let out = render(
            Source::inline(move |t| {
                t.element("div", |t| {
                    let err = t.partial(&broken, Data::new()).unwrap_err();
                    assert_eq!(err.to_string(), "broken:1: x");
                    assert_eq!(t.depth(), 2);
                    t.text("after")
                })
            }),
            Data::new(),
        )
        .unwrap();
        assert_eq!(out, "<div><p></p>after</div>");
    }

    #[test]
    fn test_element_rejects_closed_element() {
        let err = render(
            Source::inline(|t| t.element(Element::closed("br"), |t| t.text("x"))),
            Data::new(),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::ClosedElement { ref name } if name == "br"));
    }

    #[test]
    fn test_unserializable_data_fails_before_rendering() {
        use std::collections::HashMap;

        let bad: HashMap<Vec<u8>, i32> = HashMap::from([(vec![1], 1)]);
        let mut buf = String::new();
        {
            let mut output = Output::new(&mut buf);
            let result = Template::new(
                &mut output,
                Data::new().with("m", bad),
                Source::inline(|t| t.text("never")),
            );
            assert!(matches!(result, Err(RenderError::Serialization(_))));
        }
        assert_eq!(buf, "");
    }

    #[test]
    fn test_depth_tracks_nesting() {
        render(
            Source::inline(|t| {
                assert_eq!(t.depth(), 1);
                t.element("a", |t| {
                    assert_eq!(t.depth(), 2);
                    Ok(())
                })?;
                assert_eq!(t.depth(), 1);
                Ok(())
            }),
            Data::new(),
        )
        .unwrap();
    }
}
