//! One-call rendering entry points.

use std::fmt;

use super::instance::Template;
use crate::data::Data;
use crate::error::RenderError;
use crate::output::{Output, OutputOptions};
use crate::source::Source;

/// Renders `source` with `data` to a compact string.
///
/// ```rust
/// use tagsmith::{render_to_string, Data, Element, Source};
///
/// let source = Source::inline(|t| t.emit(Element::new("div").text("hi")));
/// assert_eq!(render_to_string(source, Data::new()).unwrap(), "<div>hi</div>");
/// ```
pub fn render_to_string(source: Source, data: Data) -> Result<String, RenderError> {
    render_with_options(source, data, OutputOptions::default())
}

/// Renders `source` with `data` to a string formatted per `options`.
///
/// ```rust
/// use tagsmith::{render_with_options, Data, OutputOptions, Source};
///
/// let source = Source::inline(|t| t.element("ul", |t| t.element("li", |t| t.text("a"))));
/// let html = render_with_options(source, Data::new(), OutputOptions::new().pretty(2)).unwrap();
/// assert_eq!(html, "<ul>\n  <li>\n    a\n  </li>\n</ul>\n");
/// ```
pub fn render_with_options(
    source: Source,
    data: Data,
    options: OutputOptions,
) -> Result<String, RenderError> {
    let mut buf = String::new();
    {
        let mut output = Output::with_options(&mut buf, options);
        Template::new(&mut output, data, source)?.render()?;
    }
    Ok(buf)
}

/// Renders `source` with `data` into an existing sink.
pub fn render_into(
    sink: &mut dyn fmt::Write,
    source: Source,
    data: Data,
    options: OutputOptions,
) -> Result<(), RenderError> {
    let mut output = Output::with_options(sink, options);
    Template::new(&mut output, data, source)?.render()
}
