//! Templates: binding data and sources to an output.
//!
//! A [`Template`] runs one rendering pass. Source bodies receive it as
//! `&mut Template` and describe markup by calling its operations:
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`element`](Template::element) | Emit an element and render a body inside it |
//! | [`emit`](Template::emit) | Emit an element without a body |
//! | [`text`](Template::text) / [`raw`](Template::raw) | Write escaped / verbatim text |
//! | [`yield_content`](Template::yield_content) | Render the next source (layouts) |
//! | [`partial`](Template::partial) | Render a nested source, or splice markup |
//! | [`attrs`](Template::attrs) | Change the current element's attributes |
//! | [`push_scope`](Template::push_scope) / [`pop_scope`](Template::pop_scope) | Enter / leave the last emitted element |
//! | [`flush`](Template::flush) | Write out anything held back |
//!
//! ## Layouts
//!
//! A layout is a source that calls [`yield_content`](Template::yield_content)
//! where the page belongs. Attach it with [`Source::with_layout`](crate::Source::with_layout).
//!
//! ## Partials
//!
//! [`partial`](Template::partial) with a [`Source`](crate::Source) renders it in
//! a fresh template that writes into the same output (so its markup lands in
//! the current element) but sees only the data passed to it. With a string it
//! inserts the string as is.
//!
//! ## Key Types
//!
//! - [`Template`]: one rendering pass
//! - [`TemplateBuilder`]: step-by-step construction
//! - [`Partial`]: source or literal markup
//! - [`render_to_string`], [`render_with_options`], [`render_into`]: one-call helpers

mod functions;
mod instance;
mod partial;

pub use functions::{render_into, render_to_string, render_with_options};
pub use instance::{Template, TemplateBuilder, RESERVED_NAMES};
pub use partial::Partial;
