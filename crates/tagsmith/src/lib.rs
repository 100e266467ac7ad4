//! # tagsmith - Markup From Code
//!
//! `tagsmith` generates HTML/XML by running ordinary Rust closures instead of
//! parsing template text. Closures describe an element tree through a
//! [`Template`] handle; the tree is streamed to any [`std::fmt::Write`] sink as
//! it is described, without being built in memory.
//!
//! ## Core Concepts
//!
//! - [`Node`]: anything that serializes to markup (root, text, element)
//! - [`Element`]: a tag name with attributes and optional inline content
//! - [`Output`]: a sink plus the stack of currently open scopes
//! - [`Source`]: a body of rendering code, file-named or inline, with an
//!   optional layout
//! - [`Template`]: one rendering pass binding [`Data`] and sources to an output
//! - [`escape_html`]: the escaping used for text content
//!
//! ## Quick Start
//!
//! ```rust
//! use tagsmith::{render_to_string, Data, Element, Source};
//!
//! let page = Source::inline(|t| {
//!     let items: Vec<String> = t.get_as("items")?;
//!     t.element(Element::new("ul").class("list"), |t| {
//!         for item in &items {
//!             t.element("li", |t| t.text(item))?;
//!         }
//!         Ok(())
//!     })
//! });
//!
//! let html = render_to_string(page, Data::new().with("items", ["a", "b"])).unwrap();
//! assert_eq!(html, r#"<ul class="list"><li>a</li><li>b</li></ul>"#);
//! ```
//!
//! ## Layouts and Partials
//!
//! ```rust
//! use tagsmith::{render_to_string, Data, Source};
//!
//! let layout = Source::file("layout", |t| {
//!     t.element("html", |t| t.element("body", |t| t.yield_content()))
//! });
//! let greeting = Source::file("greeting", |t| {
//!     let name = t.get_as::<String>("name")?;
//!     t.element("p", |t| t.text(format!("Hi {}", name)))
//! });
//! let page = Source::inline(move |t| {
//!     t.partial(&greeting, Data::new().with("name", "Ada"))?;
//!     t.partial("<hr />", Data::new())
//! })
//! .with_layout(layout);
//!
//! let html = render_to_string(page, Data::new()).unwrap();
//! assert_eq!(html, "<html><body><p>Hi Ada</p><hr /></body></html>");
//! ```

mod data;
mod element;
mod error;
mod escape;
mod node;
pub mod output;
pub mod source;
pub mod template;

// Error type
pub use error::RenderError;

// Markup model
pub use element::{AttrValue, Attributes, Element, ElementKind};
pub use escape::{escape_html, ESCAPE_HTML};
pub use node::Node;

// Output scope stack
pub use output::{Output, OutputOptions};

// Sources
pub use source::{Body, Origin, Source, SourceStack};

// Templates
pub use data::Data;
pub use template::{
    render_into, render_to_string, render_with_options, Partial, Template, TemplateBuilder,
    RESERVED_NAMES,
};
