//! Elements and their attributes.
//!
//! An [`Element`] is a tag name, an attribute set, and optional inline content.
//! Elements are plain values: they are built with the chaining methods below and
//! handed to a [`Template`](crate::Template), which takes care of writing them
//! out at the right time.
//!
//! # Tag rendering
//!
//! - Open elements render as `<name attrs>content</name>`.
//! - Closed elements render as `<name attrs />` and never carry content.
//! - Attributes are written in key order as ` key="value"`. List values are
//!   joined with single spaces; nested maps are flattened with an underscore
//!   (`data: {id: 1}` becomes `data_id="1"`).
//! - Double quotes in attribute values are written as `&quot;` so a value
//!   can never end its attribute early. Nothing else is escaped; use
//!   [`escape_html`](crate::escape_html) on untrusted values.
//!
//! ```rust
//! use tagsmith::Element;
//!
//! let link = Element::new("a").attr("href", "#top").class("nav").text("Top");
//! assert_eq!(link.start_tag(), r##"<a class="nav" href="#top">"##);
//! assert_eq!(link.end_tag().as_deref(), Some("</a>"));
//!
//! assert_eq!(Element::closed("br").start_tag(), "<br />");
//! ```

use std::collections::BTreeMap;

use crate::escape::escape_html;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Written verbatim.
    Text(String),
    /// Written space-separated, e.g. a class list.
    List(Vec<String>),
    /// Flattened into `parent_child` attributes.
    Nested(Attributes),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<&String> for AttrValue {
    fn from(value: &String) -> Self {
        AttrValue::Text(value.clone())
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<usize> for AttrValue {
    fn from(value: usize) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl<T: Into<String>> From<Vec<T>> for AttrValue {
    fn from(values: Vec<T>) -> Self {
        AttrValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<Attributes> for AttrValue {
    fn from(value: Attributes) -> Self {
        AttrValue::Nested(value)
    }
}

/// An ordered attribute map.
///
/// Keys are kept sorted so the same attributes always serialize the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: BTreeMap<String, AttrValue>,
}

impl Attributes {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets an attribute in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the value for `key`, if set.
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.get(key)
    }

    /// Merges `other` into this set. Keys present in both take `other`'s value.
    pub fn merge(&mut self, other: Attributes) {
        self.entries.extend(other.entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Serializes the attributes with a leading space before each pair.
    ///
    /// Returns an empty string for an empty set.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out, None);
        out
    }

    fn write_markup(&self, out: &mut String, namespace: Option<&str>) {
        for (key, value) in &self.entries {
            let key = match namespace {
                Some(ns) => format!("{}_{}", ns, key),
                None => key.clone(),
            };
            let text = match value {
                AttrValue::Text(text) => text.clone(),
                AttrValue::List(items) => items.join(" "),
                AttrValue::Nested(nested) => {
                    nested.write_markup(out, Some(&key));
                    continue;
                }
            };
            out.push_str(&format!(" {}=\"{}\"", key, text.replace('"', "&quot;")));
        }
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (key, value) in iter {
            attrs.insert(key, value);
        }
        attrs
    }
}

impl<K: Into<String>, V: Into<AttrValue>, const N: usize> From<[(K, V); N]> for Attributes {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Whether an element has a closing tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `<name>…</name>`
    Open,
    /// `<name />`
    Closed,
}

/// A markup element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    kind: ElementKind,
    attributes: Attributes,
    content: Option<String>,
}

impl Element {
    /// Creates an open element (`<name></name>`).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ElementKind::Open,
            attributes: Attributes::new(),
            content: None,
        }
    }

    /// Creates a closed element (`<name />`), such as `br` or `img`.
    pub fn closed(name: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Closed,
            ..Self::new(name)
        }
    }

    /// Sets an attribute.
    ///
    /// The value is written as given apart from `"`, which becomes `&quot;`.
    /// Escape untrusted values with [`escape_html`](crate::escape_html) first.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Merges a whole attribute set.
    pub fn with_attrs(mut self, attrs: impl Into<Attributes>) -> Self {
        self.attributes.merge(attrs.into());
        self
    }

    /// Appends a class to the element's class list.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        let classes = match self.attributes.entries.remove("class") {
            Some(AttrValue::List(mut list)) => {
                list.push(class);
                list
            }
            Some(AttrValue::Text(existing)) => vec![existing, class],
            Some(AttrValue::Nested(_)) | None => vec![class],
        };
        self.attributes.insert("class", classes);
        self
    }

    /// Sets the element id.
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id.into())
    }

    /// Appends text content, escaped.
    pub fn text(self, text: impl AsRef<str>) -> Self {
        self.raw(escape_html(text))
    }

    /// Appends pre-rendered markup as content, unescaped.
    pub fn raw(mut self, markup: impl AsRef<str>) -> Self {
        self.content
            .get_or_insert_with(String::new)
            .push_str(markup.as_ref());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Inline content. Closed elements never report content.
    pub fn content(&self) -> Option<&str> {
        match self.kind {
            ElementKind::Open => self.content.as_deref(),
            ElementKind::Closed => None,
        }
    }

    pub fn start_tag(&self) -> String {
        let attrs = self.attributes.to_markup();
        match self.kind {
            ElementKind::Open => format!("<{}{}>", self.name, attrs),
            ElementKind::Closed => format!("<{}{} />", self.name, attrs),
        }
    }

    pub fn end_tag(&self) -> Option<String> {
        match self.kind {
            ElementKind::Open => Some(format!("</{}>", self.name)),
            ElementKind::Closed => None,
        }
    }

    pub(crate) fn merge_attrs(&mut self, attrs: Attributes) {
        self.attributes.merge(attrs);
    }
}

impl From<&str> for Element {
    fn from(name: &str) -> Self {
        Element::new(name)
    }
}

impl From<String> for Element {
    fn from(name: String) -> Self {
        Element::new(name)
    }
}
