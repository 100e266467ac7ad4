//! Serializable markup nodes.
//!
//! Every node projects to three optional parts: a start tag, content, and an
//! end tag. A node's string form is those parts concatenated in order, with
//! missing parts skipped entirely. Two nodes are equal when their projections
//! are equal, whatever variant produced them.

use std::borrow::Cow;
use std::fmt;

use crate::element::Element;

/// Anything that can be written as markup.
#[derive(Debug, Clone)]
pub enum Node {
    /// The bottom scope of an output. Has no tags and no content.
    Root,
    /// Already-serialized text, written verbatim.
    Text(String),
    /// An element with its tags, attributes and inline content.
    Element(Element),
}

impl Node {
    pub fn content(&self) -> Option<Cow<'_, str>> {
        match self {
            Node::Root => None,
            Node::Text(text) => Some(Cow::Borrowed(text)),
            Node::Element(element) => element.content().map(Cow::Borrowed),
        }
    }

    pub fn start_tag(&self) -> Option<String> {
        match self {
            Node::Root | Node::Text(_) => None,
            Node::Element(element) => Some(element.start_tag()),
        }
    }

    pub fn end_tag(&self) -> Option<String> {
        match self {
            Node::Root | Node::Text(_) => None,
            Node::Element(element) => element.end_tag(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.content() == other.content()
            && self.start_tag() == other.start_tag()
            && self.end_tag() == other.end_tag()
    }
}

impl Eq for Node {}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start_tag() {
            f.write_str(&start)?;
        }
        if let Some(content) = self.content() {
            f.write_str(&content)?;
        }
        if let Some(end) = self.end_tag() {
            f.write_str(&end)?;
        }
        Ok(())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_node_renders_content_only() {
        assert_eq!(Node::Text("x".into()).to_string(), "x");
    }

    #[test]
    fn test_root_node_renders_nothing() {
        let root = Node::Root;
        assert_eq!(root.to_string(), "");
        assert_eq!(root.start_tag(), None);
        assert_eq!(root.end_tag(), None);
        assert_eq!(root.content(), None);
    }

    #[test]
    fn test_element_node_renders_all_parts() {
        let node = Node::from(Element::new("div").text("hi"));
        assert_eq!(node.to_string(), "<div>hi</div>");
    }

    #[test]
    fn test_closed_element_node_compacts_missing_parts() {
        let node = Node::from(Element::closed("hr"));
        assert_eq!(node.to_string(), "<hr />");
    }

    #[test]
    fn test_equality_is_structural() {
        let a = Node::from(Element::new("p").attr("class", "x").text("hi"));
        let b = Node::from(Element::new("p").attr("class", "x").text("hi"));
        assert_eq!(a, b);
        assert_ne!(a, Node::from(Element::new("p").text("hi")));
    }

    #[test]
    fn test_empty_text_differs_from_root() {
        assert_ne!(Node::Text(String::new()), Node::Root);
        assert_eq!(Node::Root, Node::Root);
    }
}
