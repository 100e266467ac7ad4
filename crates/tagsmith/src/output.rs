//! The output scope stack.
//!
//! [`Output`] wraps a sink (anything implementing [`std::fmt::Write`]) and a stack
//! of open scopes. The top of the stack is the *current* scope: whatever is
//! emitted next becomes its child. Nested closures push and pop scopes, so the
//! markup tree is streamed straight to the sink without ever being built in
//! memory.
//!
//! # Buffering
//!
//! Each scope holds back two things until something forces them out:
//!
//! - its own start tag, so attributes can still be changed through
//!   [`Template::attrs`](crate::Template::attrs);
//! - the last element emitted into it without a body, so it can still be
//!   entered with [`Template::push_scope`](crate::Template::push_scope).
//!
//! Adding another child, pushing, popping, or flushing writes both out. Once a
//! scope's start tag is written its attributes are frozen.
//!
//! # Sharing
//!
//! A template and every partial it renders borrow the same `Output`, so nested
//! content lands inside whatever scope is current in the parent.

use std::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::element::{Attributes, Element, ElementKind};
use crate::error::RenderError;
use crate::node::Node;

/// Formatting options for an [`Output`].
///
/// The default is compact output: nodes are written back to back with no
/// whitespace. Setting [`indent`](Self::indent) switches to one node per line.
///
/// Options deserialize from configuration with every field optional:
///
/// ```rust
/// use tagsmith::OutputOptions;
///
/// let options: OutputOptions = serde_json::from_str(r#"{"indent": 2}"#).unwrap();
/// assert_eq!(options, OutputOptions::new().pretty(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Spaces per nesting level. `None` writes compact output.
    pub indent: Option<usize>,
    /// Nesting level of the outermost nodes, for output embedded in a
    /// larger document.
    pub level: usize,
    /// Line terminator used when pretty-printing.
    pub newline: String,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            indent: None,
            level: 0,
            newline: "\n".to_string(),
        }
    }
}

impl OutputOptions {
    /// Creates compact-output options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one node per line, indented `width` spaces per level.
    pub fn pretty(mut self, width: usize) -> Self {
        self.indent = Some(width);
        self
    }

    /// Sets the starting nesting level.
    pub fn level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    /// Sets the line terminator.
    pub fn newline(mut self, newline: impl Into<String>) -> Self {
        self.newline = newline.into();
        self
    }
}

/// One open scope.
#[derive(Debug)]
struct Scope {
    node: Node,
    /// Whether the start tag and inline content have been written.
    flushed: bool,
    /// Last body-less element added to this scope, not yet written.
    cached: Option<Element>,
}

impl Scope {
    fn new(node: Node) -> Self {
        // Nothing to write for anything but an element.
        let flushed = !matches!(node, Node::Element(_));
        Self {
            node,
            flushed,
            cached: None,
        }
    }
}

/// A sink plus its stack of open scopes.
///
/// ```rust
/// use tagsmith::{Node, Output};
///
/// let mut buf = String::new();
/// let mut output = Output::new(&mut buf);
/// assert!(output.is_empty());
///
/// assert!(output.seed(Node::Root));
/// assert!(!output.seed(Node::Root));
/// assert_eq!(output.current(), Some(&Node::Root));
/// ```
pub struct Output<'w> {
    sink: &'w mut dyn fmt::Write,
    options: OutputOptions,
    scopes: Vec<Scope>,
}

impl<'w> Output<'w> {
    /// Creates an output with compact formatting.
    pub fn new(sink: &'w mut dyn fmt::Write) -> Self {
        Self::with_options(sink, OutputOptions::default())
    }

    pub fn with_options(sink: &'w mut dyn fmt::Write, options: OutputOptions) -> Self {
        Self {
            sink,
            options,
            scopes: Vec::new(),
        }
    }

    pub fn options(&self) -> &OutputOptions {
        &self.options
    }

    /// Whether no scope has been opened yet.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Number of open scopes, including the root.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// The innermost open scope.
    pub fn current(&self) -> Option<&Node> {
        self.scopes.last().map(|scope| &scope.node)
    }

    /// Pushes `node` as the bottom scope if nothing is open yet.
    ///
    /// Returns whether the node was pushed.
    pub fn seed(&mut self, node: Node) -> bool {
        if !self.scopes.is_empty() {
            return false;
        }
        self.scopes.push(Scope::new(node));
        true
    }

    /// Adds an element to the current scope.
    ///
    /// The element is held back until the next write so it can still be
    /// pushed as a scope.
    pub(crate) fn add_element(&mut self, element: Element) -> Result<(), RenderError> {
        let top = self.top_index();
        self.flush_scope(top)?;
        self.scopes[top].cached = Some(element);
        Ok(())
    }

    /// Writes already-serialized markup as a child of the current scope.
    pub(crate) fn add_markup(&mut self, markup: &str) -> Result<(), RenderError> {
        let top = self.top_index();
        self.flush_scope(top)?;
        self.write_line(top, markup)?;
        Ok(())
    }

    /// Makes the element last added to the current scope the new current scope.
    ///
    /// A closed element cannot be entered; it stays held back as a sibling.
    pub(crate) fn push(&mut self) -> Result<(), RenderError> {
        let top = self.top_index();
        let element = match self.scopes[top].cached.take() {
            Some(element) if element.kind() == ElementKind::Closed => {
                let name = element.name().to_string();
                self.scopes[top].cached = Some(element);
                return Err(RenderError::ClosedElement { name });
            }
            Some(element) => element,
            None => return Err(RenderError::NothingToPush),
        };
        self.flush_scope(top)?;
        trace!("push <{}> at depth {}", element.name(), self.scopes.len());
        self.scopes.push(Scope::new(Node::Element(element)));
        Ok(())
    }

    /// Flushes and closes the current scope, restoring its parent.
    pub(crate) fn pop(&mut self) -> Result<(), RenderError> {
        if self.scopes.len() < 2 {
            return Err(RenderError::ScopeUnderflow);
        }
        let top = self.scopes.len() - 1;
        self.flush_scope(top)?;
        let Some(scope) = self.scopes.pop() else {
            return Err(RenderError::ScopeUnderflow);
        };
        if let Some(end) = scope.node.end_tag() {
            self.write_line(top - 1, &end)?;
        }
        trace!("pop to depth {}", self.scopes.len());
        Ok(())
    }

    /// Pops scopes until at most `depth` remain, closing each one.
    ///
    /// The root scope is never removed. If the sink fails while closing, the
    /// remaining scopes are dropped without their end tags.
    pub(crate) fn unwind(&mut self, depth: usize) {
        let keep = depth.max(1);
        while self.scopes.len() > keep {
            if let Err(err) = self.pop() {
                debug!(
                    "dropping {} unclosed scope(s): {}",
                    self.scopes.len() - keep,
                    err
                );
                self.scopes.truncate(keep);
            }
        }
    }

    /// Writes the current scope's start tag and held-back child, if any.
    pub(crate) fn flush(&mut self) -> Result<(), RenderError> {
        match self.scopes.len() {
            0 => Ok(()),
            len => self.flush_scope(len - 1),
        }
    }

    /// Merges attributes into the current scope's element.
    ///
    /// Returns `false`, leaving everything untouched, when the current scope is
    /// not an element or its start tag has already been written.
    pub(crate) fn attrs(&mut self, attrs: Attributes) -> bool {
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        if scope.flushed {
            debug!("ignoring attrs on a scope whose start tag was already written");
            return false;
        }
        match scope.node.as_element_mut() {
            Some(element) => {
                element.merge_attrs(attrs);
                true
            }
            None => false,
        }
    }

    fn top_index(&mut self) -> usize {
        if self.scopes.is_empty() {
            self.scopes.push(Scope::new(Node::Root));
        }
        self.scopes.len() - 1
    }

    fn flush_scope(&mut self, index: usize) -> Result<(), RenderError> {
        if !self.scopes[index].flushed {
            self.scopes[index].flushed = true;
            let start = self.scopes[index].node.as_element().map(|element| {
                let mut line = element.start_tag();
                line.push_str(element.content().unwrap_or_default());
                line
            });
            if let Some(line) = start {
                self.write_line(index.saturating_sub(1), &line)?;
            }
        }
        if let Some(cached) = self.scopes[index].cached.take() {
            self.write_line(index, &Node::Element(cached).to_string())?;
        }
        Ok(())
    }

    /// Writes one node's markup at the given nesting level.
    fn write_line(&mut self, level: usize, markup: &str) -> fmt::Result {
        match self.options.indent {
            Some(width) => {
                let pad = width * (self.options.level + level);
                write!(
                    self.sink,
                    "{:pad$}{}{}",
                    "",
                    markup,
                    self.options.newline,
                    pad = pad
                )
            }
            None => self.sink.write_str(markup),
        }
    }
}

impl fmt::Debug for Output<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("options", &self.options)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}
