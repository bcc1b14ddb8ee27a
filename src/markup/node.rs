//! Child markup tree
//!
//! A host hands the select control its children as a small element/text tree,
//! the same shape an HTML fragment such as
//!
//! ```text
//! <select-plus-option value="1">Apple</select-plus-option>
//! <select-plus-option value="2">Banana</select-plus-option>
//! ```
//!
//! would parse into. Nodes serialize to JSON so a configuration file can carry
//! them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag name of the elements that declare options.
pub const OPTION_TAG: &str = "select-plus-option";

/// A node in the child markup tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Element(Element),
    Text { text: String },
}

impl Node {
    /// Create a text node
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    /// Shorthand for a `select-plus-option` element with a single text child
    pub fn option(value: impl Into<String>, label: impl Into<String>) -> Self {
        Node::Element(
            Element::new(OPTION_TAG)
                .with_attribute("value", value)
                .with_child(Node::text(label)),
        )
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text { .. } => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text { .. } => None,
        }
    }

    /// Children of this node (text nodes have none)
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(el) => &el.children,
            Node::Text { .. } => &[],
        }
    }

    /// Concatenated text of this node and all its descendants, in document order
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text { text } => out.push_str(text),
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// An element with a tag name, attributes and children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Tag comparison is ASCII case-insensitive, as in HTML
    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }
}
