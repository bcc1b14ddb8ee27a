//! Observed child list
//!
//! `ChildList` owns the children of a select control and records every
//! structural, attribute and text mutation anywhere in the subtree. Records
//! accumulate until the host calls [`ChildList::flush`], which hands the whole
//! batch to a [`ChildObserver`] at once. Hosts flush once per event-loop tick,
//! so a burst of mutations costs one notification.
//!
//! Nodes are addressed by index paths from the root list: `[2]` is the third
//! top-level child, `[2, 0]` that child's first child.

use super::node::Node;

/// What kind of change a mutation record describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// A child was inserted into or removed from the node at `target`
    ChildList,
    /// An attribute changed on the element at `target`
    Attribute { name: String },
    /// The text of the text node at `target` changed
    CharacterData,
}

/// A single recorded mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub kind: MutationKind,
    /// Path of the node the mutation happened on (empty = the root list)
    pub target: Vec<usize>,
}

/// Receives batches of mutations together with the current children
pub trait ChildObserver {
    fn children_changed(&mut self, children: &[Node], records: &[MutationRecord]);
}

/// Errors from addressing a node by path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// No node exists at the path
    NoSuchNode(Vec<usize>),
    /// The path points at a node of the wrong kind (text vs element)
    WrongNodeKind(Vec<usize>),
}

impl std::fmt::Display for MutationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationError::NoSuchNode(path) => write!(f, "no node at path {path:?}"),
            MutationError::WrongNodeKind(path) => {
                write!(f, "node at path {path:?} has the wrong kind")
            }
        }
    }
}

impl std::error::Error for MutationError {}

/// Children of a select control plus the pending mutation records
#[derive(Debug, Clone, Default)]
pub struct ChildList {
    nodes: Vec<Node>,
    pending: Vec<MutationRecord>,
}

impl ChildList {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            pending: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Whether mutations are waiting to be flushed
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Append a node to the children of `parent` (empty path = root list)
    pub fn append_child(&mut self, parent: &[usize], node: Node) -> Result<(), MutationError> {
        let list = self.child_vec_mut(parent)?;
        list.push(node);
        self.record(MutationKind::ChildList, parent);
        Ok(())
    }

    /// Insert a node at `index` among the children of `parent`
    ///
    /// `index` is clamped to the end of the list.
    pub fn insert_child(
        &mut self,
        parent: &[usize],
        index: usize,
        node: Node,
    ) -> Result<(), MutationError> {
        let list = self.child_vec_mut(parent)?;
        let index = index.min(list.len());
        list.insert(index, node);
        self.record(MutationKind::ChildList, parent);
        Ok(())
    }

    /// Remove and return the node at `path`
    pub fn remove(&mut self, path: &[usize]) -> Result<Node, MutationError> {
        let (last, parent) = path
            .split_last()
            .ok_or_else(|| MutationError::NoSuchNode(path.to_vec()))?;
        let list = self.child_vec_mut(parent)?;
        if *last >= list.len() {
            return Err(MutationError::NoSuchNode(path.to_vec()));
        }
        let removed = list.remove(*last);
        self.record(MutationKind::ChildList, parent);
        Ok(removed)
    }

    /// Remove every child
    pub fn clear(&mut self) {
        if !self.nodes.is_empty() {
            self.nodes.clear();
            self.record(MutationKind::ChildList, &[]);
        }
    }

    /// Set an attribute on the element at `path`
    pub fn set_attribute(
        &mut self,
        path: &[usize],
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), MutationError> {
        let el = self
            .node_mut(path)?
            .as_element_mut()
            .ok_or_else(|| MutationError::WrongNodeKind(path.to_vec()))?;
        el.attributes.insert(name.to_string(), value.into());
        self.record(
            MutationKind::Attribute {
                name: name.to_string(),
            },
            path,
        );
        Ok(())
    }

    /// Remove an attribute from the element at `path`
    pub fn remove_attribute(&mut self, path: &[usize], name: &str) -> Result<(), MutationError> {
        let el = self
            .node_mut(path)?
            .as_element_mut()
            .ok_or_else(|| MutationError::WrongNodeKind(path.to_vec()))?;
        if el.attributes.remove(name).is_some() {
            self.record(
                MutationKind::Attribute {
                    name: name.to_string(),
                },
                path,
            );
        }
        Ok(())
    }

    /// Replace the text of the text node at `path`
    pub fn set_text(&mut self, path: &[usize], text: impl Into<String>) -> Result<(), MutationError> {
        match self.node_mut(path)? {
            Node::Text { text: existing } => *existing = text.into(),
            Node::Element(_) => return Err(MutationError::WrongNodeKind(path.to_vec())),
        }
        self.record(MutationKind::CharacterData, path);
        Ok(())
    }

    /// Deliver pending records to `observer` as one batch
    ///
    /// Returns the number of records delivered. Nothing is delivered when no
    /// mutation happened since the last flush.
    pub fn flush(&mut self, observer: &mut dyn ChildObserver) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        let records = std::mem::take(&mut self.pending);
        observer.children_changed(&self.nodes, &records);
        records.len()
    }

    /// Drop pending records without delivering them
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.pending)
    }

    fn record(&mut self, kind: MutationKind, target: &[usize]) {
        self.pending.push(MutationRecord {
            kind,
            target: target.to_vec(),
        });
    }

    fn node_mut(&mut self, path: &[usize]) -> Result<&mut Node, MutationError> {
        let (first, rest) = path
            .split_first()
            .ok_or_else(|| MutationError::NoSuchNode(path.to_vec()))?;
        let mut node = self
            .nodes
            .get_mut(*first)
            .ok_or_else(|| MutationError::NoSuchNode(path.to_vec()))?;
        for index in rest {
            node = match node {
                Node::Element(el) => el
                    .children
                    .get_mut(*index)
                    .ok_or_else(|| MutationError::NoSuchNode(path.to_vec()))?,
                Node::Text { .. } => return Err(MutationError::NoSuchNode(path.to_vec())),
            };
        }
        Ok(node)
    }

    fn child_vec_mut(&mut self, parent: &[usize]) -> Result<&mut Vec<Node>, MutationError> {
        if parent.is_empty() {
            return Ok(&mut self.nodes);
        }
        match self.node_mut(parent)? {
            Node::Element(el) => Ok(&mut el.children),
            Node::Text { .. } => Err(MutationError::WrongNodeKind(parent.to_vec())),
        }
    }
}
