//! Option store
//!
//! Derives the ordered `(value, label)` list of a select control from its
//! child markup and keeps it current by observing the child list.

use super::children::{ChildObserver, MutationRecord};
use super::node::{Node, OPTION_TAG};

/// A selectable `(value, label)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Collect every option element in `children`, in document order
///
/// Option elements nested anywhere in the subtree count. A missing `value`
/// attribute reads as the empty string and the label is the element's full
/// text content. Duplicates are kept.
pub fn scan(children: &[Node]) -> Vec<SelectOption> {
    let mut options = Vec::new();
    for node in children {
        scan_node(node, &mut options);
    }
    options
}

fn scan_node(node: &Node, out: &mut Vec<SelectOption>) {
    let Some(el) = node.as_element() else {
        return;
    };
    if el.is(OPTION_TAG) {
        out.push(SelectOption {
            value: el.attribute("value").unwrap_or_default().to_string(),
            label: node.text_content(),
        });
    }
    for child in &el.children {
        scan_node(child, out);
    }
}

/// Snapshot of the options, refreshed on each observed mutation batch
#[derive(Debug, Clone, Default)]
pub struct OptionStore {
    options: Vec<SelectOption>,
    /// Number of rescans performed since creation
    generation: u64,
}

impl OptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an initial scan of `children`
    pub fn from_children(children: &[Node]) -> Self {
        let mut store = Self::new();
        store.rescan(children);
        store
    }

    /// Build a store directly from options (no markup involved)
    pub fn from_options(options: Vec<SelectOption>) -> Self {
        Self {
            options,
            generation: 1,
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SelectOption> {
        self.options.get(index)
    }

    /// Number of rescans so far (0 = never loaded)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// First option whose value equals `value` exactly
    pub fn find_by_value(&self, value: &str) -> Option<&SelectOption> {
        self.options.iter().find(|o| o.value == value)
    }

    /// Replace the snapshot with a fresh scan of `children`
    pub fn rescan(&mut self, children: &[Node]) {
        self.options = scan(children);
        self.generation += 1;
        tracing::trace!(
            "Rescanned select options: {} options (generation {})",
            self.options.len(),
            self.generation
        );
    }
}

impl ChildObserver for OptionStore {
    fn children_changed(&mut self, children: &[Node], records: &[MutationRecord]) {
        if records.is_empty() {
            return;
        }
        tracing::trace!("{} child mutations observed", records.len());
        self.rescan(children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::children::ChildList;
    use crate::markup::node::Element;

    fn fruit() -> Vec<Node> {
        vec![Node::option("1", "Apple"), Node::option("2", "Banana")]
    }

    #[test]
    fn test_scan_preserves_document_order() {
        let options = scan(&fruit());
        assert_eq!(
            options,
            vec![SelectOption::new("1", "Apple"), SelectOption::new("2", "Banana")]
        );
    }

    #[test]
    fn test_scan_finds_nested_options_and_skips_others() {
        let children = vec![
            Node::text("\n  "),
            Node::Element(
                Element::new("div")
                    .with_child(Node::option("a", "First"))
                    .with_child(Node::Element(Element::new("span").with_child(Node::text("x")))),
            ),
            Node::option("b", "Second"),
        ];
        let options = scan(&children);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].value, "a");
        assert_eq!(options[1].label, "Second");
    }

    #[test]
    fn test_scan_missing_value_attribute() {
        let children = vec![Node::Element(
            Element::new(OPTION_TAG).with_child(Node::text("No value")),
        )];
        assert_eq!(scan(&children), vec![SelectOption::new("", "No value")]);
    }

    #[test]
    fn test_scan_keeps_duplicates() {
        let children = vec![Node::option("1", "One"), Node::option("1", "Uno")];
        let store = OptionStore::from_children(&children);
        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_value("1").unwrap().label, "One");
    }

    #[test]
    fn test_one_rescan_per_batch() {
        let mut list = ChildList::new(fruit());
        let mut store = OptionStore::from_children(list.nodes());
        assert_eq!(store.generation(), 1);

        list.append_child(&[], Node::option("3", "Cherry")).unwrap();
        list.set_text(&[0, 0], "Green Apple").unwrap();
        list.remove(&[1]).unwrap();
        list.flush(&mut store);

        assert_eq!(store.generation(), 2);
        assert_eq!(
            store.options(),
            &[
                SelectOption::new("1", "Green Apple"),
                SelectOption::new("3", "Cherry")
            ]
        );

        // Nothing pending, nothing rescanned
        list.flush(&mut store);
        assert_eq!(store.generation(), 2);
    }

    #[test]
    fn test_attribute_change_is_observed() {
        let mut list = ChildList::new(fruit());
        let mut store = OptionStore::from_children(list.nodes());
        list.set_attribute(&[1], "value", "22").unwrap();
        list.flush(&mut store);
        assert_eq!(store.find_by_value("22").unwrap().label, "Banana");
        assert!(store.find_by_value("2").is_none());
    }
}
