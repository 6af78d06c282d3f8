//! Document access for the page components.
//!
//! Components never touch a document directly. They read through [`Dom`] and
//! describe their writes as [`Mutation`]s, which the host applies in order.

mod fragment;
mod memory;

pub use fragment::{el, Fragment, FragmentNode};
pub use memory::{MemoryDom, NodeId};

use std::fmt::Debug;

/// Something an element can be matched against when walking ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Tag(&'static str),
    Class(&'static str),
}

impl Marker {
    pub fn matches<D: Dom + ?Sized>(&self, dom: &D, node: &D::Node) -> bool {
        match self {
            Marker::Tag(tag) => dom.tag_name(node).eq_ignore_ascii_case(tag),
            Marker::Class(class) => dom.has_class(node, class),
        }
    }
}

/// A single write against the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<N> {
    SetStyle {
        node: N,
        property: &'static str,
        value: String,
    },
    /// Drops the inline override so the stylesheet value applies again.
    ClearStyle { node: N, property: &'static str },
    AddClass { node: N, class: &'static str },
    RemoveClass { node: N, class: &'static str },
    SetText { node: N, text: String },
    /// Swaps the element, markup and all, for the fragment.
    ReplaceWith { node: N, fragment: Fragment },
}

pub trait Dom {
    type Node: Clone + PartialEq + Debug;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Attached elements carrying `class`, in document order.
    fn elements_by_class(&self, class: &str) -> Vec<Self::Node>;

    fn tag_name(&self, node: &Self::Node) -> String;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Concatenated text of the node and all of its descendants.
    fn text_content(&self, node: &Self::Node) -> String;

    /// Current value of a form control.
    fn value(&self, node: &Self::Node) -> String;

    fn check_validity(&self, form: &Self::Node) -> bool;

    /// The raw `document.cookie` string.
    fn cookie(&self) -> String;

    fn apply(&mut self, mutation: Mutation<Self::Node>);

    fn apply_all(&mut self, mutations: Vec<Mutation<Self::Node>>) {
        for mutation in mutations {
            self.apply(mutation);
        }
    }

    /// `data-<key>` attribute.
    fn dataset(&self, node: &Self::Node, key: &str) -> Option<String> {
        self.attribute(node, &format!("data-{key}"))
    }

    /// Nearest inclusive ancestor matching `marker`.
    fn closest(&self, node: &Self::Node, marker: Marker) -> Option<Self::Node> {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if marker.matches(self, &candidate) {
                return Some(candidate);
            }
            current = self.parent(&candidate);
        }
        None
    }
}
