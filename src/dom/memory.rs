use super::{Dom, Fragment, FragmentNode, Mutation};
use std::collections::BTreeMap;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        classes: Vec<String>,
        attributes: BTreeMap<String, String>,
        style: BTreeMap<String, String>,
        value: Option<String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed document. Replaced nodes stay in the arena but are
/// unreachable from the root.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<NodeData>,
    root: NodeId,
    cookie: String,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        let body = NodeData {
            kind: NodeKind::Element {
                tag: "body".to_string(),
                classes: Vec::new(),
                attributes: BTreeMap::new(),
                style: BTreeMap::new(),
                value: None,
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![body],
            root: NodeId(0),
            cookie: String::new(),
        }
    }

    /// Builds a document whose body holds `children`.
    pub fn with_body(children: impl IntoIterator<Item = Fragment>) -> Self {
        let mut dom = Self::new();
        let root = dom.root;
        for child in children {
            dom.append(root, &child);
        }
        dom
    }

    pub fn body(&self) -> NodeId {
        self.root
    }

    pub fn set_cookie(&mut self, cookie: &str) {
        self.cookie = cookie.to_string();
    }

    pub fn append(&mut self, parent: NodeId, fragment: &Fragment) -> NodeId {
        let id = self.build(fragment, Some(parent));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Simulates the user typing into a form control.
    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let NodeKind::Element { value: slot, .. } = &mut self.nodes[node.0].kind {
            *slot = Some(value.to_string());
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { style, .. } => style.get(property).cloned(),
            NodeKind::Text(_) => None,
        }
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { classes, .. } => classes.clone(),
            NodeKind::Text(_) => Vec::new(),
        }
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0].children.clone()
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        self.to_fragment_node(node).map_or_else(String::new, |child| match child {
            FragmentNode::Element(fragment) => fragment.to_html(),
            FragmentNode::Text(text) => text,
        })
    }

    fn to_fragment_node(&self, node: NodeId) -> Option<FragmentNode> {
        let data = self.nodes.get(node.0)?;
        Some(match &data.kind {
            NodeKind::Text(text) => FragmentNode::Text(text.clone()),
            NodeKind::Element {
                tag,
                classes,
                attributes,
                ..
            } => FragmentNode::Element(Fragment {
                tag: tag.clone(),
                classes: classes.clone(),
                attributes: attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
                children: data
                    .children
                    .iter()
                    .filter_map(|child| self.to_fragment_node(*child))
                    .collect(),
            }),
        })
    }

    fn build(&mut self, fragment: &Fragment, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind: NodeKind::Element {
                tag: fragment.tag.clone(),
                classes: fragment.classes.clone(),
                attributes: fragment.attributes.iter().cloned().collect(),
                style: BTreeMap::new(),
                value: None,
            },
            parent,
            children: Vec::new(),
        });

        for child in &fragment.children {
            let child_id = match child {
                FragmentNode::Element(element) => self.build(element, Some(id)),
                FragmentNode::Text(text) => {
                    let text_id = NodeId(self.nodes.len());
                    self.nodes.push(NodeData {
                        kind: NodeKind::Text(text.clone()),
                        parent: Some(id),
                        children: Vec::new(),
                    });
                    text_id
                }
            };
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    fn walk(&self, from: NodeId, out: &mut Vec<NodeId>) {
        out.push(from);
        for child in &self.nodes[from.0].children {
            self.walk(*child, out);
        }
    }

    fn attached_elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(self.root, &mut out);
        out.retain(|id| matches!(self.nodes[id.0].kind, NodeKind::Element { .. }));
        out
    }

    fn element_mut(
        &mut self,
        node: NodeId,
    ) -> Option<(&mut Vec<String>, &mut BTreeMap<String, String>)> {
        match &mut self.nodes.get_mut(node.0)?.kind {
            NodeKind::Element { classes, style, .. } => Some((classes, style)),
            NodeKind::Text(_) => None,
        }
    }

    fn replace(&mut self, node: NodeId, fragment: &Fragment) {
        let Some(parent) = self.nodes[node.0].parent else {
            trace!(?node, "skipping replacement of detached node");
            return;
        };
        let replacement = self.build(fragment, Some(parent));
        let siblings = &mut self.nodes[parent.0].children;
        if let Some(slot) = siblings.iter_mut().find(|child| **child == node) {
            *slot = replacement;
        }
        self.nodes[node.0].parent = None;
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.attached_elements()
            .into_iter()
            .find(|node| self.attribute(node, "id").as_deref() == Some(id))
    }

    fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        self.attached_elements()
            .into_iter()
            .filter(|node| self.has_class(node, class))
            .collect()
    }

    fn tag_name(&self, node: &NodeId) -> String {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, .. } => tag.clone(),
            NodeKind::Text(_) => "#text".to_string(),
        }
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        match &self.nodes[node.0].kind {
            NodeKind::Element {
                attributes, classes, ..
            } => {
                if name.eq_ignore_ascii_case("class") {
                    return (!classes.is_empty()).then(|| classes.join(" "));
                }
                attributes.get(&name.to_ascii_lowercase()).cloned()
            }
            NodeKind::Text(_) => None,
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        match &self.nodes[node.0].kind {
            NodeKind::Element { classes, .. } => classes.iter().any(|c| c == class),
            NodeKind::Text(_) => false,
        }
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn text_content(&self, node: &NodeId) -> String {
        let mut nodes = Vec::new();
        self.walk(*node, &mut nodes);
        nodes
            .into_iter()
            .filter_map(|id| match &self.nodes[id.0].kind {
                NodeKind::Text(text) => Some(text.as_str()),
                NodeKind::Element { .. } => None,
            })
            .collect()
    }

    fn value(&self, node: &NodeId) -> String {
        match &self.nodes[node.0].kind {
            NodeKind::Element {
                value, attributes, ..
            } => value
                .clone()
                .or_else(|| attributes.get("value").cloned())
                .unwrap_or_default(),
            NodeKind::Text(_) => String::new(),
        }
    }

    fn check_validity(&self, form: &NodeId) -> bool {
        let mut nodes = Vec::new();
        self.walk(*form, &mut nodes);
        !nodes.iter().any(|node| {
            let control = matches!(
                self.tag_name(node).as_str(),
                "input" | "select" | "textarea"
            );
            control && self.attribute(node, "required").is_some() && self.value(node).is_empty()
        })
    }

    fn cookie(&self) -> String {
        self.cookie.clone()
    }

    fn apply(&mut self, mutation: Mutation<NodeId>) {
        match mutation {
            Mutation::SetStyle {
                node,
                property,
                value,
            } => {
                if let Some((_, style)) = self.element_mut(node) {
                    style.insert(property.to_string(), value);
                }
            }
            Mutation::ClearStyle { node, property } => {
                if let Some((_, style)) = self.element_mut(node) {
                    style.remove(property);
                }
            }
            Mutation::AddClass { node, class } => {
                if let Some((classes, _)) = self.element_mut(node) {
                    if !classes.iter().any(|c| c == class) {
                        classes.push(class.to_string());
                    }
                }
            }
            Mutation::RemoveClass { node, class } => {
                if let Some((classes, _)) = self.element_mut(node) {
                    classes.retain(|c| c != class);
                }
            }
            Mutation::SetText { node, text } => {
                for child in std::mem::take(&mut self.nodes[node.0].children) {
                    self.nodes[child.0].parent = None;
                }
                let text_id = NodeId(self.nodes.len());
                self.nodes.push(NodeData {
                    kind: NodeKind::Text(text),
                    parent: Some(node),
                    children: Vec::new(),
                });
                self.nodes[node.0].children.push(text_id);
            }
            Mutation::ReplaceWith { node, fragment } => self.replace(node, &fragment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{el, Marker};

    fn sample() -> MemoryDom {
        MemoryDom::with_body([
            el("div").id("list").child(
                el("div")
                    .class("grievance-card")
                    .child(el("h5").text("Broken "))
                    .child(el("p").child(el("strong").text("streetlight"))),
            ),
            el("form")
                .class("needs-validation")
                .child(el("input").attr("name", "title").attr("required", "")),
        ])
    }

    #[test]
    fn text_content_includes_descendants() {
        let dom = sample();
        let card = dom.elements_by_class("grievance-card")[0];
        assert_eq!(dom.text_content(&card), "Broken streetlight");
    }

    #[test]
    fn closest_walks_up_from_the_node_itself() {
        let dom = sample();
        let card = dom.elements_by_class("grievance-card")[0];
        let strong = dom.children(dom.children(card)[1])[0];
        assert_eq!(dom.closest(&strong, Marker::Class("grievance-card")), Some(card));
        assert_eq!(dom.closest(&card, Marker::Class("grievance-card")), Some(card));
        assert_eq!(dom.closest(&strong, Marker::Tag("a")), None);
    }

    #[test]
    fn replaced_nodes_drop_out_of_lookups() {
        let mut dom = MemoryDom::with_body([el("button").id("btn").class("mark-read-btn")]);
        let button = dom.element_by_id("btn").unwrap();
        dom.apply(Mutation::ReplaceWith {
            node: button,
            fragment: el("span").class("badge").text("Seen"),
        });
        assert!(dom.element_by_id("btn").is_none());
        assert!(dom.elements_by_class("mark-read-btn").is_empty());
        assert!(!dom.is_attached(button));
        assert_eq!(dom.text_content(&dom.body()), "Seen");

        // a second replacement of the detached node changes nothing
        dom.apply(Mutation::ReplaceWith {
            node: button,
            fragment: el("span").text("again"),
        });
        assert_eq!(dom.text_content(&dom.body()), "Seen");
    }

    #[test]
    fn required_empty_inputs_fail_validity() {
        let mut dom = sample();
        let form = dom.elements_by_class("needs-validation")[0];
        assert!(!dom.check_validity(&form));

        let input = dom.children(form)[0];
        dom.set_value(input, "No water");
        assert!(dom.check_validity(&form));
    }

    #[test]
    fn set_text_replaces_children() {
        let mut dom = sample();
        let list = dom.element_by_id("list").unwrap();
        dom.apply(Mutation::SetText {
            node: list,
            text: "empty".to_string(),
        });
        assert_eq!(dom.text_content(&list), "empty");
        assert!(dom.elements_by_class("grievance-card").is_empty());
    }
}
