use std::collections::BTreeMap;
use std::fmt::Write;

/// Slot index plus the generation it was handed out at. Ids of freed nodes
/// never match a reused slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone, PartialEq)]
enum NodeKind {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    /// Declarations applied while the pointer hovers the element.
    pub hover_style: BTreeMap<String, String>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    pub fn set_style(&mut self, property: &str, value: &str) {
        self.style.insert(property.to_string(), value.to_string());
    }

    /// Parses an inline `style` attribute (`a: b; c: d`).
    pub fn apply_style_attribute(&mut self, declarations: &str) {
        for declaration in declarations.split(';') {
            if let Some((property, value)) = declaration.split_once(':') {
                let property = property.trim();
                if !property.is_empty() {
                    self.set_style(property, value.trim());
                }
            }
        }
    }

    fn style_text(style: &BTreeMap<String, String>) -> String {
        style
            .iter()
            .map(|(property, value)| format!("{}: {}", property, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena-backed element tree standing in for the host page's document.
///
/// Removed subtrees are freed and their slots reused, so the arena stays as
/// large as the biggest tree it ever held. Stale `NodeId`s resolve to nothing.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
}

impl Document {
    /// Creates a document holding only a root element with the given tag.
    pub fn with_root(tag: &str) -> Self {
        let mut document = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId { index: 0, generation: 0 },
        };
        document.root = document.push(NodeKind::Element(Element::new(tag)));
        document
    }

    /// `<html><head></head><body></body></html>`
    pub fn empty() -> Self {
        let mut document = Self::with_root("html");
        let root = document.root();
        let head = document.create_element("head");
        let body = document.create_element("body");
        document.append_child(root, head);
        document.append_child(root, body);
        document
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(Element::new(tag)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let node = Node {
            kind,
            parent: None,
            children: Vec::new(),
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Frees `id` and its subtree. The caller detaches it first.
    fn release(&mut self, id: NodeId) {
        let Some(slot) = self
            .slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
        else {
            return;
        };
        let Some(node) = slot.node.take() else {
            return;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);

        for child in node.children {
            self.release(child);
        }
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.node(node)?.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.node_mut(node)?.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    #[cfg(test)]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map_or(&[], |node| node.children.as_slice())
    }

    /// Element children only, in document order.
    pub fn child_elements(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(node)
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
    }

    /// Moves `child` under `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    /// Removes `node` and frees its subtree. No-op for stale ids and the root.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.root {
            return;
        }
        self.detach(node);
        self.release(node);
    }

    fn detach(&mut self, node: NodeId) {
        let parent = self.node_mut(node).and_then(|node| node.parent.take());
        if let Some(parent) = parent.and_then(|parent| self.node_mut(parent)) {
            parent.children.retain(|child| *child != node);
        }
    }

    /// Replaces the children of `node` with a single text node.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        for child in self.children(node).to_vec() {
            self.remove(child);
        }
        if !text.is_empty() && self.node(node).is_some() {
            let text_node = self.create_text(text);
            self.append_child(node, text_node);
        }
    }

    #[cfg(test)]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut text = String::new();
        self.collect_text(node, &mut text);
        text
    }

    #[cfg(test)]
    fn collect_text(&self, node: NodeId, out: &mut String) {
        match self.node(node).map(|node| &node.kind) {
            Some(NodeKind::Text(text)) => out.push_str(text),
            Some(NodeKind::Element(_)) => {
                for child in self.children(node) {
                    self.collect_text(*child, out);
                }
            }
            None => {}
        }
    }

    /// Slots allocated by the arena, live or free.
    #[cfg(test)]
    pub fn arena_len(&self) -> usize {
        self.slots.len()
    }

    /// Attached nodes in document order, starting at the root.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        order
    }

    #[cfg(test)]
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements_by_id(id).into_iter().next()
    }

    pub fn elements_by_id(&self, id: &str) -> Vec<NodeId> {
        self.descendants()
            .into_iter()
            .filter(|node| self.element(*node).and_then(Element::id) == Some(id))
            .collect()
    }

    /// First attached element with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.descendants()
            .into_iter()
            .find(|node| self.element(*node).map(|e| e.tag.as_str()) == Some(tag))
    }

    pub fn body(&self) -> Option<NodeId> {
        self.find_by_tag("body")
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let mut html = String::new();
        self.write_html(node, &mut html);
        html
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        match self.node(node).map(|node| &node.kind) {
            Some(NodeKind::Text(text)) => out.push_str(text),
            Some(NodeKind::Element(element)) => {
                let _ = write!(out, "<{}", element.tag);
                for (name, value) in &element.attributes {
                    let _ = write!(out, " {}=\"{}\"", name, value.replace('"', "&quot;"));
                }
                if !element.style.is_empty() {
                    let _ = write!(out, " style=\"{}\"", Element::style_text(&element.style));
                }
                if !element.hover_style.is_empty() {
                    let _ = write!(
                        out,
                        " data-hover-style=\"{}\"",
                        Element::style_text(&element.hover_style)
                    );
                }
                out.push('>');
                for child in self.children(node) {
                    self.write_html(*child, out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
            None => {}
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}
