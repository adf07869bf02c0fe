use super::node::XmlNodeData;
use super::xname::{XAttribute, XName};
use indextree::{Arena, NodeId};

/// Mutable XML tree backed by an `indextree` arena.
pub struct XmlDocument {
    arena: Arena<XmlNodeData>,
    root: Option<NodeId>,
}

impl XmlDocument {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&XmlNodeData> {
        self.arena.get(id).map(|node| node.get())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut XmlNodeData> {
        self.arena.get_mut(id).map(|node| node.get_mut())
    }

    pub fn name(&self, id: NodeId) -> Option<&XName> {
        self.get(id).and_then(|data| data.name())
    }

    pub fn attribute(&self, id: NodeId, local_name: &str) -> Option<&str> {
        self.get(id).and_then(|data| data.attribute(local_name))
    }

    pub fn add_root(&mut self, data: XmlNodeData) -> NodeId {
        let id = self.arena.new_node(data);
        self.root = Some(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, data: XmlNodeData) -> NodeId {
        let child = self.arena.new_node(data);
        parent.append(child, &mut self.arena);
        child
    }

    pub fn add_first_child(&mut self, parent: NodeId, data: XmlNodeData) -> NodeId {
        let child = self.arena.new_node(data);
        parent.prepend(child, &mut self.arena);
        child
    }

    pub fn add_after(&mut self, sibling: NodeId, data: XmlNodeData) -> NodeId {
        let new_node = self.arena.new_node(data);
        sibling.insert_after(new_node, &mut self.arena);
        new_node
    }

    pub fn rename(&mut self, node: NodeId, name: XName) {
        if let Some(data) = self.get_mut(node) {
            data.rename(name);
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &XName, value: &str) {
        if let Some(node_data) = self.get_mut(node) {
            if let Some(attrs) = node_data.attributes_mut() {
                if let Some(attr) = attrs.iter_mut().find(|a| &a.name == name) {
                    attr.value = value.to_string();
                } else {
                    attrs.push(XAttribute::new(name.clone(), value));
                }
            }
        }
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        parent.children(&self.arena)
    }

    pub fn descendants(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.descendants(&self.arena)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.parent()
    }

    /// Direct children that are elements.
    pub fn child_elements(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent)
            .filter(move |&child| self.get(child).is_some_and(|d| d.is_element()))
    }

    pub fn elements_by_name<'a>(
        &'a self,
        parent: NodeId,
        name: &'a XName,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(parent)
            .filter(move |&child_id| self.name(child_id) == Some(name))
    }

    pub fn first_child_named(&self, parent: NodeId, name: &XName) -> Option<NodeId> {
        self.elements_by_name(parent, name).next()
    }

    /// All elements under `node` (inclusive) with the given name, in document order.
    pub fn descendants_named(&self, node: NodeId, name: &XName) -> Vec<NodeId> {
        self.descendants(node)
            .filter(|&id| self.name(id) == Some(name))
            .collect()
    }

    /// Concatenated text of the direct text children of `node`.
    pub fn text_of(&self, node: NodeId) -> String {
        self.children(node)
            .filter_map(|child| self.get(child).and_then(|d| d.text_content()))
            .collect()
    }
}

impl Default for XmlDocument {
    fn default() -> Self {
        Self::new()
    }
}
