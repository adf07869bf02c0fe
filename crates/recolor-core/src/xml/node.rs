use super::xname::{XAttribute, XName};

#[derive(Clone, Debug)]
pub enum XmlNodeData {
    Element {
        name: XName,
        attributes: Vec<XAttribute>,
    },
    Text(String),
    Comment(String),
    ProcessingInstruction { target: String, data: String },
}

impl XmlNodeData {
    pub fn element(name: XName) -> Self {
        Self::Element {
            name,
            attributes: Vec::new(),
        }
    }

    pub fn element_with_attrs(name: XName, attributes: Vec<XAttribute>) -> Self {
        Self::Element { name, attributes }
    }

    pub fn text(content: &str) -> Self {
        Self::Text(content.to_string())
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn name(&self) -> Option<&XName> {
        match self {
            Self::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Replace the element name, keeping attributes and children.
    pub fn rename(&mut self, new_name: XName) {
        if let Self::Element { name, .. } = self {
            *name = new_name;
        }
    }

    pub fn attributes(&self) -> Option<&[XAttribute]> {
        match self {
            Self::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn attributes_mut(&mut self) -> Option<&mut Vec<XAttribute>> {
        match self {
            Self::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    /// Value of an attribute with no namespace, e.g. `val`.
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes()?
            .iter()
            .find(|a| a.name.namespace.is_none() && a.name.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    pub fn text_content(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}
