use super::arena::XmlDocument;
use super::namespaces::{XML, XMLNS};
use super::node::XmlNodeData;
use super::xname::{XAttribute, XName};
use crate::error::{RecolorError, Result};

pub fn parse(xml: &str) -> Result<XmlDocument> {
    let doc = roxmltree::Document::parse_with_options(
        xml,
        roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        },
    )
    .map_err(|e| RecolorError::XmlParse {
        message: e.to_string(),
        location: format!("line {}", e.pos().row),
    })?;

    let mut xml_doc = XmlDocument::new();
    build_tree(doc.root_element(), &mut xml_doc, None);
    Ok(xml_doc)
}

pub fn parse_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    let text = std::str::from_utf8(bytes).map_err(|e| RecolorError::XmlParse {
        message: e.to_string(),
        location: "input".to_string(),
    })?;
    // Parts written by some producers carry a BOM.
    parse(text.trim_start_matches('\u{feff}'))
}

fn build_tree(
    node: roxmltree::Node,
    doc: &mut XmlDocument,
    parent: Option<indextree::NodeId>,
) {
    let node_data = match node.node_type() {
        roxmltree::NodeType::Element => {
            let name = XName::new(
                node.tag_name().namespace().unwrap_or(""),
                node.tag_name().name(),
            );

            let mut attributes: Vec<XAttribute> = node
                .attributes()
                .map(|attr| {
                    XAttribute::new(
                        XName::new(attr.namespace().unwrap_or(""), attr.name()),
                        attr.value(),
                    )
                })
                .collect();

            // roxmltree reports every namespace in scope; keep only the ones
            // this element declares itself so serialization does not repeat
            // the root declarations on every descendant.
            for ns in node.namespaces() {
                if ns.uri() == XML::NS {
                    continue;
                }
                let inherited = node
                    .parent_element()
                    .and_then(|p| p.lookup_namespace_uri(ns.name()))
                    .is_some_and(|uri| uri == ns.uri());
                if inherited {
                    continue;
                }
                match ns.name() {
                    Some(prefix) => attributes.push(XAttribute::new(
                        XName::new(XMLNS::NS, prefix),
                        ns.uri(),
                    )),
                    None => attributes.push(XAttribute::new(XName::local("xmlns"), ns.uri())),
                }
            }

            XmlNodeData::Element { name, attributes }
        }
        roxmltree::NodeType::Text => match node.text() {
            Some(text) => XmlNodeData::Text(text.to_string()),
            None => return,
        },
        roxmltree::NodeType::Comment => match node.text() {
            Some(text) => XmlNodeData::Comment(text.to_string()),
            None => return,
        },
        roxmltree::NodeType::PI => match node.pi() {
            Some(pi) => XmlNodeData::ProcessingInstruction {
                target: pi.target.to_string(),
                data: pi.value.map(|s| s.to_string()).unwrap_or_default(),
            },
            None => return,
        },
        _ => return,
    };

    let new_id = match parent {
        Some(parent_id) => doc.add_child(parent_id, node_data),
        None => doc.add_root(node_data),
    };

    for child in node.children() {
        build_tree(child, doc, Some(new_id));
    }
}
