use super::arena::XmlDocument;
use super::namespaces::{XML, XMLNS};
use super::node::XmlNodeData;
use super::xname::{XAttribute, XName};
use crate::error::{RecolorError, Result};
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::{Cursor, Write};

/// Serialize with a standalone UTF-8 declaration on its own line.
pub fn serialize_bytes(doc: &XmlDocument) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(write_error)?;
    writer.get_mut().write_all(b"\n")?;

    if let Some(root_id) = doc.root() {
        write_node(doc, root_id, &mut writer, &NamespaceMap::new())?;
    }

    Ok(writer.into_inner().into_inner())
}

pub fn serialize(doc: &XmlDocument) -> Result<String> {
    let bytes = serialize_bytes(doc)?;
    String::from_utf8(bytes).map_err(|e| RecolorError::XmlWrite(e.to_string()))
}

/// Rewrite every bare LF as CR+LF; existing CR+LF pairs are left alone.
pub fn normalize_crlf(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + bytes.len() / 32);
    let mut start = 0;
    for pos in memchr::memchr_iter(b'\n', bytes) {
        out.extend_from_slice(&bytes[start..pos]);
        if pos == 0 || bytes[pos - 1] != b'\r' {
            out.push(b'\r');
        }
        out.push(b'\n');
        start = pos + 1;
    }
    out.extend_from_slice(&bytes[start..]);
    out
}

/// Escape an attribute value; line breaks and tabs become character references.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    escape_with(value, &['\n', '\r', '\t'])
}

/// Escape text content. A bare CR must survive CR+LF normalization.
fn escape_text(text: &str) -> Cow<'_, str> {
    escape_with(text, &['\r'])
}

fn escape_with<'a>(raw: &'a str, as_reference: &[char]) -> Cow<'a, str> {
    let escaped = escape(raw);
    if !escaped.contains(as_reference) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for ch in escaped.chars() {
        if as_reference.contains(&ch) {
            out.push_str(&format!("&#{};", ch as u32));
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

fn write_error(e: impl std::fmt::Display) -> RecolorError {
    RecolorError::XmlWrite(e.to_string())
}

/// Namespace URI to prefix, as declared by the elements in scope.
type NamespaceMap = HashMap<String, String>;

fn extend_namespace_map(namespace_map: &mut NamespaceMap, attributes: &[XAttribute]) {
    for attr in attributes {
        match attr.name.namespace.as_deref() {
            None if attr.name.local_name == "xmlns" => {
                namespace_map.insert(attr.value.clone(), String::new());
            }
            Some(XMLNS::NS) => {
                namespace_map.insert(attr.value.clone(), attr.name.local_name.clone());
            }
            _ => {}
        }
    }
}

fn qualified_name(name: &XName, namespace_map: &NamespaceMap, is_attribute: bool) -> String {
    let Some(ns) = &name.namespace else {
        return name.local_name.clone();
    };

    let prefix = if ns == XMLNS::NS {
        "xmlns"
    } else {
        match namespace_map.get(ns) {
            // Unprefixed attributes never pick up the default namespace.
            Some(prefix) if !(is_attribute && prefix.is_empty()) => prefix.as_str(),
            _ => fallback_prefix(ns),
        }
    };

    if prefix.is_empty() {
        name.local_name.clone()
    } else {
        format!("{}:{}", prefix, name.local_name)
    }
}

fn write_node<W: Write>(
    doc: &XmlDocument,
    node_id: indextree::NodeId,
    writer: &mut Writer<W>,
    namespace_map: &NamespaceMap,
) -> Result<()> {
    let Some(node_data) = doc.get(node_id) else {
        return Ok(());
    };

    match node_data {
        XmlNodeData::Element { name, attributes } => {
            write_element(doc, node_id, name, attributes, writer, namespace_map)?;
        }
        XmlNodeData::Text(text) => {
            writer
                .write_event(Event::Text(BytesText::from_escaped(escape_text(text))))
                .map_err(write_error)?;
        }
        XmlNodeData::Comment(text) => {
            writer
                .write_event(Event::Comment(BytesText::from_escaped(text.as_str())))
                .map_err(write_error)?;
        }
        XmlNodeData::ProcessingInstruction { target, data } => {
            let content = if data.is_empty() {
                target.clone()
            } else {
                format!("{} {}", target, data)
            };
            writer
                .write_event(Event::PI(BytesPI::new(&content)))
                .map_err(write_error)?;
        }
    }

    Ok(())
}

fn write_element<W: Write>(
    doc: &XmlDocument,
    node_id: indextree::NodeId,
    name: &XName,
    attributes: &[XAttribute],
    writer: &mut Writer<W>,
    namespace_map: &NamespaceMap,
) -> Result<()> {
    let mut scoped_map = namespace_map.clone();
    extend_namespace_map(&mut scoped_map, attributes);

    let tag_name = qualified_name(name, &scoped_map, false);
    let mut elem = BytesStart::new(tag_name.as_str());

    for attr in attributes {
        let attr_name = qualified_name(&attr.name, &scoped_map, true);
        let value = escape_attribute(&attr.value);
        elem.push_attribute(Attribute {
            key: QName(attr_name.as_bytes()),
            value: Cow::Borrowed(value.as_bytes()),
        });
    }

    let mut children = doc.children(node_id).peekable();

    if children.peek().is_none() {
        writer.write_event(Event::Empty(elem)).map_err(write_error)?;
    } else {
        writer.write_event(Event::Start(elem)).map_err(write_error)?;

        for child_id in children {
            write_node(doc, child_id, writer, &scoped_map)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(tag_name.as_str())))
            .map_err(write_error)?;
    }

    Ok(())
}

fn fallback_prefix(namespace: &str) -> &'static str {
    match namespace {
        // PresentationML
        "http://schemas.openxmlformats.org/presentationml/2006/main" => "p",
        "http://schemas.microsoft.com/office/powerpoint/2010/main" => "p14",
        "http://schemas.microsoft.com/office/powerpoint/2012/main" => "p15",
        // DrawingML
        "http://schemas.openxmlformats.org/drawingml/2006/main" => "a",
        "http://schemas.microsoft.com/office/drawing/2010/main" => "a14",
        "http://schemas.openxmlformats.org/drawingml/2006/picture" => "pic",
        "http://schemas.openxmlformats.org/drawingml/2006/chart" => "c",
        // Relationships
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships" => "r",
        // Markup Compatibility
        "http://schemas.openxmlformats.org/markup-compatibility/2006" => "mc",
        XML::NS => "xml",
        _ => "ns",
    }
}
