//! Slide part rewriting: scheme color references become fixed RGB colors.

use std::borrow::Cow;

use indextree::NodeId;
use serde::Serialize;

use crate::error::Result;
use crate::settings::ConverterSettings;
use crate::theme::ColorScheme;
use crate::xml::builder::{normalize_crlf, serialize_bytes};
use crate::xml::parser::parse_bytes;
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData, A};

/// Slot name written into synthesized run fills.
pub const DEFAULT_TEXT_REFERENCE: &str = "tx1";

#[derive(Debug, Clone)]
pub struct SlideRewrite<'a> {
    /// The rewritten part, or the input itself when nothing changed.
    pub content: Cow<'a, [u8]>,
    pub fills_injected: usize,
    pub colors_replaced: usize,
    /// `a:schemeClr val` values with no slot in the scheme, e.g. `phClr`.
    pub unresolved: Vec<String>,
}

impl SlideRewrite<'_> {
    pub fn is_modified(&self) -> bool {
        matches!(self.content, Cow::Owned(_))
    }

    fn unchanged(content: &[u8]) -> SlideRewrite<'_> {
        SlideRewrite {
            content: Cow::Borrowed(content),
            fills_injected: 0,
            colors_replaced: 0,
            unresolved: Vec::new(),
        }
    }
}

pub fn has_drawing_content(xml: &[u8]) -> bool {
    memchr::memmem::find(xml, A::NS.as_bytes()).is_some()
}

/// Replace every `a:schemeClr` in a slide with the `a:srgbClr` it resolves
/// to in `scheme`.
///
/// Runs whose `a:rPr` has no fill but which carry text first get an explicit
/// `a:solidFill/a:schemeClr val="tx1"` (unless disabled in `settings`), so
/// the inherited default text color is flattened as well. References that do
/// not resolve are left in place. Parts without DrawingML content, or where
/// nothing had to change, come back borrowed and byte-identical.
pub fn rewrite_slide<'a>(
    slide_xml: &'a [u8],
    scheme: &ColorScheme,
    settings: &ConverterSettings,
) -> Result<SlideRewrite<'a>> {
    if !has_drawing_content(slide_xml) {
        return Ok(SlideRewrite::unchanged(slide_xml));
    }

    let mut doc = parse_bytes(slide_xml)?;
    let Some(root) = doc.root() else {
        return Ok(SlideRewrite::unchanged(slide_xml));
    };

    let fills_injected = if settings.inject_default_text_fill {
        inject_default_fills(&mut doc, root)
    } else {
        0
    };

    let mut colors_replaced = 0;
    let mut unresolved = Vec::new();
    let val = XName::local("val");

    for reference in doc.descendants_named(root, &A::schemeClr()) {
        let slot_ref = doc.attribute(reference, "val").unwrap_or_default().to_string();
        match scheme.resolve(&slot_ref) {
            Some(color) => {
                doc.rename(reference, A::srgbClr());
                doc.set_attribute(reference, &val, color.hex());
                colors_replaced += 1;
            }
            None => {
                tracing::debug!(reference = %slot_ref, "scheme color has no slot, left unchanged");
                unresolved.push(slot_ref);
            }
        }
    }

    if fills_injected == 0 && colors_replaced == 0 {
        return Ok(SlideRewrite {
            unresolved,
            ..SlideRewrite::unchanged(slide_xml)
        });
    }

    let mut content = serialize_bytes(&doc)?;
    if settings.crlf_line_endings {
        content = normalize_crlf(&content);
    }

    Ok(SlideRewrite {
        content: Cow::Owned(content),
        fills_injected,
        colors_replaced,
        unresolved,
    })
}

fn is_fill(doc: &XmlDocument, node: NodeId) -> bool {
    doc.name(node).is_some_and(|name| {
        name.in_namespace(A::NS) && A::FILL_KINDS.contains(&name.local_name.as_str())
    })
}

/// Give each text-bearing run property node without a fill an explicit
/// `tx1` fill. The fill goes right after `a:ln` when present, else first,
/// which is where DrawingML expects it.
fn inject_default_fills(doc: &mut XmlDocument, root: NodeId) -> usize {
    let targets: Vec<NodeId> = {
        let doc: &XmlDocument = doc;
        doc.descendants_named(root, &A::rPr())
            .into_iter()
            .filter(|&rpr| !doc.child_elements(rpr).any(|child| is_fill(doc, child)))
            .filter(|&rpr| {
                doc.parent(rpr)
                    .is_some_and(|run| doc.first_child_named(run, &A::t()).is_some())
            })
            .collect()
    };

    for &rpr in &targets {
        let fill = match doc.first_child_named(rpr, &A::ln()) {
            Some(ln) => doc.add_after(ln, XmlNodeData::element(A::solidFill())),
            None => doc.add_first_child(rpr, XmlNodeData::element(A::solidFill())),
        };
        doc.add_child(
            fill,
            XmlNodeData::element_with_attrs(
                A::schemeClr(),
                vec![XAttribute::new(XName::local("val"), DEFAULT_TEXT_REFERENCE)],
            ),
        );
    }

    targets.len()
}

/// Fill of one run property node, as reported by [`inspect_runs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum RunFill {
    Scheme(String),
    Rgb(String),
    /// Any other fill or color kind, by element name.
    Other(String),
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunInfo {
    pub fill: RunFill,
    /// Text of the sibling `a:t`, if the run has one.
    pub text: Option<String>,
}

/// Describe the fill and text of every `a:rPr` in a slide.
pub fn inspect_runs(slide_xml: &[u8]) -> Result<Vec<RunInfo>> {
    if !has_drawing_content(slide_xml) {
        return Ok(Vec::new());
    }
    let doc = parse_bytes(slide_xml)?;
    let Some(root) = doc.root() else {
        return Ok(Vec::new());
    };

    let runs = doc
        .descendants_named(root, &A::rPr())
        .into_iter()
        .map(|rpr| {
            let fill = doc
                .child_elements(rpr)
                .find(|&child| is_fill(&doc, child))
                .map(|fill| describe_fill(&doc, fill))
                .unwrap_or(RunFill::None);
            let text = doc
                .parent(rpr)
                .and_then(|run| doc.first_child_named(run, &A::t()))
                .map(|t| doc.text_of(t));
            RunInfo { fill, text }
        })
        .collect();

    Ok(runs)
}

fn describe_fill(doc: &XmlDocument, fill: NodeId) -> RunFill {
    let local = |node: NodeId| {
        doc.name(node)
            .map(|n| n.local_name.clone())
            .unwrap_or_default()
    };

    if doc.name(fill) != Some(&A::solidFill()) {
        return RunFill::Other(local(fill));
    }
    let Some(color) = doc.child_elements(fill).next() else {
        return RunFill::Other(local(fill));
    };
    let val = doc.attribute(color, "val").unwrap_or_default().to_string();
    match local(color).as_str() {
        "schemeClr" => RunFill::Scheme(val),
        "srgbClr" => RunFill::Rgb(val),
        other => RunFill::Other(other.to_string()),
    }
}
