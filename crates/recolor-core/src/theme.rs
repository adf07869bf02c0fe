//! Theme color schemes.
//!
//! A theme part (`ppt/theme/themeN.xml`) defines twelve named color slots in
//! `a:themeElements/a:clrScheme`:
//!
//! - `dk1`, `lt1`, `dk2`, `lt2`: dark and light text/background colors
//! - `accent1` to `accent6`
//! - `hlink`, `folHlink`: hyperlink and followed hyperlink
//!
//! Each slot holds either a literal `a:srgbClr` or an `a:sysClr` that points
//! at an operating-system color and records its last known RGB value.
//! Slides refer to slots through `a:schemeClr val="..."`, sometimes with the
//! legacy names `bg1`, `tx1`, `bg2`, `tx2`.

use crate::error::{RecolorError, Result};
use crate::xml::{XmlDocument, A};
use serde::Serialize;
use std::fmt;

/// Marker appended when a system color is rendered as text.
pub const SYSTEM_COLOR_MARKER: char = 's';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemeSlot {
    Dk1,
    Lt1,
    Dk2,
    Lt2,
    Accent1,
    Accent2,
    Accent3,
    Accent4,
    Accent5,
    Accent6,
    Hlink,
    FolHlink,
}

impl SchemeSlot {
    pub const ALL: [SchemeSlot; 12] = [
        SchemeSlot::Dk1,
        SchemeSlot::Lt1,
        SchemeSlot::Dk2,
        SchemeSlot::Lt2,
        SchemeSlot::Accent1,
        SchemeSlot::Accent2,
        SchemeSlot::Accent3,
        SchemeSlot::Accent4,
        SchemeSlot::Accent5,
        SchemeSlot::Accent6,
        SchemeSlot::Hlink,
        SchemeSlot::FolHlink,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SchemeSlot::Dk1 => "dk1",
            SchemeSlot::Lt1 => "lt1",
            SchemeSlot::Dk2 => "dk2",
            SchemeSlot::Lt2 => "lt2",
            SchemeSlot::Accent1 => "accent1",
            SchemeSlot::Accent2 => "accent2",
            SchemeSlot::Accent3 => "accent3",
            SchemeSlot::Accent4 => "accent4",
            SchemeSlot::Accent5 => "accent5",
            SchemeSlot::Accent6 => "accent6",
            SchemeSlot::Hlink => "hlink",
            SchemeSlot::FolHlink => "folHlink",
        }
    }

    /// Canonical slot name as used in `a:clrScheme`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.name() == name)
    }

    /// Resolve an `a:schemeClr val` to a slot. Legacy aliases are mapped
    /// first and unconditionally: `bg1`→`lt1`, `tx1`→`dk1`, `bg2`→`lt2`,
    /// `tx2`→`dk2`. Values like `phClr` have no slot.
    pub fn from_reference(value: &str) -> Option<Self> {
        Self::from_name(canonical_slot_name(value))
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SchemeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn canonical_slot_name(value: &str) -> &str {
    match value {
        "bg1" => "lt1",
        "tx1" => "dk1",
        "bg2" => "lt2",
        "tx2" => "dk2",
        other => other,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ColorValue {
    /// `a:srgbClr val="RRGGBB"`.
    Rgb { hex: String },
    /// `a:sysClr val="windowText" lastClr="000000"`.
    System { name: String, last_color: String },
}

impl ColorValue {
    /// Hex digits usable as an `a:srgbClr val`, without any marker.
    pub fn hex(&self) -> &str {
        match self {
            ColorValue::Rgb { hex } => hex,
            ColorValue::System { last_color, .. } => last_color,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, ColorValue::System { .. })
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorValue::Rgb { hex } => f.write_str(hex),
            ColorValue::System { last_color, .. } => {
                write!(f, "{}{}", last_color, SYSTEM_COLOR_MARKER)
            }
        }
    }
}

/// The twelve resolved slots of one theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorScheme {
    pub name: String,
    colors: [ColorValue; 12],
}

impl ColorScheme {
    pub fn from_theme_xml(bytes: &[u8]) -> Result<Self> {
        let doc = crate::xml::parser::parse_bytes(bytes)?;
        Self::from_document(&doc)
    }

    pub fn from_document(doc: &XmlDocument) -> Result<Self> {
        let root = doc
            .root()
            .ok_or_else(|| RecolorError::invalid_theme("empty theme part"))?;
        let scheme = doc
            .first_child_named(root, &A::themeElements())
            .and_then(|elements| doc.first_child_named(elements, &A::clrScheme()))
            .ok_or_else(|| RecolorError::invalid_theme("no a:themeElements/a:clrScheme"))?;

        let name = doc.attribute(scheme, "name").unwrap_or_default().to_string();
        let mut colors: [Option<ColorValue>; 12] = Default::default();

        for entry in doc.child_elements(scheme) {
            let Some(tag) = doc.name(entry) else {
                continue;
            };
            if !tag.in_namespace(A::NS) {
                continue;
            }
            if tag.local_name == "extLst" {
                tracing::debug!(scheme = %name, "skipping color scheme extension list");
                continue;
            }
            let slot = SchemeSlot::from_name(&tag.local_name).ok_or_else(|| {
                RecolorError::invalid_theme(format!("unknown color slot '{}'", tag.local_name))
            })?;

            let value = decode_color(doc, entry, slot)?;
            tracing::debug!(scheme = %name, %slot, color = %value, "theme color");
            colors[slot.index()] = Some(value);
        }

        let mut resolved = Vec::with_capacity(12);
        for slot in SchemeSlot::ALL {
            let value = colors[slot.index()].take().ok_or_else(|| {
                RecolorError::invalid_theme(format!("color scheme '{}' lacks slot '{}'", name, slot))
            })?;
            resolved.push(value);
        }
        let colors: [ColorValue; 12] = resolved
            .try_into()
            .map_err(|_| RecolorError::invalid_theme("color scheme must have 12 slots"))?;

        Ok(Self { name, colors })
    }

    pub fn get(&self, slot: SchemeSlot) -> &ColorValue {
        &self.colors[slot.index()]
    }

    /// Look up an `a:schemeClr val`, applying the legacy aliases.
    pub fn resolve(&self, reference: &str) -> Option<&ColorValue> {
        SchemeSlot::from_reference(reference).map(|slot| self.get(slot))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SchemeSlot, &ColorValue)> {
        SchemeSlot::ALL.into_iter().zip(self.colors.iter())
    }
}

fn decode_color(doc: &XmlDocument, entry: indextree::NodeId, slot: SchemeSlot) -> Result<ColorValue> {
    let value = doc.child_elements(entry).next().ok_or_else(|| {
        RecolorError::invalid_theme(format!("slot '{}' has no color value", slot))
    })?;
    let kind = doc
        .name(value)
        .map(|n| n.local_name.as_str())
        .unwrap_or_default();

    let required = |attr: &str| {
        doc.attribute(value, attr).map(str::to_string).ok_or_else(|| {
            RecolorError::invalid_theme(format!("slot '{}' {} lacks '{}'", slot, kind, attr))
        })
    };

    match kind {
        "srgbClr" => Ok(ColorValue::Rgb { hex: required("val")? }),
        "sysClr" => Ok(ColorValue::System {
            name: required("val")?,
            last_color: required("lastClr")?,
        }),
        other => Err(RecolorError::UnsupportedColorKind {
            slot: slot.to_string(),
            kind: other.to_string(),
        }),
    }
}
