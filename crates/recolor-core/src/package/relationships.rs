use crate::error::{RecolorError, Result};
use crate::xml::{XmlDocument, PR};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::parts::{resolve_target, slide_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TargetMode {
    #[default]
    Internal,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    /// Final segment of the relationship type URI, e.g. `theme`.
    pub rel_type: String,
    /// Package part path for internal targets, verbatim for external ones.
    pub target: String,
    #[serde(default)]
    pub target_mode: TargetMode,
}

/// Relationships of one owning part, grouped by short type name.
#[derive(Debug, Clone, Default)]
pub struct RelationshipSet {
    owner: String,
    relationships: Vec<Relationship>,
    by_type: BTreeMap<String, Vec<String>>,
}

pub fn short_type(rel_type: &str) -> &str {
    rel_type.rsplit('/').next().unwrap_or(rel_type)
}

impl RelationshipSet {
    pub fn from_document(owner: &str, doc: &XmlDocument) -> Result<Self> {
        let root = doc.root().ok_or_else(|| {
            RecolorError::malformed(format!("empty relationship part for '{}'", owner))
        })?;

        let mut relationships = Vec::new();
        for child in doc.child_elements(root) {
            if doc.name(child) != Some(&PR::Relationship()) {
                continue;
            }
            let (Some(rel_type), Some(target)) =
                (doc.attribute(child, "Type"), doc.attribute(child, "Target"))
            else {
                return Err(RecolorError::malformed(format!(
                    "relationship without Type or Target in rels of '{}'",
                    owner
                )));
            };

            let target_mode = match doc.attribute(child, "TargetMode") {
                Some("External") => TargetMode::External,
                _ => TargetMode::Internal,
            };
            let target = match target_mode {
                TargetMode::Internal => resolve_target(owner, target),
                TargetMode::External => target.to_string(),
            };

            relationships.push(Relationship {
                id: doc.attribute(child, "Id").unwrap_or_default().to_string(),
                rel_type: short_type(rel_type).to_string(),
                target,
                target_mode,
            });
        }

        Ok(Self::from_relationships(owner, relationships))
    }

    pub fn from_relationships(owner: &str, relationships: Vec<Relationship>) -> Self {
        let mut by_type: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for rel in &relationships {
            by_type
                .entry(rel.rel_type.clone())
                .or_default()
                .push(rel.target.clone());
        }
        for targets in by_type.values_mut() {
            targets.sort();
        }

        Self {
            owner: owner.to_string(),
            relationships,
            by_type,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Targets of one type, sorted lexicographically.
    pub fn targets(&self, rel_type: &str) -> &[String] {
        self.by_type
            .get(rel_type)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn first(&self, rel_type: &str) -> Option<&str> {
        self.targets(rel_type).first().map(|s| s.as_str())
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.by_type.keys().map(|k| k.as_str())
    }

    /// Types not in `known`, logged once as a warning for the named record.
    fn unknown_types(&self, record: &str, known: &[&str]) -> Vec<String> {
        let unknown: Vec<String> = self
            .types()
            .filter(|t| !known.contains(t))
            .map(|t| t.to_string())
            .collect();
        if !unknown.is_empty() {
            tracing::warn!(
                record,
                owner = %self.owner,
                types = %unknown.join(", "),
                "relationship part has unexpected relationship types"
            );
        }
        unknown
    }

    fn required(&self, rel_type: &str) -> Result<String> {
        self.first(rel_type).map(|s| s.to_string()).ok_or_else(|| {
            RecolorError::malformed(format!(
                "'{}' has no '{}' relationship",
                self.owner, rel_type
            ))
        })
    }

    fn optional(&self, rel_type: &str) -> Option<String> {
        self.first(rel_type).map(|s| s.to_string())
    }

    fn list(&self, rel_type: &str) -> Vec<String> {
        self.targets(rel_type).to_vec()
    }
}

/// Relationships of `ppt/presentation.xml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentationRels {
    pub theme: String,
    /// Slide parts ordered by slide number.
    pub slides: Vec<String>,
    pub slide_masters: Vec<String>,
    pub notes_master: Option<String>,
    pub handout_master: Option<String>,
    pub pres_props: Option<String>,
    pub view_props: Option<String>,
    pub table_styles: Option<String>,
    pub unknown_types: Vec<String>,
}

impl PresentationRels {
    const KNOWN: [&'static str; 9] = [
        "theme",
        "slide",
        "slideMaster",
        "notesMaster",
        "handoutMaster",
        "presProps",
        "viewProps",
        "tableStyles",
        "customXml",
    ];

    pub fn decode(set: &RelationshipSet) -> Result<Self> {
        let theme = set.optional("theme").ok_or(RecolorError::MissingTheme)?;

        let mut slides = set.list("slide");
        slides.sort_by_key(|s| slide_number(s));

        Ok(Self {
            theme,
            slides,
            slide_masters: set.list("slideMaster"),
            notes_master: set.optional("notesMaster"),
            handout_master: set.optional("handoutMaster"),
            pres_props: set.optional("presProps"),
            view_props: set.optional("viewProps"),
            table_styles: set.optional("tableStyles"),
            unknown_types: set.unknown_types("PresentationRels", &Self::KNOWN),
        })
    }
}

/// Relationships of a single slide part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideRels {
    pub slide_layout: String,
    pub notes_slide: Option<String>,
    pub images: Vec<String>,
    pub hyperlinks: Vec<String>,
    pub unknown_types: Vec<String>,
}

impl SlideRels {
    const KNOWN: [&'static str; 4] = ["slideLayout", "notesSlide", "image", "hyperlink"];

    pub fn decode(set: &RelationshipSet) -> Result<Self> {
        Ok(Self {
            slide_layout: set.required("slideLayout")?,
            notes_slide: set.optional("notesSlide"),
            images: set.list("image"),
            hyperlinks: set.list("hyperlink"),
            unknown_types: set.unknown_types("SlideRels", &Self::KNOWN),
        })
    }
}

/// Relationships of a slide layout part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideLayoutRels {
    pub slide_master: String,
    pub images: Vec<String>,
    pub unknown_types: Vec<String>,
}

impl SlideLayoutRels {
    const KNOWN: [&'static str; 2] = ["slideMaster", "image"];

    pub fn decode(set: &RelationshipSet) -> Result<Self> {
        Ok(Self {
            slide_master: set.required("slideMaster")?,
            images: set.list("image"),
            unknown_types: set.unknown_types("SlideLayoutRels", &Self::KNOWN),
        })
    }
}
