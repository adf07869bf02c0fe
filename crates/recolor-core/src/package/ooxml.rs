use crate::error::{RecolorError, Result};
use crate::xml::XmlDocument;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use super::parts::{is_slide_part, is_theme_part, relationships_part_for, slide_number};
use super::relationships::RelationshipSet;

#[derive(Debug, Clone)]
struct PackagePart {
    name: String,
    content: Vec<u8>,
    is_dir: bool,
}

/// An OOXML package held in memory, parts kept in archive order.
pub struct OoxmlPackage {
    parts: Vec<PackagePart>,
    index: HashMap<String, usize>,
}

impl OoxmlPackage {
    pub fn open(bytes: &[u8]) -> Result<Self> {
        let cursor = Cursor::new(bytes);
        let mut archive = ZipArchive::new(cursor)
            .map_err(|e| RecolorError::malformed(format!("cannot open archive: {}", e)))?;

        let mut parts = Vec::with_capacity(archive.len());
        let mut index = HashMap::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| RecolorError::malformed(format!("cannot read entry {}: {}", i, e)))?;
            let name = file.name().to_string();
            let is_dir = file.is_dir();
            let mut content = Vec::new();
            if !is_dir {
                file.read_to_end(&mut content).map_err(|e| {
                    RecolorError::malformed(format!("cannot read entry '{}': {}", name, e))
                })?;
            }
            index.insert(name.clone(), parts.len());
            parts.push(PackagePart {
                name,
                content,
                is_dir,
            });
        }

        tracing::debug!(parts = parts.len(), "opened package");
        Ok(Self { parts, index })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open(&bytes)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    pub fn get_part(&self, path: &str) -> Option<&[u8]> {
        self.index
            .get(path)
            .map(|&i| self.parts[i].content.as_slice())
    }

    pub fn read_part(&self, path: &str) -> Result<&[u8]> {
        self.get_part(path).ok_or_else(|| RecolorError::NotFound {
            part: path.to_string(),
        })
    }

    pub fn get_xml_part(&self, path: &str) -> Result<XmlDocument> {
        crate::xml::parser::parse_bytes(self.read_part(path)?)
    }

    /// Part names in archive order, directory entries included.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Parse the `.rels` companion of `owner`. A missing relationship part
    /// makes the package malformed.
    pub fn read_relationships(&self, owner: &str) -> Result<RelationshipSet> {
        let rels_path = relationships_part_for(owner);
        let bytes = self.get_part(&rels_path).ok_or_else(|| {
            RecolorError::malformed(format!("missing relationship part '{}'", rels_path))
        })?;
        let doc = crate::xml::parser::parse_bytes(bytes)?;
        let set = RelationshipSet::from_document(owner, &doc)?;

        for rel in set.relationships() {
            if rel.target_mode == super::TargetMode::Internal && !self.contains(&rel.target) {
                tracing::warn!(
                    owner,
                    target = %rel.target,
                    rel_type = %rel.rel_type,
                    "relationship target missing from package"
                );
            }
        }

        Ok(set)
    }

    /// Every `ppt/slides/slide<N>.xml` part, ordered by slide number.
    pub fn slide_parts(&self) -> Vec<&str> {
        let mut slides: Vec<&str> = self.part_names().filter(|n| is_slide_part(n)).collect();
        slides.sort_by_key(|n| slide_number(n));
        slides
    }

    pub fn theme_parts(&self) -> Vec<&str> {
        self.part_names().filter(|n| is_theme_part(n)).collect()
    }

    /// Write a new archive with the same parts in the same order. Slide parts
    /// with an entry in `patches` get the patched bytes; every other part is
    /// copied unchanged.
    pub fn rebuild(&self, patches: &HashMap<String, Vec<u8>>) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let mut writer = ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for part in &self.parts {
            if part.is_dir {
                writer.add_directory(part.name.as_str(), options)?;
                continue;
            }

            let content = match patches.get(&part.name) {
                Some(patched) if is_slide_part(&part.name) => patched.as_slice(),
                _ => part.content.as_slice(),
            };
            writer.start_file(part.name.as_str(), options)?;
            writer.write_all(content)?;
        }

        writer.finish()?;
        Ok(buffer.into_inner())
    }

    pub fn save(&self) -> Result<Vec<u8>> {
        self.rebuild(&HashMap::new())
    }
}
