use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::package::parts::PRESENTATION_PART;
use crate::package::{OoxmlPackage, PresentationRels};
use crate::settings::ConverterSettings;
use crate::slide::rewrite_slide;
use crate::theme::ColorScheme;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideReport {
    pub part: String,
    pub fills_injected: usize,
    pub colors_replaced: usize,
    pub unresolved: Vec<String>,
    pub modified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub theme_part: String,
    pub scheme_name: String,
    pub slides: Vec<SlideReport>,
}

impl ConversionReport {
    pub fn colors_replaced(&self) -> usize {
        self.slides.iter().map(|s| s.colors_replaced).sum()
    }

    pub fn fills_injected(&self) -> usize {
        self.slides.iter().map(|s| s.fills_injected).sum()
    }

    pub fn slides_modified(&self) -> usize {
        self.slides.iter().filter(|s| s.modified).count()
    }
}

pub struct Conversion {
    pub output: Vec<u8>,
    pub report: ConversionReport,
}

/// Flattens theme colors of a whole presentation package.
pub struct Converter {
    settings: ConverterSettings,
}

impl Converter {
    pub fn new(settings: ConverterSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ConverterSettings {
        &self.settings
    }

    /// Resolve the scheme of the theme the presentation points at.
    pub fn active_scheme(package: &OoxmlPackage) -> Result<(String, ColorScheme)> {
        let rels = package.read_relationships(PRESENTATION_PART)?;
        let presentation = PresentationRels::decode(&rels)?;
        let scheme = ColorScheme::from_document(&package.get_xml_part(&presentation.theme)?)?;
        Ok((presentation.theme, scheme))
    }

    pub fn convert_package(&self, package: &OoxmlPackage) -> Result<Conversion> {
        let (theme_part, scheme) = Self::active_scheme(package)?;
        tracing::info!(theme = %theme_part, scheme = %scheme.name, "resolved color scheme");

        let mut patches = HashMap::new();
        let mut slides = Vec::new();

        for part in package.slide_parts() {
            let rewrite = rewrite_slide(package.read_part(part)?, &scheme, &self.settings)?;
            let modified = rewrite.is_modified();
            tracing::debug!(
                part,
                fills = rewrite.fills_injected,
                colors = rewrite.colors_replaced,
                unresolved = rewrite.unresolved.len(),
                "rewrote slide"
            );

            slides.push(SlideReport {
                part: part.to_string(),
                fills_injected: rewrite.fills_injected,
                colors_replaced: rewrite.colors_replaced,
                unresolved: rewrite.unresolved,
                modified,
            });
            if modified {
                patches.insert(part.to_string(), rewrite.content.into_owned());
            }
        }

        let output = package.rebuild(&patches)?;
        let report = ConversionReport {
            theme_part,
            scheme_name: scheme.name,
            slides,
        };
        tracing::info!(
            slides = report.slides.len(),
            modified = report.slides_modified(),
            colors = report.colors_replaced(),
            "converted presentation"
        );

        Ok(Conversion { output, report })
    }

    pub fn convert_bytes(&self, input: &[u8]) -> Result<Conversion> {
        let package = OoxmlPackage::open(input)?;
        self.convert_package(&package)
    }

    /// Convert `input` and write the new package to `output`. Nothing is
    /// written when conversion fails.
    pub fn convert(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<ConversionReport> {
        let package = OoxmlPackage::from_file(input.as_ref())?;
        let conversion = self.convert_package(&package)?;
        std::fs::write(output.as_ref(), &conversion.output)?;
        Ok(conversion.report)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConverterSettings::default())
    }
}

/// Convert with default settings.
pub fn convert(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<ConversionReport> {
    Converter::default().convert(input, output)
}
