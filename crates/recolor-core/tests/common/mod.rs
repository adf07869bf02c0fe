//! Shared fixtures for integration tests.
//!
//! Decks are assembled in memory so no binary files live in the repo.

#![allow(dead_code)]


use std::io::{Cursor, Write};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

pub const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const P_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const PR_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Slot values used by [`DeckBuilder::new`].
pub const DEFAULT_SCHEME: [(&str, &str); 12] = [
    ("dk1", "sys:windowText:000000"),
    ("lt1", "sys:window:FFFFFF"),
    ("dk2", "44546A"),
    ("lt2", "E7E6E6"),
    ("accent1", "4472C4"),
    ("accent2", "ED7D31"),
    ("accent3", "A5A5A5"),
    ("accent4", "FFC000"),
    ("accent5", "5B9BD5"),
    ("accent6", "70AD47"),
    ("hlink", "0563C1"),
    ("folHlink", "954F72"),
];

/// Builds a minimal but complete presentation package.
pub struct DeckBuilder {
    slides: Vec<String>,
    scheme: Vec<(String, String)>,
    include_theme: bool,
    include_theme_part: bool,
    include_presentation_rels: bool,
    directory_entries: bool,
}

impl DeckBuilder {
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            scheme: DEFAULT_SCHEME
                .iter()
                .map(|(slot, value)| (slot.to_string(), value.to_string()))
                .collect(),
            include_theme: true,
            include_theme_part: true,
            include_presentation_rels: true,
            directory_entries: false,
        }
    }

    /// Add a slide whose shape tree holds `shapes` verbatim.
    pub fn slide(mut self, shapes: &str) -> Self {
        self.slides.push(slide_xml(shapes));
        self
    }

    /// Add a slide part with exactly this content.
    pub fn raw_slide(mut self, xml: &str) -> Self {
        self.slides.push(xml.to_string());
        self
    }

    /// Override one slot. `sys:<name>:<hex>` produces an `a:sysClr`, anything
    /// starting with `<` is inserted as raw XML, the rest becomes `a:srgbClr`.
    pub fn color(mut self, slot: &str, value: &str) -> Self {
        if let Some(entry) = self.scheme.iter_mut().find(|(s, _)| s == slot) {
            entry.1 = value.to_string();
        }
        self
    }

    /// Drop the theme relationship from the presentation.
    pub fn without_theme_relationship(mut self) -> Self {
        self.include_theme = false;
        self
    }

    /// Keep the theme relationship but leave the part out of the archive.
    pub fn without_theme_part(mut self) -> Self {
        self.include_theme_part = false;
        self
    }

    pub fn without_presentation_rels(mut self) -> Self {
        self.include_presentation_rels = false;
        self
    }

    pub fn with_directory_entries(mut self) -> Self {
        self.directory_entries = true;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let add = |zip: &mut ZipWriter<&mut Cursor<Vec<u8>>>, name: &str, content: &str| {
            zip.start_file(name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        };

        add(&mut zip, "[Content_Types].xml", &self.content_types());
        if self.directory_entries {
            zip.add_directory("_rels/", options).unwrap();
        }
        add(&mut zip, "_rels/.rels", &package_rels());
        add(&mut zip, "docProps/app.xml", APP_XML);
        add(&mut zip, "ppt/presentation.xml", &self.presentation());
        if self.include_presentation_rels {
            add(&mut zip, "ppt/_rels/presentation.xml.rels", &self.presentation_rels());
        }
        if self.directory_entries {
            zip.add_directory("ppt/slides/", options).unwrap();
        }
        for (i, slide) in self.slides.iter().enumerate() {
            let n = i + 1;
            add(&mut zip, &format!("ppt/slides/slide{}.xml", n), slide);
            add(
                &mut zip,
                &format!("ppt/slides/_rels/slide{}.xml.rels", n),
                &rels(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
            );
        }
        add(&mut zip, "ppt/slideLayouts/slideLayout1.xml", &layout_xml());
        add(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
        );
        add(&mut zip, "ppt/slideMasters/slideMaster1.xml", &master_xml());
        add(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &rels(&[
                ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                ("rId2", "theme", "../theme/theme1.xml"),
            ]),
        );
        if self.include_theme_part {
            add(&mut zip, "ppt/theme/theme1.xml", &self.theme_xml());
        }

        zip.finish().unwrap();
        buffer.into_inner()
    }

    fn content_types(&self) -> String {
        let mut overrides = String::new();
        for i in 1..=self.slides.len() {
            overrides.push_str(&format!(
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                i
            ));
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>{}</Types>"#,
            overrides
        )
    }

    fn presentation(&self) -> String {
        let ids: String = (0..self.slides.len())
            .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, 10 + i))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/></p:presentation>"#,
            A_NS, R_NS, P_NS, ids
        )
    }

    fn presentation_rels(&self) -> String {
        let mut entries = vec![("rId1".to_string(), "slideMaster", "slideMasters/slideMaster1.xml".to_string())];
        if self.include_theme {
            entries.push(("rId2".to_string(), "theme", "theme/theme1.xml".to_string()));
        }
        // Listed in reverse slide order.
        for i in (0..self.slides.len()).rev() {
            entries.push((format!("rId{}", 10 + i), "slide", format!("slides/slide{}.xml", i + 1)));
        }
        let borrowed: Vec<(&str, &str, &str)> = entries
            .iter()
            .map(|(id, kind, target)| (id.as_str(), *kind, target.as_str()))
            .collect();
        rels(&borrowed)
    }

    fn theme_xml(&self) -> String {
        let slots: String = self
            .scheme
            .iter()
            .map(|(slot, value)| format!("<a:{0}>{1}</a:{0}>", slot, color_element(value)))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="{}" name="Office Theme"><a:themeElements><a:clrScheme name="Office">{}</a:clrScheme><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri Light"/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/></a:minorFont></a:fontScheme></a:themeElements></a:theme>"#,
            A_NS, slots
        )
    }
}

impl Default for DeckBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn color_element(value: &str) -> String {
    if value.starts_with('<') {
        return value.to_string();
    }
    if let Some(rest) = value.strip_prefix("sys:") {
        let (name, last) = rest.split_once(':').unwrap_or((rest, "000000"));
        return format!(r#"<a:sysClr val="{}" lastClr="{}"/>"#, name, last);
    }
    format!(r#"<a:srgbClr val="{}"/>"#, value)
}

/// Wrap `shapes` in a PresentationML slide.
pub fn slide_xml(shapes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}</p:spTree></p:cSld></p:sld>"#,
        A_NS, R_NS, P_NS, shapes
    )
}

/// A text box with one paragraph of runs.
pub fn text_shape(runs: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="TextBox 1"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/><a:p>{}</a:p></p:txBody></p:sp>"#,
        runs
    )
}

/// A run with the given `a:rPr` children.
pub fn run(properties: &str, text: &str) -> String {
    format!(
        r#"<a:r><a:rPr lang="en-US" dirty="0">{}</a:rPr><a:t>{}</a:t></a:r>"#,
        properties, text
    )
}

pub fn scheme_fill(slot: &str) -> String {
    format!(r#"<a:solidFill><a:schemeClr val="{}"/></a:solidFill>"#, slot)
}

pub fn rgb_fill(hex: &str) -> String {
    format!(r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, hex)
}

pub fn rels(entries: &[(&str, &str, &str)]) -> String {
    let body: String = entries
        .iter()
        .map(|(id, kind, target)| {
            format!(
                r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
                id, REL_BASE, kind, target
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{}">{}</Relationships>"#,
        PR_NS, body
    )
}

fn package_rels() -> String {
    rels(&[
        ("rId1", "officeDocument", "ppt/presentation.xml"),
        ("rId2", "extended-properties", "docProps/app.xml"),
    ])
}

fn layout_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" type="blank"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld></p:sldLayout>"#,
        A_NS, R_NS, P_NS
    )
}

fn master_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/></p:sldMaster>"#,
        A_NS, R_NS, P_NS
    )
}

const APP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>Microsoft Office PowerPoint</Application></Properties>"#;

/// Read every entry of an archive, in order.
pub fn read_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            (file.name().to_string(), content)
        })
        .collect()
}

pub fn read_entry(bytes: &[u8], name: &str) -> Vec<u8> {
    read_entries(bytes)
        .into_iter()
        .find(|(n, _)| n == name)
        .map(|(_, content)| content)
        .unwrap_or_else(|| panic!("entry {} not found", name))
}

pub fn read_entry_string(bytes: &[u8], name: &str) -> String {
    String::from_utf8(read_entry(bytes, name)).unwrap()
}
