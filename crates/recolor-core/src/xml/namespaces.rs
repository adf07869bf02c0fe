#![allow(non_snake_case)]

use super::xname::XName;

/// DrawingML main namespace (`a:`), which carries every color definition.
pub mod A {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

    pub fn theme() -> XName { XName::new(NS, "theme") }
    pub fn themeElements() -> XName { XName::new(NS, "themeElements") }
    pub fn clrScheme() -> XName { XName::new(NS, "clrScheme") }
    pub fn srgbClr() -> XName { XName::new(NS, "srgbClr") }
    pub fn schemeClr() -> XName { XName::new(NS, "schemeClr") }
    pub fn p() -> XName { XName::new(NS, "p") }
    pub fn r() -> XName { XName::new(NS, "r") }
    pub fn t() -> XName { XName::new(NS, "t") }
    pub fn rPr() -> XName { XName::new(NS, "rPr") }
    pub fn ln() -> XName { XName::new(NS, "ln") }
    pub fn latin() -> XName { XName::new(NS, "latin") }
    pub fn solidFill() -> XName { XName::new(NS, "solidFill") }

    /// Local names of the fill choices allowed inside `a:rPr`.
    pub const FILL_KINDS: [&str; 6] = [
        "noFill", "solidFill", "gradFill", "blipFill", "pattFill", "grpFill",
    ];
}

/// Package relationship parts (`_rels/*.rels`).
pub mod PR {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

    pub fn Relationship() -> XName { XName::new(NS, "Relationship") }
}

pub mod XMLNS {
    pub const NS: &str = "http://www.w3.org/2000/xmlns/";
}

pub mod XML {
    pub const NS: &str = "http://www.w3.org/XML/1998/namespace";
}
