use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RecolorError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    /// Give text runs without a fill an explicit `tx1` fill before
    /// substitution, so inherited text color is flattened too.
    pub inject_default_text_fill: bool,
    /// Write rewritten slide parts with CR+LF line endings.
    pub crlf_line_endings: bool,
    /// Appended to the input file stem to name the default output.
    pub output_suffix: String,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            inject_default_text_fill: true,
            crlf_line_endings: true,
            output_suffix: "_rgb".to_string(),
        }
    }
}

impl ConverterSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| RecolorError::Settings(e.to_string()))
    }
}
