use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecolorError {
    #[error("Part '{part}' not found in package")]
    NotFound { part: String },

    #[error("Malformed PPTX package: {message}")]
    MalformedPackage { message: String },

    #[error("Presentation has no theme relationship")]
    MissingTheme,

    #[error("Unsupported color kind '{kind}' for scheme slot '{slot}'")]
    UnsupportedColorKind { slot: String, kind: String },

    #[error("Invalid theme: {message}")]
    InvalidTheme { message: String },

    #[error("XML parsing error at {location}: {message}")]
    XmlParse { message: String, location: String },

    #[error("XML serialization error: {0}")]
    XmlWrite(String),

    #[error("Invalid settings: {0}")]
    Settings(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

impl RecolorError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPackage {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_theme(message: impl Into<String>) -> Self {
        Self::InvalidTheme {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecolorError>;
