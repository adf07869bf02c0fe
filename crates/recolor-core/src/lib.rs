pub mod convert;
pub mod error;
pub mod package;
pub mod settings;
pub mod slide;
pub mod theme;
pub mod xml;

pub use convert::{convert, Conversion, ConversionReport, Converter, SlideReport};
pub use error::{RecolorError, Result};
pub use package::OoxmlPackage;
pub use settings::ConverterSettings;
pub use slide::{inspect_runs, rewrite_slide, RunFill, RunInfo, SlideRewrite};
pub use theme::{ColorScheme, ColorValue, SchemeSlot};
