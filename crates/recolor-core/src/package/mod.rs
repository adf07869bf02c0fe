pub mod ooxml;
pub mod parts;
pub mod relationships;

pub use ooxml::OoxmlPackage;
pub use relationships::{
    PresentationRels, Relationship, RelationshipSet, SlideLayoutRels, SlideRels, TargetMode,
};
