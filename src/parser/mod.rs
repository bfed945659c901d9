//! Input parsing — XML documents into model descriptors.

pub mod class;
pub mod dom;

pub use class::parse_document;
