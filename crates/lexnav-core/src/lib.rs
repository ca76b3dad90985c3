//! Core statute types and document loading for lexnav.

mod error;
pub mod load;
pub mod model;

pub use error::LoadError;
pub use load::DocumentSource;
#[cfg(feature = "http")]
pub use load::fetch_document;
pub use model::{
    Act, Chapter, DanglingReference, Document, DocumentStats, QuickReference, QuickReferenceEntry,
    Section, SectionPath,
};
