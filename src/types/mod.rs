pub mod document;
pub mod token;

pub use document::{RawDocument, SourceKind};
pub use token::{FeatureMode, Token};
