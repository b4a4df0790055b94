//! Cleaning, analysis and lemma frequency comparison for Ancient Greek texts.
//!
//! Raw text or TEI markup is extracted and normalized, sent through an injected
//! [`LinguisticEngine`], projected onto lemma or part-of-speech sequences and
//! compared as frequency tables.

// Declare all modules that are part of this library
pub mod analysis;
pub mod compare;
pub mod config;
pub mod error;
pub mod loader;
pub mod parsing;
pub mod pipeline;
pub mod report;
pub mod types;

// Re-export the items front-ends reach for most
pub use analysis::{analyze, LinguisticEngine};
pub use compare::{compare, ComparisonResult, FrequencyRow, FrequencyTable};
pub use config::Config;
pub use error::{MaccabyteError, Result};
pub use parsing::{extract_prose_text, normalize};
pub use pipeline::{build_engine, ComparisonReport, Pipeline, PipelineSettings};
pub use types::{FeatureMode, RawDocument, Token};
