pub mod normalizer;
pub mod tei;

// Re-export the cleaning and extraction entry points for convenience
pub use normalizer::normalize;
pub use tei::extract_prose_text;
