pub mod adapter;
pub mod cache;
pub mod command;
pub mod engine;
pub mod features;
pub mod stub;

// Re-export the engine seam and the adapter entry points
pub use adapter::{analyze, chunk_windows};
pub use cache::AnalysisCache;
pub use command::CommandEngine;
pub use engine::{LinguisticEngine, ANCIENT_GREEK};
pub use features::feature_sequence;
pub use stub::StubEngine;
