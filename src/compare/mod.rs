pub mod comparator;
pub mod frequency;

pub use comparator::{compare, compare_tables, rank_combined, ComparisonResult, FrequencyRow};
pub use frequency::FrequencyTable;
