use std::collections::HashMap;
use std::num::NonZeroUsize;
use tracing::debug;

use super::adapter::analyze;
use super::engine::LinguisticEngine;
use crate::error::Result;
use crate::types::Token;

/// Caller-owned memo of analysis results, keyed on the exact text and chunk size.
///
/// The adapter itself never caches; front-ends that re-run the same input keep
/// one of these next to their engine handle. Failures are not cached.
#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: HashMap<(String, Option<NonZeroUsize>), Vec<Token>>,
    hits: u64,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze<E>(
        &mut self,
        engine: &E,
        text: &str,
        chunk_size: Option<NonZeroUsize>,
    ) -> Result<&[Token]>
    where
        E: LinguisticEngine + ?Sized,
    {
        let key = (text.to_string(), chunk_size);
        if self.entries.contains_key(&key) {
            self.hits += 1;
            debug!(hits = self.hits, "analysis cache hit");
        } else {
            let tokens = analyze(engine, text, chunk_size)?;
            self.entries.insert(key.clone(), tokens);
        }
        Ok(self.entries.get(&key).map(Vec::as_slice).unwrap_or(&[]))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
    }
}
