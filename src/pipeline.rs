use serde::Serialize;
use std::num::NonZeroUsize;
use tracing::info;

use crate::analysis::{analyze, feature_sequence, CommandEngine, LinguisticEngine, StubEngine};
use crate::compare::{compare_tables, rank_combined, ComparisonResult, FrequencyRow, FrequencyTable};
use crate::config::{Config, EngineConfig, EngineKind};
use crate::error::Result;
use crate::loader::{prepare_text, CleaningOptions};
use crate::types::{FeatureMode, RawDocument, Token};

/// Starts the engine described by the configuration. This is the expensive step;
/// do it once and share the handle.
pub fn build_engine(config: &EngineConfig) -> Result<Box<dyn LinguisticEngine>> {
    match config.kind {
        EngineKind::Command => Ok(Box::new(CommandEngine::spawn(
            &config.program,
            &config.args,
            &config.language,
        )?)),
        EngineKind::Stub => {
            info!(language = %config.language, "using the stub engine");
            Ok(Box::new(StubEngine::new(config.language.clone())))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub cleaning: CleaningOptions,
    pub chunk_size: Option<NonZeroUsize>,
    pub alphabetic_lemmas_only: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        PipelineSettings {
            cleaning: CleaningOptions::default(),
            chunk_size: None,
            alphabetic_lemmas_only: true,
        }
    }
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        PipelineSettings {
            cleaning: CleaningOptions {
                clean: config.analysis.clean_text,
                strip_punctuation: config.analysis.strip_punctuation,
            },
            chunk_size: config.chunk_size(),
            alphabetic_lemmas_only: config.analysis.alphabetic_lemmas_only,
        }
    }
}

/// Everything one comparison request produces.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ComparisonReport {
    pub mode: FeatureMode,
    pub top_n: usize,
    #[serde(flatten)]
    pub result: ComparisonResult,
    /// Union of both vocabularies ranked by combined count, truncated to `top_n`.
    pub combined: Vec<FrequencyRow>,
    pub frequencies_a: FrequencyTable,
    pub frequencies_b: FrequencyTable,
}

/// Runs load → clean → analyse → count → compare for one request at a time over
/// an engine handle owned by the caller.
pub struct Pipeline<E> {
    engine: E,
    settings: PipelineSettings,
}

impl<E: LinguisticEngine> Pipeline<E> {
    pub fn new(engine: E, settings: PipelineSettings) -> Self {
        Pipeline { engine, settings }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn prepare(&self, document: &RawDocument) -> String {
        prepare_text(document, self.settings.cleaning)
    }

    pub fn analyze_document(&self, document: &RawDocument) -> Result<Vec<Token>> {
        let text = self.prepare(document);
        info!(
            origin = %document.origin().map(|p| p.display().to_string()).unwrap_or_else(|| "<text>".into()),
            chars = text.chars().count(),
            "analysing document"
        );
        analyze(&self.engine, &text, self.settings.chunk_size)
    }

    pub fn features(&self, document: &RawDocument, mode: FeatureMode) -> Result<Vec<String>> {
        let tokens = self.analyze_document(document)?;
        Ok(feature_sequence(
            &tokens,
            mode,
            self.settings.alphabetic_lemmas_only,
        ))
    }

    /// Compares two documents. An empty document yields an empty frequency table
    /// rather than an error.
    pub fn compare_documents(
        &self,
        a: &RawDocument,
        b: &RawDocument,
        mode: FeatureMode,
        top_n: usize,
    ) -> Result<ComparisonReport> {
        let frequencies_a = FrequencyTable::from_features(self.features(a, mode)?);
        let frequencies_b = FrequencyTable::from_features(self.features(b, mode)?);
        let result = compare_tables(&frequencies_a, &frequencies_b, top_n);
        let combined = rank_combined(&frequencies_a, &frequencies_b, top_n);
        info!(
            %mode,
            shared = result.shared.len(),
            unique_a = result.unique_to_a.len(),
            unique_b = result.unique_to_b.len(),
            "comparison complete"
        );
        Ok(ComparisonReport {
            mode,
            top_n,
            result,
            combined,
            frequencies_a,
            frequencies_b,
        })
    }
}
