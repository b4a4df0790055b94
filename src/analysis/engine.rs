use crate::error::Result;
use crate::types::Token;

/// Language identifier for Ancient Greek.
pub const ANCIENT_GREEK: &str = "grc";

/// A tokenizer/lemmatizer/tagger treated as a black box: text in, tokens out.
///
/// Implementations are expensive to construct and cheap to call. Build one per
/// process and pass the handle to every request that needs it.
pub trait LinguisticEngine {
    /// The language identifier this engine was initialised for.
    fn language(&self) -> &str;

    /// Analyses one piece of text. Failures are reported as `EngineUnavailable`.
    fn analyze(&self, text: &str) -> Result<Vec<Token>>;
}

impl<E: LinguisticEngine + ?Sized> LinguisticEngine for &E {
    fn language(&self) -> &str {
        (**self).language()
    }

    fn analyze(&self, text: &str) -> Result<Vec<Token>> {
        (**self).analyze(text)
    }
}

impl<E: LinguisticEngine + ?Sized> LinguisticEngine for Box<E> {
    fn language(&self) -> &str {
        (**self).language()
    }

    fn analyze(&self, text: &str) -> Result<Vec<Token>> {
        (**self).analyze(text)
    }
}
