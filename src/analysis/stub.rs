use std::collections::HashMap;

use super::engine::LinguisticEngine;
use crate::error::Result;
use crate::types::Token;

#[derive(Debug, Clone)]
struct LexiconEntry {
    lemma: String,
    pos: Option<String>,
}

/// Deterministic in-process engine used for tests and offline dry runs.
///
/// Splits on whitespace. Surface forms found in the lexicon take its lemma and
/// tag; any other word containing a letter is its own lowercased lemma with no
/// tag, and words without letters get neither.
#[derive(Debug, Clone, Default)]
pub struct StubEngine {
    language: String,
    lexicon: HashMap<String, LexiconEntry>,
}

impl StubEngine {
    pub fn new(language: impl Into<String>) -> Self {
        StubEngine {
            language: language.into(),
            lexicon: HashMap::new(),
        }
    }

    pub fn with_entry(
        mut self,
        surface: impl Into<String>,
        lemma: impl Into<String>,
        pos: Option<&str>,
    ) -> Self {
        self.lexicon.insert(
            surface.into(),
            LexiconEntry {
                lemma: lemma.into(),
                pos: pos.map(str::to_string),
            },
        );
        self
    }

    fn analyze_word(&self, word: &str) -> Token {
        let token = Token::new(word);
        match self.lexicon.get(word) {
            Some(entry) => {
                let token = token.with_lemma(entry.lemma.clone());
                match &entry.pos {
                    Some(pos) => token.with_pos(pos.clone()),
                    None => token,
                }
            }
            None if word.chars().any(char::is_alphabetic) => token.with_lemma(word.to_lowercase()),
            None => token,
        }
    }
}

impl LinguisticEngine for StubEngine {
    fn language(&self) -> &str {
        &self.language
    }

    fn analyze(&self, text: &str) -> Result<Vec<Token>> {
        Ok(text
            .split_whitespace()
            .map(|word| self.analyze_word(word))
            .collect())
    }
}
