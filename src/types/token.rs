use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::MaccabyteError;

/// One analysed token as reported by the linguistic engine.
///
/// `lemma` and `pos` are optional because the engine may fail to resolve
/// proper nouns, OCR artifacts or foreign fragments.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Token {
    #[serde(rename = "string")]
    pub surface: String,
    #[serde(default)]
    pub lemma: Option<String>,
    #[serde(default)]
    pub pos: Option<String>,
    #[serde(default)]
    pub features: BTreeMap<String, String>,
}

impl Token {
    pub fn new(surface: impl Into<String>) -> Self {
        Token {
            surface: surface.into(),
            ..Default::default()
        }
    }

    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    pub fn with_pos(mut self, pos: impl Into<String>) -> Self {
        self.pos = Some(pos.into());
        self
    }

    pub fn with_feature(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.features.insert(name.into(), value.into());
        self
    }

    /// The value this token contributes to a feature sequence, if any.
    pub fn feature(&self, mode: FeatureMode) -> Option<&str> {
        let value = match mode {
            FeatureMode::Lemma => self.lemma.as_deref(),
            FeatureMode::Pos => self.pos.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} POS: {}, Lemma: {}, Morph: {{",
            self.surface,
            self.pos.as_deref().unwrap_or("-"),
            self.lemma.as_deref().unwrap_or("-"),
        )?;
        for (idx, (name, value)) in self.features.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_str("}")
    }
}

/// Which token attribute a comparison counts.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeatureMode {
    #[default]
    Lemma,
    Pos,
}

impl FeatureMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureMode::Lemma => "lemma",
            FeatureMode::Pos => "pos",
        }
    }
}

impl fmt::Display for FeatureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureMode {
    type Err = MaccabyteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lemma" => Ok(FeatureMode::Lemma),
            "pos" => Ok(FeatureMode::Pos),
            _ => Err(MaccabyteError::InvalidMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("lemma".parse::<FeatureMode>().unwrap(), FeatureMode::Lemma);
        assert_eq!("POS".parse::<FeatureMode>().unwrap(), FeatureMode::Pos);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = "morph".parse::<FeatureMode>().unwrap_err();
        assert!(matches!(err, MaccabyteError::InvalidMode(ref m) if m == "morph"));
    }

    #[test]
    fn empty_feature_values_count_as_missing() {
        let token = Token::new("καί").with_lemma("").with_pos("CCONJ");
        assert_eq!(token.feature(FeatureMode::Lemma), None);
        assert_eq!(token.feature(FeatureMode::Pos), Some("CCONJ"));
    }

    #[test]
    fn deserializes_engine_wire_shape() {
        let token: Token = serde_json::from_str(
            r#"{"string": "λόγος", "lemma": "λόγος", "pos": "NOUN", "features": {"Case": "Nom"}}"#,
        )
        .unwrap();
        assert_eq!(token.surface, "λόγος");
        assert_eq!(token.features.get("Case").map(String::as_str), Some("Nom"));

        let bare: Token = serde_json::from_str(r#"{"string": "Ἰούδας"}"#).unwrap();
        assert_eq!(bare.lemma, None);
        assert!(bare.features.is_empty());
    }

    #[test]
    fn display_matches_analysis_line_format() {
        let token = Token::new("ἦν")
            .with_lemma("εἰμί")
            .with_pos("VERB")
            .with_feature("Mood", "Ind")
            .with_feature("Tense", "Imp");
        assert_eq!(
            token.to_string(),
            "ἦν POS: VERB, Lemma: εἰμί, Morph: {Mood: Ind, Tense: Imp}"
        );
        assert_eq!(Token::new("ς").to_string(), "ς POS: -, Lemma: -, Morph: {}");
    }
}
