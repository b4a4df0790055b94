use crate::types::{FeatureMode, Token};

/// Projects tokens onto the non-empty lemma or POS values a comparison counts.
///
/// With `alphabetic_only`, lemma values containing anything other than letters
/// (punctuation, numerals, stray markup) are dropped as well.
pub fn feature_sequence(tokens: &[Token], mode: FeatureMode, alphabetic_only: bool) -> Vec<String> {
    tokens
        .iter()
        .filter_map(|token| token.feature(mode))
        .filter(|value| {
            mode != FeatureMode::Lemma || !alphabetic_only || value.chars().all(char::is_alphabetic)
        })
        .map(str::to_string)
        .collect()
}
