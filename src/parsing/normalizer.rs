use once_cell::sync::Lazy;
use regex::Regex;

// Applied in this order: verse prefixes and parenthesised numbers go before
// bare digits so `(12)` never leaves empty parentheses behind.
static VERSE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*\d+\s+").expect("verse prefix pattern"));
static PAREN_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\d+\)").expect("parenthesised number pattern"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit pattern"));
static PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("[{}]", regex::escape(PUNCTUATION_MARKS))).expect("punctuation pattern")
});
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Characters removed when punctuation stripping is on.
pub const PUNCTUATION_MARKS: &str = "·.,;:!?“”‘’'\"()[]«»";

/// Cleans Greek biblical or classical text.
///
/// Removes verse numbers at line starts, parenthesised numbers and any other
/// digit runs; optionally removes Western and Greek punctuation (high dot and
/// typographic quotes included); finally collapses every whitespace run to a
/// single space and trims both ends. Characters outside those sets pass
/// through untouched, and the result is idempotent.
pub fn normalize(text: &str, strip_punctuation: bool) -> String {
    let cleaned = VERSE_PREFIX.replace_all(text, "");
    let cleaned = PAREN_NUMBER.replace_all(&cleaned, "");
    let cleaned = DIGITS.replace_all(&cleaned, "");
    let cleaned = if strip_punctuation {
        PUNCTUATION.replace_all(&cleaned, "")
    } else {
        cleaned
    };
    WHITESPACE.replace_all(&cleaned, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_verse_markers_and_punctuation() {
        assert_eq!(
            normalize("12 Ἐν ἀρχῇ (3) ἦν ὁ λόγος.", true),
            "Ἐν ἀρχῇ ἦν ὁ λόγος"
        );
    }

    #[test]
    fn verse_prefix_is_removed_on_every_line() {
        let raw = "1 καὶ ἐγένετο\n2 μετὰ τὸ πατάξαι\n  3 Ἀλέξανδρον";
        assert_eq!(
            normalize(raw, true),
            "καὶ ἐγένετο μετὰ τὸ πατάξαι Ἀλέξανδρον"
        );
    }

    #[test]
    fn punctuation_is_kept_when_not_requested() {
        assert_eq!(
            normalize("«ὁ λόγος·» (4) τί;", false),
            "«ὁ λόγος·» τί;"
        );
    }

    #[test]
    fn greek_marks_and_quotes_are_removed() {
        assert_eq!(normalize("“ὁ” ‘θεὸς’ «λέγει»· [ναί]!", true), "ὁ θεὸς λέγει ναί");
    }

    #[test]
    fn empty_and_blank_inputs_yield_empty_output() {
        assert_eq!(normalize("", true), "");
        assert_eq!(normalize(" \n\t ", false), "");
        assert_eq!(normalize("12 (3) 45", true), "");
    }

    #[test]
    fn unknown_characters_pass_through() {
        assert_eq!(normalize("ἀ—β ✠ γ", true), "ἀ—β ✠ γ");
    }

    proptest! {
        #[test]
        fn stripped_output_has_no_punctuation(
            s in "[ ·.,;:!?“”‘’'\"()\\[\\]«»0-9α-ωἀ-ὧ\n]{0,120}"
        ) {
            let out = normalize(&s, true);
            prop_assert!(!out.chars().any(|c| PUNCTUATION_MARKS.contains(c)), "left punctuation in {:?}", out);
        }

        #[test]
        fn normalize_is_idempotent(s in ".{0,200}", strip in any::<bool>()) {
            let once = normalize(&s, strip);
            prop_assert_eq!(normalize(&once, strip), once);
        }

        #[test]
        fn output_has_no_double_or_edge_spaces(s in "[ \\t\\n0-9a-zα-ω().·;]{0,120}", strip in any::<bool>()) {
            let out = normalize(&s, strip);
            prop_assert!(!out.contains("  "));
            prop_assert!(!out.starts_with(' '));
            prop_assert!(!out.ends_with(' '));
        }

        #[test]
        fn output_never_contains_digits(s in ".{0,120}") {
            let out = normalize(&s, false);
            prop_assert!(!out.chars().any(|c| c.is_ascii_digit()));
        }
    }
}
