use std::num::NonZeroUsize;
use tracing::debug;

use super::engine::LinguisticEngine;
use crate::error::Result;
use crate::types::Token;

/// Splits `text` into consecutive windows of `size` characters; the last may be shorter.
pub fn chunk_windows(text: &str, size: NonZeroUsize) -> Vec<&str> {
    let size = size.get();
    let mut windows = Vec::with_capacity(text.len() / size + 1);
    let mut start = 0;
    for (count, (idx, _)) in text.char_indices().enumerate() {
        if count > 0 && count % size == 0 {
            windows.push(&text[start..idx]);
            start = idx;
        }
    }
    if start < text.len() {
        windows.push(&text[start..]);
    }
    windows
}

/// Runs `text` through the engine, optionally in fixed-size character windows.
///
/// Windows are analysed independently and in order, and their tokens are
/// concatenated in window order. A word straddling a window edge is tokenized as
/// two fragments. Empty input never reaches the engine.
pub fn analyze<E>(engine: &E, text: &str, chunk_size: Option<NonZeroUsize>) -> Result<Vec<Token>>
where
    E: LinguisticEngine + ?Sized,
{
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let windows = match chunk_size {
        Some(size) => chunk_windows(text, size),
        None => vec![text],
    };
    debug!(
        windows = windows.len(),
        chars = text.chars().count(),
        language = engine.language(),
        "analysing text"
    );

    let mut tokens = Vec::new();
    for (idx, window) in windows.iter().enumerate() {
        let window_tokens = engine.analyze(window)?;
        debug!(window = idx, tokens = window_tokens.len(), "window analysed");
        tokens.extend(window_tokens);
    }
    Ok(tokens)
}
