//! Code point tokenization.
//!
//! There is no learned vocabulary: each Unicode scalar value is its own token ID. The model
//! folds IDs into its vocabulary with `id % vocab_size`, so any text is accepted.

/// Maps each `char` of `text` to its Unicode scalar value.
pub fn string_to_tokens(text: &str) -> Vec<usize> {
    text.chars().map(|c| c as usize).collect()
}

/// Inverse of [`string_to_tokens`]. IDs that are not valid scalar values become `U+FFFD`.
pub fn tokens_to_string(tokens: &[usize]) -> String {
    tokens
        .iter()
        .map(|&t| {
            u32::try_from(t)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER)
        })
        .collect()
}
