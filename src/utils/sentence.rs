/// Punctuation that closes a sentence or clause while typing.
pub const CLAUSE_TERMINATORS: [char; 4] = ['.', '!', '?', ','];

/// Punctuation that ends a full sentence.
pub const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Detect if text ends with a clause boundary (sentence end or comma).
pub fn ends_with_clause_terminator(text: &str) -> bool {
    text.trim()
        .chars()
        .last()
        .map(|c| CLAUSE_TERMINATORS.contains(&c))
        .unwrap_or(false)
}

/// Detect if text ends with sentence-ending punctuation.
pub fn ends_with_sentence_terminator(text: &str) -> bool {
    text.trim()
        .chars()
        .last()
        .map(|c| SENTENCE_TERMINATORS.contains(&c))
        .unwrap_or(false)
}

/// Detect if text contains a finished sentence anywhere.
pub fn contains_sentence_terminator(text: &str) -> bool {
    text.contains(&SENTENCE_TERMINATORS[..])
}

/// Detect if text contains any clause boundary anywhere.
pub fn contains_clause_terminator(text: &str) -> bool {
    text.contains(&CLAUSE_TERMINATORS[..])
}

/// First segment of the text when split on sentence-ending punctuation.
pub fn first_sentence(text: &str) -> &str {
    text.split(&SENTENCE_TERMINATORS[..]).next().unwrap_or("")
}

/// Length in characters, the unit every assessment threshold is measured in.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_terminator_detection() {
        assert!(ends_with_clause_terminator("Hello world,"));
        assert!(ends_with_clause_terminator("Hello world.  "));
        assert!(!ends_with_clause_terminator("Hello world"));
        assert!(!ends_with_clause_terminator(""));

        assert!(ends_with_sentence_terminator("Done!"));
        assert!(!ends_with_sentence_terminator("almost,"));
    }

    #[test]
    fn contains_terminator_is_looser_than_trailing() {
        assert!(contains_sentence_terminator("One done. Two in progress"));
        assert!(!contains_sentence_terminator("no end in sight,"));
        assert!(contains_clause_terminator("no end in sight,"));
    }

    #[test]
    fn first_sentence_takes_text_before_first_boundary() {
        assert_eq!(first_sentence("Der Hund läuft schnell. Er bellt."), "Der Hund läuft schnell");
        assert_eq!(first_sentence("no terminator at all"), "no terminator at all");
        assert_eq!(first_sentence(""), "");
    }

    #[test]
    fn char_len_counts_characters_not_bytes() {
        assert_eq!(char_len("läuft"), 5);
        assert_eq!(char_len(""), 0);
    }
}
