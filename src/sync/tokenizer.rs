//! Lossless word/whitespace tokenization of paragraph text.

use serde::Serialize;

/// A run of either word characters or whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    pub is_word: bool,
}

impl Token {
    fn new(text: &str, is_word: bool) -> Self {
        Self {
            text: text.to_string(),
            is_word,
        }
    }
}

/// Split `text` into alternating word and whitespace tokens.
///
/// Concatenating the returned tokens reproduces `text` exactly.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut run_start = 0;
    let mut run_is_word: Option<bool> = None;

    for (idx, ch) in text.char_indices() {
        let is_word = !ch.is_whitespace();
        match run_is_word {
            Some(current) if current != is_word => {
                tokens.push(Token::new(&text[run_start..idx], current));
                run_start = idx;
                run_is_word = Some(is_word);
            }
            None => run_is_word = Some(is_word),
            _ => {}
        }
    }

    if let Some(current) = run_is_word {
        tokens.push(Token::new(&text[run_start..], current));
    }

    tokens
}

/// Whether a paragraph reads as a section heading.
///
/// Headings are short (fewer than `max_words` words), non-empty, and do not
/// end with a period.
pub fn is_heading(text: &str, max_words: usize) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty()
        && trimmed.split_whitespace().count() < max_words
        && !trimmed.ends_with('.')
}

/// Strip the double quotes that generated headings often arrive wrapped in.
pub fn clean_heading(text: &str) -> String {
    text.replace('"', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rebuild(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_words_and_spaces() {
        let tokens = tokenize("Know thyself,  friend.");
        let words: Vec<_> = tokens.iter().filter(|t| t.is_word).map(|t| t.text.as_str()).collect();

        assert_eq!(words, vec!["Know", "thyself,", "friend."]);
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[3], Token::new("  ", false));
    }

    #[test]
    fn test_tokenize_round_trip() {
        let samples = [
            "",
            " ",
            "word",
            "  leading and trailing  ",
            "tabs\tand\nnewlines\r\n",
            "unicode: ἀρετή  εὐδαιμονία\u{00a0}nbsp",
            "a",
            "\n\n",
        ];
        for sample in samples {
            assert_eq!(rebuild(&tokenize(sample)), sample, "round trip failed for {:?}", sample);
        }
    }

    #[test]
    fn test_tokens_alternate_and_are_non_empty() {
        let tokens = tokenize(" one  two three ");
        assert!(tokens.iter().all(|t| !t.text.is_empty()));
        for pair in tokens.windows(2) {
            assert_ne!(pair[0].is_word, pair[1].is_word);
        }
        assert!(!tokens[0].is_word);
        assert!(!tokens.last().unwrap().is_word);
    }

    #[test]
    fn test_empty_input_has_no_tokens() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_heading_detection() {
        assert!(is_heading("The Allegory of the Cave", 10));
        assert!(is_heading("  \"On Virtue\"  ", 10));
        assert!(!is_heading("A short sentence.", 10));
        assert!(!is_heading("   ", 10));
        assert!(!is_heading("one two three four five six seven eight nine ten", 10));
        assert!(is_heading("one two three four five six seven eight nine", 10));
    }

    #[test]
    fn test_clean_heading() {
        assert_eq!(clean_heading("\"On \"Virtue\"\""), "On Virtue");
    }
}
