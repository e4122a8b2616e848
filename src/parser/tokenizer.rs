//! Tokenizer splitting text into separator runs and values.
//!
//! This module provides [Tokenizer], a lazy one-pass iterator over [Token]s.
//! Given a fixed set of (ASCII) separator bytes, the input is cut into maximal
//! runs of separators and maximal runs of everything else. No interpretation
//! happens here: the run `),(` is delivered as one token and it is up to the
//! consumer to look at its characters one by one, while labels, comment text,
//! numbers, and stray whitespace arrive as single value tokens.
//!
//! Tokenizing never fails.

// =#========================================================================#=
// TOKEN
// =#========================================================================$=
/// Tag of a [Token].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Maximal run of separator characters
    Separators,
    /// Maximal run of non-separator characters
    Value,
}

/// A slice of the input together with its [TokenKind] and start offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    kind: TokenKind,
    text: &'a str,
    position: usize,
}

impl<'a> Token<'a> {
    /// Returns the kind of this token.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the text of this token.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Returns the byte offset of the first character of this token.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the byte offset just past the last character of this token.
    pub fn end(&self) -> usize {
        self.position + self.text.len()
    }

    /// Returns `true` if this token is a separator run.
    pub fn is_separators(&self) -> bool {
        self.kind == TokenKind::Separators
    }
}

// =#========================================================================#=
// TOKENIZER
// =#========================================================================$=
/// Lazy iterator over the [Token]s of a string.
///
/// # Example
/// ```
/// use newick_arena::parser::tokenizer::{TokenKind, Tokenizer};
///
/// let tokens: Vec<_> = Tokenizer::new("(A,B)C;", b"(),;")
///     .map(|t| (t.kind(), t.text()))
///     .collect();
/// assert_eq!(tokens[0], (TokenKind::Separators, "("));
/// assert_eq!(tokens[1], (TokenKind::Value, "A"));
/// assert_eq!(tokens[4], (TokenKind::Separators, ")"));
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    separators: &'a [u8],
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer over the full `input`.
    ///
    /// # Arguments
    /// * `input` - The text to tokenize
    /// * `separators` - ASCII bytes that form separator runs
    pub fn new(input: &'a str, separators: &'a [u8]) -> Self {
        Self::starting_at(input, separators, 0)
    }

    /// Creates a tokenizer that starts at byte offset `offset` of `input`.
    ///
    /// An offset that is not on a char boundary is moved forward to the next
    /// one; an offset past the end yields an empty tokenizer.
    pub fn starting_at(input: &'a str, separators: &'a [u8], offset: usize) -> Self {
        let mut pos = offset.min(input.len());
        while !input.is_char_boundary(pos) {
            pos += 1;
        }
        Self {
            input,
            separators,
            pos,
        }
    }

    /// Returns the byte offset of the next token.
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    fn is_separator(&self, c: char) -> bool {
        c.is_ascii() && self.separators.contains(&(c as u8))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.input[self.pos..];
        let first = rest.chars().next()?;
        let separator_run = self.is_separator(first);

        let len = rest
            .find(|c: char| self.is_separator(c) != separator_run)
            .unwrap_or(rest.len());

        let token = Token {
            kind: if separator_run {
                TokenKind::Separators
            } else {
                TokenKind::Value
            },
            text: &rest[..len],
            position: self.pos,
        };
        self.pos += len;
        Some(token)
    }
}

impl std::iter::FusedIterator for Tokenizer<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    const SEPARATORS: &[u8] = b"(),:;'[]";

    fn texts(input: &str) -> Vec<(TokenKind, &str)> {
        Tokenizer::new(input, SEPARATORS)
            .map(|t| (t.kind(), t.text()))
            .collect()
    }

    #[test]
    fn test_groups_separator_runs() {
        use TokenKind::*;
        assert_eq!(
            texts("((A,B),(C,D));"),
            vec![
                (Separators, "(("),
                (Value, "A"),
                (Separators, ","),
                (Value, "B"),
                (Separators, "),("),
                (Value, "C"),
                (Separators, ","),
                (Value, "D"),
                (Separators, "));"),
            ]
        );
    }

    #[test]
    fn test_values_keep_whitespace_and_numbers() {
        use TokenKind::*;
        assert_eq!(
            texts("Homo sapiens : 0.25e-1\n"),
            vec![
                (Value, "Homo sapiens "),
                (Separators, ":"),
                (Value, " 0.25e-1\n"),
            ]
        );
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let tokens: Vec<_> = Tokenizer::new("(Ä,B)", SEPARATORS).collect();
        assert_eq!(tokens[1].text(), "Ä");
        assert_eq!(tokens[1].position(), 1);
        assert_eq!(tokens[2].position(), 3);
        assert_eq!(tokens[2].end(), 4);
    }

    #[test]
    fn test_empty_input_has_no_tokens() {
        assert_eq!(Tokenizer::new("", SEPARATORS).count(), 0);
    }

    #[test]
    fn test_starting_at_resumes_and_clamps() {
        let input = "(A,B);(C,D);";
        let first = Tokenizer::starting_at(input, SEPARATORS, 6).next().unwrap();
        assert_eq!(first.text(), "(");
        assert_eq!(first.position(), 6);

        assert_eq!(Tokenizer::starting_at(input, SEPARATORS, 100).count(), 0);

        // Offset inside a multi-byte char moves to the next boundary
        let tokens: Vec<_> = Tokenizer::starting_at("Ä(", SEPARATORS, 1).collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text(), "(");
    }
}
