//! Tokenization of the facet instruction region.
//!
//! Instructions are whitespace-separated words, but line boundaries still
//! matter: a `G` comment runs to the end of its line. Each physical line
//! therefore yields its words followed by an explicit [`Token::Newline`].

/// A token in the instruction region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A whitespace-delimited word.
    Word(String),
    /// End of a physical line.
    Newline,
}

/// Tokenizes instruction text, one [`Token::Newline`] per line.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for line in text.lines() {
        for word in line.split_whitespace() {
            tokens.push(Token::Word(word.to_string()));
        }
        tokens.push(Token::Newline);
    }
    tokens
}
