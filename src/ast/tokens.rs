use std::fmt;

/// Lexical tokens of a full-text search expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Unquoted word
    ///
    /// # Examples
    /// ```text
    /// jcr
    /// wild*
    /// e-mail
    /// ```
    Word(String),

    /// Phrase enclosed in double or single quotes, without the quotes
    ///
    /// # Examples
    /// ```text
    /// "red sports car"
    /// 'exact phrase'
    /// ```
    Quoted(String),

    /// `-` before a term: the term must not match
    Minus,

    /// `+` before a term: accepted and ignored
    Plus,

    /// Disjunction keyword (`OR`, upper case only)
    Or,

    /// Optional conjunction keyword (`AND`, upper case only)
    And,

    /// End of input
    Eof,
}

impl Token {
    /// Whether a term may begin with this token.
    pub fn starts_term(&self) -> bool {
        matches!(self, Token::Word(_) | Token::Quoted(_) | Token::Minus | Token::Plus)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(word) => f.write_str(word),
            Token::Quoted(phrase) => write!(f, "\"{phrase}\""),
            Token::Minus => f.write_str("-"),
            Token::Plus => f.write_str("+"),
            Token::Or => f.write_str("OR"),
            Token::And => f.write_str("AND"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}
