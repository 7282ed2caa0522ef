use crate::{ast::Token, error::FullTextError};

/// Tokenizer for full-text search expressions.
///
/// Backslash escapes are kept in word and phrase values (so `wild\*` still
/// carries its escaped wildcard), except that an escaped closing quote
/// inside a phrase is unescaped.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    token_start: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            token_start: 0,
        }
    }

    /// Character offset where the most recently returned token begins.
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            match ch {
                c if c.is_whitespace() || c == '"' => break,
                '\\' => {
                    result.push(ch);
                    self.advance();
                    if let Some(escaped) = self.current_char() {
                        result.push(escaped);
                        self.advance();
                    }
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }
        result
    }

    fn read_quoted(&mut self, quote: char) -> Result<String, FullTextError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some(c) if c == quote => result.push(c),
                        Some(c) => {
                            result.push('\\');
                            result.push(c);
                        }
                        None => break,
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(FullTextError::UnterminatedQuote { position: start })
    }

    pub fn next_token(&mut self) -> Result<Token, FullTextError> {
        self.skip_whitespace();
        self.token_start = self.position;

        let token = match self.current_char() {
            None => Token::Eof,
            Some(quote @ ('"' | '\'')) => Token::Quoted(self.read_quoted(quote)?),
            Some('-') => {
                self.advance();
                Token::Minus
            }
            Some('+') => {
                self.advance();
                Token::Plus
            }
            Some(_) => {
                let word = self.read_word();
                match word.as_str() {
                    "OR" => Token::Or,
                    "AND" => Token::And,
                    _ => Token::Word(word),
                }
            }
        };
        Ok(token)
    }

    /// Tokenize the whole input, ending with [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<Token>, FullTextError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}
