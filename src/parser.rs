use std::mem;

use crate::{
    ast::{Conjunction, Disjunction, NegationTerm, SimpleTerm, Term, Token},
    error::FullTextError,
    lexer::Lexer,
};

/// Parse a full-text search expression into its term tree.
///
/// ```text
/// disjunction := conjunction ("OR" conjunction)*
/// conjunction := term (["AND"] term)*
/// term        := ("-" | "+")+ unit | phrase | quoted
/// unit        := word | quoted
/// phrase      := word+
/// ```
///
/// Adjacent plain words form one phrase, so `red car` is a single
/// [`SimpleTerm`]. A quoted phrase, a negation or `AND` starts a new term.
/// `-` and `+` apply to the next single word or quoted phrase, and a pair of
/// `-` cancels out. Lists with a single member collapse to that member.
pub fn parse_full_text(expression: &str) -> Result<Term, FullTextError> {
    if expression.trim().is_empty() {
        return Err(FullTextError::Empty);
    }
    Parser::new(Lexer::new(expression))?.parse()
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_position: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, FullTextError> {
        let current_token = lexer.next_token()?;
        let current_position = lexer.token_start();
        Ok(Parser {
            lexer,
            current_token,
            current_position,
        })
    }

    fn advance(&mut self) -> Result<Token, FullTextError> {
        let next = self.lexer.next_token()?;
        self.current_position = self.lexer.token_start();
        Ok(mem::replace(&mut self.current_token, next))
    }

    /// Consume an operator token and make sure a term follows it.
    fn expect_term_after(&mut self, operator: &str) -> Result<(), FullTextError> {
        self.advance()?;
        if self.current_token.starts_term() {
            Ok(())
        } else {
            Err(FullTextError::MissingTerm {
                position: self.current_position,
                after: operator.to_string(),
            })
        }
    }

    pub fn parse(mut self) -> Result<Term, FullTextError> {
        if self.current_token == Token::Eof {
            return Err(FullTextError::Empty);
        }
        self.parse_disjunction()
    }

    fn parse_disjunction(&mut self) -> Result<Term, FullTextError> {
        let mut terms = vec![self.parse_conjunction()?];
        while self.current_token == Token::Or {
            self.expect_term_after("OR")?;
            terms.push(self.parse_conjunction()?);
        }
        if terms.len() == 1 {
            return Ok(terms.remove(0));
        }
        Ok(Term::Disjunction(Disjunction::new(terms).map_err(|_| FullTextError::Empty)?))
    }

    fn parse_conjunction(&mut self) -> Result<Term, FullTextError> {
        let mut terms = vec![self.parse_term()?];
        loop {
            match self.current_token {
                Token::And => {
                    self.expect_term_after("AND")?;
                    terms.push(self.parse_term()?);
                }
                _ if self.current_token.starts_term() => terms.push(self.parse_term()?),
                _ => break,
            }
        }
        if terms.len() == 1 {
            return Ok(terms.remove(0));
        }
        Ok(Term::Conjunction(Conjunction::new(terms).map_err(|_| FullTextError::Empty)?))
    }

    fn parse_term(&mut self) -> Result<Term, FullTextError> {
        match &self.current_token {
            Token::Minus | Token::Plus => self.parse_prefixed(),
            Token::Word(_) => self.parse_phrase(),
            Token::Quoted(_) => self.parse_unit(),
            Token::Or | Token::And => Err(self.unexpected_keyword()),
            Token::Eof => Err(FullTextError::Empty),
        }
    }

    /// A run of `-` and `+` prefixes followed by a single unit. An even
    /// number of `-` cancels out, so the result nests at most one negation.
    fn parse_prefixed(&mut self) -> Result<Term, FullTextError> {
        let mut negated = false;
        loop {
            match self.current_token {
                Token::Minus => {
                    negated = !negated;
                    self.expect_term_after("-")?;
                }
                Token::Plus => self.expect_term_after("+")?,
                _ => break,
            }
        }
        let unit = self.parse_unit()?;
        Ok(if negated {
            Term::Negation(NegationTerm::new(unit))
        } else {
            unit
        })
    }

    /// A single word or quoted phrase.
    fn parse_unit(&mut self) -> Result<Term, FullTextError> {
        let value = match &mut self.current_token {
            Token::Word(value) | Token::Quoted(value) => mem::take(value),
            Token::Or | Token::And => return Err(self.unexpected_keyword()),
            _ => return Err(FullTextError::Empty),
        };
        self.advance()?;
        Ok(Term::Simple(SimpleTerm::new(value)))
    }

    fn unexpected_keyword(&self) -> FullTextError {
        FullTextError::UnexpectedKeyword {
            position: self.current_position,
            keyword: self.current_token.to_string(),
        }
    }

    fn parse_phrase(&mut self) -> Result<Term, FullTextError> {
        let mut words = Vec::new();
        while let Token::Word(word) = &mut self.current_token {
            words.push(mem::take(word));
            self.advance()?;
        }
        Ok(Term::Simple(SimpleTerm::new(words.join(" "))))
    }
}
