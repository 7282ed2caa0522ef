// tests/lexer_tests.rs

use aqm::FullTextError;
use aqm::ast::Token;
use aqm::lexer::Lexer;

fn tokens(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize().unwrap()
}

fn word(text: &str) -> Token {
    Token::Word(text.to_string())
}

#[test]
fn test_words_and_whitespace() {
    assert_eq!(
        tokens("  foo\tbar \n baz "),
        vec![word("foo"), word("bar"), word("baz"), Token::Eof]
    );
}

#[test]
fn test_empty_input() {
    assert_eq!(tokens(""), vec![Token::Eof]);
    assert_eq!(tokens("   "), vec![Token::Eof]);
}

#[test]
fn test_quoted_phrases() {
    assert_eq!(
        tokens(r#""red car" 'blue bike'"#),
        vec![
            Token::Quoted("red car".to_string()),
            Token::Quoted("blue bike".to_string()),
            Token::Eof
        ]
    );
}

#[test]
fn test_prefix_operators() {
    assert_eq!(
        tokens("-foo +bar"),
        vec![Token::Minus, word("foo"), Token::Plus, word("bar"), Token::Eof]
    );
}

#[test]
fn test_hyphen_inside_word_is_not_an_operator() {
    assert_eq!(tokens("e-mail"), vec![word("e-mail"), Token::Eof]);
}

#[test]
fn test_keywords_are_upper_case_only() {
    assert_eq!(
        tokens("a OR b AND c or and"),
        vec![
            word("a"),
            Token::Or,
            word("b"),
            Token::And,
            word("c"),
            word("or"),
            word("and"),
            Token::Eof
        ]
    );
}

#[test]
fn test_escapes_are_kept() {
    assert_eq!(tokens(r"wild\*"), vec![word(r"wild\*"), Token::Eof]);
    assert_eq!(
        tokens(r#""50\% off""#),
        vec![Token::Quoted(r"50\% off".to_string()), Token::Eof]
    );
}

#[test]
fn test_escaped_quote_inside_phrase() {
    assert_eq!(
        tokens(r#""say \"hi\"""#),
        vec![Token::Quoted(r#"say "hi""#.to_string()), Token::Eof]
    );
}

#[test]
fn test_unterminated_quote() {
    assert_eq!(
        Lexer::new(r#"foo "bar"#).tokenize(),
        Err(FullTextError::UnterminatedQuote { position: 4 })
    );
}

#[test]
fn test_token_start_positions() {
    let mut lexer = Lexer::new("ab  -cd");
    assert_eq!(lexer.next_token().unwrap(), word("ab"));
    assert_eq!(lexer.token_start(), 0);
    assert_eq!(lexer.next_token().unwrap(), Token::Minus);
    assert_eq!(lexer.token_start(), 4);
    assert_eq!(lexer.next_token().unwrap(), word("cd"));
    assert_eq!(lexer.token_start(), 5);
}
