// tests/parser_tests.rs

use aqm::FullTextError;
use aqm::ast::{FullTextSearch, SelectorName, SimpleTerm, Term};
use aqm::parser::parse_full_text;

fn parse(expression: &str) -> Term {
    parse_full_text(expression).unwrap()
}

fn simple(term: &Term) -> &SimpleTerm {
    match term {
        Term::Simple(simple) => simple,
        other => panic!("Expected a simple term, got {:?}", other),
    }
}

// ============================================================================
// Simple terms
// ============================================================================

#[test]
fn test_single_word() {
    let term = parse("foo");
    let simple = simple(&term);
    assert_eq!(simple.value(), "foo");
    assert!(!simple.is_quoting_required());
    assert!(!simple.contains_wildcards());
}

#[test]
fn test_adjacent_words_form_a_phrase() {
    let term = parse("foo bar");
    let simple = simple(&term);
    assert_eq!(simple.value(), "foo bar");
    assert!(simple.is_quoting_required());
}

#[test]
fn test_quoted_phrase() {
    let term = parse(r#""red sports car""#);
    assert_eq!(simple(&term).value(), "red sports car");
    assert_eq!(term.to_string(), r#""red sports car""#);
}

#[test]
fn test_wildcards() {
    assert!(simple(&parse("jcr*")).contains_wildcards());
    assert!(simple(&parse("te?t")).contains_wildcards());
    assert!(!simple(&parse(r"jcr\*")).contains_wildcards());
}

#[test]
fn test_plus_is_ignored() {
    assert_eq!(parse("+foo"), parse("foo"));
}

// ============================================================================
// Compound terms
// ============================================================================

#[test]
fn test_negation() {
    match parse("-foo") {
        Term::Negation(negation) => {
            assert_eq!(simple(negation.negated_term()).value(), "foo");
        }
        other => panic!("Expected negation, got {:?}", other),
    }
}

#[test]
fn test_negation_binds_one_word() {
    match parse("foo -bar baz") {
        Term::Conjunction(conjunction) => {
            assert_eq!(conjunction.terms().len(), 3);
            assert!(matches!(conjunction.terms()[1], Term::Negation(_)));
            assert_eq!(simple(&conjunction.terms()[2]).value(), "baz");
        }
        other => panic!("Expected conjunction, got {:?}", other),
    }
}

#[test]
fn test_explicit_and() {
    match parse("foo AND bar") {
        Term::Conjunction(conjunction) => {
            let values: Vec<_> = conjunction.iter().map(|t| simple(t).value()).collect();
            assert_eq!(values, ["foo", "bar"]);
        }
        other => panic!("Expected conjunction, got {:?}", other),
    }
}

#[test]
fn test_quoted_phrase_separates_terms() {
    let term = parse(r#"jcr "content repository""#);
    match &term {
        Term::Conjunction(conjunction) => assert_eq!(conjunction.terms().len(), 2),
        other => panic!("Expected conjunction, got {:?}", other),
    }
    assert_eq!(term.to_string(), r#"jcr "content repository""#);
}

#[test]
fn test_or_binds_looser_than_and() {
    let term = parse("a AND b OR c");
    match &term {
        Term::Disjunction(disjunction) => {
            assert_eq!(disjunction.terms().len(), 2);
            assert!(matches!(disjunction.terms()[0], Term::Conjunction(_)));
            assert_eq!(simple(&disjunction.terms()[1]).value(), "c");
        }
        other => panic!("Expected disjunction, got {:?}", other),
    }
    assert_eq!(term.to_string(), "a b OR c");
}

#[test]
fn test_display_round_trips_structure() {
    for expression in ["foo", "-foo", r#""a b" -c"#, "a OR b OR -c", "x y OR z"] {
        let term = parse(expression);
        assert_eq!(parse(&term.to_string()), term, "expression: {expression}");
    }
}

// ============================================================================
// Prefix runs
// ============================================================================

#[test]
fn test_paired_negations_cancel() {
    assert_eq!(parse("--foo"), parse("foo"));
    assert_eq!(parse("-+-foo"), parse("foo"));
    assert_eq!(parse("---foo"), parse("-foo"));
    assert_eq!(parse("bar --foo").to_string(), "bar foo");
}

#[test]
fn test_long_prefix_runs() {
    let even = format!("{}x", "-".repeat(10_000));
    assert_eq!(parse(&even), parse("x"));

    let odd = format!("{}x", "-".repeat(10_001));
    assert_eq!(parse(&odd), parse("-x"));

    let mixed = format!("{}\"a b\"", "+-".repeat(10_001));
    assert_eq!(parse(&mixed), parse("-\"a b\""));

    let dangling = "-".repeat(20_000);
    assert_eq!(
        parse_full_text(&dangling),
        Err(FullTextError::MissingTerm {
            position: 20_000,
            after: "-".to_string()
        })
    );
}

#[test]
fn test_constraint_term_with_long_prefix_run() {
    let expression = format!("{}report", "-".repeat(15_001));
    let search = FullTextSearch::on_selector(SelectorName::new("doc").unwrap(), expression).unwrap();
    assert!(matches!(search.term(), Ok(Term::Negation(_))));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_empty_expression() {
    assert_eq!(parse_full_text(""), Err(FullTextError::Empty));
    assert_eq!(parse_full_text("   "), Err(FullTextError::Empty));
}

#[test]
fn test_dangling_operators() {
    assert_eq!(
        parse_full_text("foo -"),
        Err(FullTextError::MissingTerm {
            position: 5,
            after: "-".to_string()
        })
    );
    assert_eq!(
        parse_full_text("foo OR"),
        Err(FullTextError::MissingTerm {
            position: 6,
            after: "OR".to_string()
        })
    );
    assert!(matches!(
        parse_full_text("foo AND OR bar"),
        Err(FullTextError::MissingTerm { .. })
    ));
}

#[test]
fn test_leading_keyword() {
    assert_eq!(
        parse_full_text("OR foo"),
        Err(FullTextError::UnexpectedKeyword {
            position: 0,
            keyword: "OR".to_string()
        })
    );
}

// ============================================================================
// Lazy term on the constraint
// ============================================================================

#[test]
fn test_constraint_term_is_parsed_on_demand() {
    let search = FullTextSearch::on_property(SelectorName::new("sel").unwrap(), "prop", "foo bar").unwrap();
    let term = search.term().unwrap();
    assert!(simple(term).is_quoting_required());
    assert!(std::ptr::eq(term, search.term().unwrap()));
}

#[test]
fn test_constraint_reports_invalid_expression_lazily() {
    let search = FullTextSearch::on_selector(SelectorName::new("sel").unwrap(), "\"open").unwrap();
    assert_eq!(
        search.term(),
        Err(FullTextError::UnterminatedQuote { position: 0 })
    );
    assert!(search.term().is_err());
}

#[test]
fn test_constraint_with_pre_parsed_term() {
    let term = Term::Simple(SimpleTerm::new("anything"));
    let search = FullTextSearch::with_term(
        SelectorName::new("sel").unwrap(),
        None,
        "ignored by the cache",
        term.clone(),
    )
    .unwrap();
    assert_eq!(search.term(), Ok(&term));
}
