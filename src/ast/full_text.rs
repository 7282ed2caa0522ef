use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{LazyLock, OnceLock},
};

use regex::Regex;
use tracing::debug;

use crate::{
    ast::{SelectorName, operands::required_text},
    error::{FullTextError, ModelError},
    parser,
};

// A wildcard preceded by an even number of backslashes (possibly none) is unescaped.
static UNESCAPED_WILDCARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\\])(?:\\\\)*[*?%_]").expect("wildcard pattern is valid")
});

/// Full-text search constraint: `CONTAINS(sel[.prop],'expression')`.
///
/// The structured [`Term`] is derived from the raw expression on first use
/// and cached; a malformed expression is reported by [`FullTextSearch::term`]
/// and not by the constructor.
#[derive(Debug, Clone)]
pub struct FullTextSearch {
    selector_name: SelectorName,
    property_name: Option<String>,
    expression: String,
    term: OnceLock<Result<Term, FullTextError>>,
}

impl FullTextSearch {
    pub fn new(
        selector_name: SelectorName,
        property_name: Option<String>,
        expression: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let property_name = property_name
            .map(|name| required_text(name, "propertyName"))
            .transpose()?;
        Ok(FullTextSearch {
            selector_name,
            property_name,
            expression: required_text(expression, "fullTextSearchExpression")?,
            term: OnceLock::new(),
        })
    }

    /// Search every property of the selector's nodes.
    pub fn on_selector(selector_name: SelectorName, expression: impl Into<String>) -> Result<Self, ModelError> {
        Self::new(selector_name, None, expression)
    }

    /// Search a single property of the selector's nodes.
    pub fn on_property(
        selector_name: SelectorName,
        property_name: impl Into<String>,
        expression: impl Into<String>,
    ) -> Result<Self, ModelError> {
        Self::new(selector_name, Some(property_name.into()), expression)
    }

    /// Create a search whose term tree has already been parsed.
    pub fn with_term(
        selector_name: SelectorName,
        property_name: Option<String>,
        expression: impl Into<String>,
        term: Term,
    ) -> Result<Self, ModelError> {
        let search = Self::new(selector_name, property_name, expression)?;
        let _ = search.term.set(Ok(term));
        Ok(search)
    }

    pub fn selector_name(&self) -> &SelectorName {
        &self.selector_name
    }

    pub fn property_name(&self) -> Option<&str> {
        self.property_name.as_deref()
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The parsed term tree, computed once per instance.
    pub fn term(&self) -> Result<&Term, FullTextError> {
        self.term
            .get_or_init(|| {
                let parsed = parser::parse_full_text(&self.expression);
                match &parsed {
                    Ok(_) => debug!(expression = %self.expression, "full_text.term.parsed"),
                    Err(error) => {
                        debug!(expression = %self.expression, %error, "full_text.term.invalid")
                    }
                }
                parsed
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl PartialEq for FullTextSearch {
    fn eq(&self, other: &Self) -> bool {
        self.selector_name == other.selector_name
            && self.property_name == other.property_name
            && self.expression == other.expression
    }
}

impl Eq for FullTextSearch {}

impl Hash for FullTextSearch {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.selector_name.hash(state);
        self.property_name.hash(state);
        self.expression.hash(state);
    }
}

/// A node of a parsed full-text search expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A word or phrase
    Simple(SimpleTerm),

    /// A term that must not match (`-term`)
    Negation(NegationTerm),

    /// All terms must match
    Conjunction(Conjunction),

    /// Any term may match (`a OR b`)
    Disjunction(Disjunction),
}

/// A word or phrase to search for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleTerm {
    value: String,
}

impl SimpleTerm {
    pub fn new(value: impl Into<String>) -> Self {
        SimpleTerm {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Phrases (values containing a space) must be quoted when written out.
    pub fn is_quoting_required(&self) -> bool {
        self.value.contains(' ')
    }

    /// Whether the value contains an unescaped `*`, `?`, `%` or `_`.
    pub fn contains_wildcards(&self) -> bool {
        UNESCAPED_WILDCARD.is_match(&self.value)
    }
}

/// A negated term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NegationTerm {
    term: Box<Term>,
}

impl NegationTerm {
    pub fn new(term: Term) -> Self {
        NegationTerm {
            term: Box::new(term),
        }
    }

    pub fn negated_term(&self) -> &Term {
        &self.term
    }
}

macro_rules! compound_term {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Hash)]
            pub struct $name {
                terms: Vec<Term>,
            }

            impl $name {
                /// Fails when `terms` is empty.
                pub fn new(terms: Vec<Term>) -> Result<Self, ModelError> {
                    if terms.is_empty() {
                        return Err(ModelError::required("terms"));
                    }
                    Ok($name { terms })
                }

                pub fn terms(&self) -> &[Term] {
                    &self.terms
                }

                pub fn iter(&self) -> std::slice::Iter<'_, Term> {
                    self.terms.iter()
                }
            }

            impl<'a> IntoIterator for &'a $name {
                type Item = &'a Term;
                type IntoIter = std::slice::Iter<'a, Term>;

                fn into_iter(self) -> Self::IntoIter {
                    self.terms.iter()
                }
            }
        )*
    };
}

compound_term!(
    /// Terms that must all match.
    Conjunction,
    /// Terms of which at least one must match.
    Disjunction,
);

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Simple(term) => term.fmt(f),
            Term::Negation(term) => term.fmt(f),
            Term::Conjunction(term) => term.fmt(f),
            Term::Disjunction(term) => term.fmt(f),
        }
    }
}

impl fmt::Display for SimpleTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_quoting_required() {
            write!(f, "\"{}\"", self.value)
        } else {
            f.write_str(&self.value)
        }
    }
}

impl fmt::Display for NegationTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-{}", self.term)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, terms: &[Term], separator: &str) -> fmt::Result {
    for (index, term) in terms.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{term}")?;
    }
    Ok(())
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.terms, " ")
    }
}

impl fmt::Display for Disjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.terms, " OR ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcards_respect_escapes() {
        assert!(SimpleTerm::new("wild*").contains_wildcards());
        assert!(SimpleTerm::new("_private").contains_wildcards());
        assert!(SimpleTerm::new("50%").contains_wildcards());
        assert!(!SimpleTerm::new(r"wild\*").contains_wildcards());
        assert!(SimpleTerm::new(r"wild\\*").contains_wildcards());
        assert!(!SimpleTerm::new(r"a\_b\%c").contains_wildcards());
        assert!(!SimpleTerm::new("").contains_wildcards());
    }

    #[test]
    fn displays_nested_terms() {
        let term = Term::Disjunction(
            Disjunction::new(vec![
                Term::Conjunction(
                    Conjunction::new(vec![
                        Term::Simple(SimpleTerm::new("foo bar")),
                        Term::Simple(SimpleTerm::new("baz")),
                    ])
                    .unwrap(),
                ),
                Term::Negation(NegationTerm::new(Term::Simple(SimpleTerm::new("qux")))),
            ])
            .unwrap(),
        );
        assert_eq!(term.to_string(), r#""foo bar" baz OR -qux"#);
    }

    #[test]
    fn compound_terms_require_members() {
        assert_eq!(
            Conjunction::new(vec![]),
            Err(ModelError::ArgumentRequired { name: "terms" })
        );
    }
}
