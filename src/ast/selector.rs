use std::fmt;

use crate::error::ModelError;

/// Name of a selector: a binding to a set of candidate nodes, like a table alias.
///
/// # Example
/// ```text
/// SELECT * FROM [nt:file] AS files
/// //             ^^^^^^^^     ^^^^^ both are selector names
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectorName(String);

impl SelectorName {
    /// Create a selector name; fails if the name is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::required("name"));
        }
        Ok(SelectorName(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SelectorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SelectorName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A selector over the nodes of a named type, optionally aliased.
///
/// # Example
/// ```text
/// [nt:unstructured] AS u
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedSelector {
    name: SelectorName,
    alias: Option<SelectorName>,
}

impl NamedSelector {
    pub fn new(name: SelectorName) -> Self {
        NamedSelector { name, alias: None }
    }

    pub fn with_alias(name: SelectorName, alias: SelectorName) -> Self {
        NamedSelector {
            name,
            alias: Some(alias),
        }
    }

    pub fn name(&self) -> &SelectorName {
        &self.name
    }

    pub fn alias(&self) -> Option<&SelectorName> {
        self.alias.as_ref()
    }

    pub fn has_alias(&self) -> bool {
        self.alias.is_some()
    }

    /// The alias if there is one, otherwise the name.
    pub fn alias_or_name(&self) -> &SelectorName {
        self.alias.as_ref().unwrap_or(&self.name)
    }
}

/// A selector over every node in the content tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AllNodes {
    name: SelectorName,
    alias: Option<SelectorName>,
}

impl AllNodes {
    /// Selector name used when the caller does not supply one.
    pub const DEFAULT_NAME: &'static str = "__ALLNODES__";

    pub fn new() -> Self {
        AllNodes {
            name: SelectorName(Self::DEFAULT_NAME.to_string()),
            alias: None,
        }
    }

    pub fn with_alias(alias: SelectorName) -> Self {
        AllNodes {
            alias: Some(alias),
            ..Self::new()
        }
    }

    pub fn named(name: SelectorName, alias: Option<SelectorName>) -> Self {
        AllNodes { name, alias }
    }

    pub fn name(&self) -> &SelectorName {
        &self.name
    }

    pub fn alias(&self) -> Option<&SelectorName> {
        self.alias.as_ref()
    }

    pub fn has_alias(&self) -> bool {
        self.alias.is_some()
    }

    pub fn alias_or_name(&self) -> &SelectorName {
        self.alias.as_ref().unwrap_or(&self.name)
    }
}

impl Default for AllNodes {
    fn default() -> Self {
        Self::new()
    }
}
