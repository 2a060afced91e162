// src/core/matcher/rule.rs

//! Parsing of a single path-access rule line.

use crate::core::matcher::pattern::CompiledPattern;
use once_cell::sync::OnceCell;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// One line of a path-access policy: a glob pattern, an optional leading
/// negation flag (`!`) and an optional trailing method allow-list
/// (`[GET,POST]`).
///
/// A rule is immutable once created. The pattern is compiled on first use and
/// the compiled form is cached for the lifetime of the rule. Serde round-trips
/// a rule through its raw string form.
#[derive(Debug, Clone)]
pub struct PathRule {
    raw: String,
    negated: bool,
    pattern: String,
    methods: Option<HashSet<String>>,
    compiled: OnceCell<CompiledPattern>,
}

impl PathRule {
    /// Parses a raw rule line.
    ///
    /// An absent method list means all methods; method names are normalized
    /// to upper case.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let mut rest = raw.as_str();

        let negated = match rest.strip_prefix('!') {
            Some(stripped) => {
                rest = stripped.trim_start();
                true
            }
            None => false,
        };

        let mut methods = None;
        if rest.ends_with(']') {
            if let Some(open) = rest.rfind('[') {
                let list: HashSet<String> = rest[open + 1..rest.len() - 1]
                    .split(',')
                    .map(|method| method.trim().to_ascii_uppercase())
                    .filter(|method| !method.is_empty())
                    .collect();
                methods = Some(list);
                rest = rest[..open].trim_end();
            }
        }

        let pattern = rest.to_string();
        PathRule {
            raw,
            negated,
            pattern,
            methods,
            compiled: OnceCell::new(),
        }
    }

    /// The rule line as it was written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The pattern with negation flag and method list stripped.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// True when the rule carries a leading `!`.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// True when the rule has no method list or `method` is in it.
    /// Expects an upper-cased method.
    pub fn allows_method(&self, method: &str) -> bool {
        match &self.methods {
            None => true,
            Some(methods) => methods.contains(method),
        }
    }

    /// Checks the rule's pattern (negation and methods aside) against a path.
    pub fn matches_path(&self, path: &str) -> bool {
        self.compiled
            .get_or_init(|| CompiledPattern::compile(&self.pattern))
            .is_match(path)
    }
}

impl PartialEq for PathRule {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for PathRule {}

impl fmt::Display for PathRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for PathRule {
    fn from(raw: &str) -> Self {
        PathRule::parse(raw)
    }
}

impl Serialize for PathRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for PathRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(PathRule::parse(&raw))
    }
}
