// src/core/matcher/mod.rs

//! Matching of request paths against ordered path-access rule lists.

mod pattern;
mod rule;

pub use pattern::CompiledPattern;
pub use rule::PathRule;

/// Method assumed when a check supplies none.
pub const DEFAULT_METHOD: &str = "GET";

/// Evaluates ordered rule lists against a request path and method.
///
/// Evaluation never exits early: every rule is checked and the last matching
/// rule wins, so a later, more specific rule can override an earlier, broader
/// one. A method mismatch on a matching rule inverts that rule's assertion,
/// re-asserting the broader intent instead of silently skipping the rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathMatcher;

impl PathMatcher {
    pub fn new() -> Self {
        PathMatcher
    }

    /// Checks whether the rule list claims the provided path and method.
    ///
    /// The method defaults to `GET` and is compared case-insensitively. An
    /// empty rule list claims nothing.
    pub fn matches(&self, path: &str, method: Option<&str>, rules: &[PathRule]) -> bool {
        let method = method.unwrap_or(DEFAULT_METHOD).to_ascii_uppercase();

        let mut result = false;
        for rule in rules {
            if !rule.matches_path(path) {
                continue;
            }

            let mut candidate = !rule.is_negated();
            if !rule.allows_method(&method) {
                candidate = !candidate;
            }

            result = candidate;
        }

        result
    }

    /// True when at least one rule's pattern matches the path, regardless of
    /// negation or method list.
    pub fn has_opinion(&self, path: &str, rules: &[PathRule]) -> bool {
        rules.iter().any(|rule| rule.matches_path(path))
    }
}
