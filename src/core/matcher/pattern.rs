// src/core/matcher/pattern.rs

//! The compiled form of a path pattern.

use regex::Regex;
use tracing::warn;

/// A path pattern compiled into its most efficient matching form.
///
/// `*` matches any run of characters excluding `/`; `**` matches any run of
/// characters including `/`.
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    /// No wildcard present; plain equality.
    Literal(String),
    /// The pattern ends in `**` and contains no other wildcard; prefix test.
    Prefix(String),
    /// Anything else; an anchored regular expression.
    Wildcard(Regex),
    /// The pattern could not be compiled and matches nothing.
    Invalid,
}

impl CompiledPattern {
    /// Compiles a pattern, picking a fast path where possible.
    pub fn compile(pattern: &str) -> Self {
        if !pattern.contains('*') {
            return CompiledPattern::Literal(pattern.to_string());
        }

        if let Some(head) = pattern.strip_suffix("**") {
            if !head.contains('*') {
                return CompiledPattern::Prefix(head.to_string());
            }
        }

        let mut regex_pattern = String::with_capacity(pattern.len() * 2);
        regex_pattern.push('^');
        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '*' {
                // `**` must be translated before `*`: the double wildcard
                // crosses segment boundaries, the single one does not.
                if chars.peek() == Some(&'*') {
                    chars.next();
                    regex_pattern.push_str(".*");
                } else {
                    regex_pattern.push_str("[^/]*");
                }
            } else {
                regex_pattern.push_str(&regex::escape(&c.to_string()));
            }
        }
        regex_pattern.push('$');

        match Regex::new(&regex_pattern) {
            Ok(regex) => CompiledPattern::Wildcard(regex),
            Err(e) => {
                warn!(r#"Invalid path pattern "{}": {}"#, pattern, e);
                CompiledPattern::Invalid
            }
        }
    }

    /// Checks the compiled pattern against a request path.
    pub fn is_match(&self, path: &str) -> bool {
        match self {
            CompiledPattern::Literal(literal) => path == literal,
            CompiledPattern::Prefix(prefix) => path.starts_with(prefix),
            CompiledPattern::Wildcard(regex) => regex.is_match(path),
            CompiledPattern::Invalid => false,
        }
    }
}
