//! Route template compilation.
//!
//! A template such as `/users/{userID}/posts` becomes the anchored regex
//! `^/users/(?P<userID>[^/#?]+)/posts/?$`. Identical templates always yield
//! identical regex source text, which the router relies on to merge bindings.

use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

/// Character class a placeholder may consume.
const PLACEHOLDER_CLASS: &str = "[^/#?]+";

/// Errors raised while compiling a route template.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A `{` without a matching `}`.
    #[error("unterminated placeholder in template {0:?}")]
    Unterminated(String),

    /// The placeholder name is empty.
    #[error("empty placeholder name in template {0:?}")]
    EmptyName(String),

    /// The generated regex was rejected (e.g. invalid or duplicate group name).
    #[error("invalid template {template:?}: {source}")]
    Regex {
        template: String,
        #[source]
        source: regex::Error,
    },
}

/// Extracted path parameters: placeholder name to raw matched text.
pub type PathParams = HashMap<String, String>;

/// A compiled route template.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    /// Capture group names in order; `None` for unnamed groups (group 0 included).
    names: Vec<Option<String>>,
}

impl Pattern {
    /// Compile a template into an anchored matcher.
    pub fn compile(template: &str) -> Result<Self, PatternError> {
        let source = to_regex_source(template)?;
        let regex = Regex::new(&source).map_err(|source| PatternError::Regex {
            template: template.to_string(),
            source,
        })?;
        let names = regex
            .capture_names()
            .map(|n| n.map(str::to_string))
            .collect();

        Ok(Self { regex, names })
    }

    /// Regex source text; equal for equal templates.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Placeholder names in declaration order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().filter_map(|n| n.as_deref())
    }

    pub fn has_params(&self) -> bool {
        self.param_names().next().is_some()
    }

    /// True if the whole path matches.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match the whole path and collect named groups.
    ///
    /// Returns `None` on mismatch, `Some(None)` on a match against a pattern
    /// without placeholders, `Some(Some(params))` otherwise.
    pub fn captures(&self, path: &str) -> Option<Option<PathParams>> {
        let caps = self.regex.captures(path)?;

        // Whole-path match only.
        if caps.get(0).map(|m| m.as_str()) != Some(path) {
            return None;
        }

        if !self.has_params() {
            return Some(None);
        }

        let params = self
            .param_names()
            .filter_map(|name| {
                caps.name(name)
                    .map(|m| (name.to_string(), m.as_str().to_string()))
            })
            .collect();
        Some(Some(params))
    }
}

/// Translate a template into regex source without compiling it.
fn to_regex_source(template: &str) -> Result<String, PatternError> {
    let body = if template.len() > 1 {
        template.strip_suffix('/').unwrap_or(template)
    } else if template == "/" {
        ""
    } else {
        template
    };

    let mut source = String::with_capacity(body.len() + 16);
    source.push('^');

    let mut rest = body;
    while let Some(open) = rest.find('{') {
        source.push_str(&regex::escape(&rest[..open]));

        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| PatternError::Unterminated(template.to_string()))?;
        let name = &after[..close];
        if name.is_empty() {
            return Err(PatternError::EmptyName(template.to_string()));
        }

        source.push_str("(?P<");
        source.push_str(name);
        source.push('>');
        source.push_str(PLACEHOLDER_CLASS);
        source.push(')');

        rest = &after[close + 1..];
    }
    source.push_str(&regex::escape(rest));
    source.push_str("/?$");

    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_named_segment() {
        let pattern = Pattern::compile("/example/{userID}").unwrap();
        assert_eq!(pattern.as_str(), "^/example/(?P<userID>[^/#?]+)/?$");

        let params = pattern.captures("/example/1").unwrap().unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params["userID"], "1");

        assert!(pattern.captures("/example/1/").is_some());
        assert!(pattern.captures("/example/1/extra").is_none());
        assert!(pattern.captures("/example/").is_none());
        assert!(pattern.captures("/prefix/example/1").is_none());
    }

    #[test]
    fn test_compile_literal_only() {
        let pattern = Pattern::compile("/health").unwrap();
        assert_eq!(pattern.as_str(), "^/health/?$");
        assert!(!pattern.has_params());
        assert_eq!(pattern.captures("/health"), Some(None));
        assert_eq!(pattern.captures("/health/"), Some(None));
        assert_eq!(pattern.captures("/healthz"), None);
    }

    #[test]
    fn test_compile_root() {
        let pattern = Pattern::compile("/").unwrap();
        assert_eq!(pattern.as_str(), "^/?$");
        assert!(pattern.is_match("/"));
        assert!(!pattern.is_match("/a"));
    }

    #[test]
    fn test_literals_are_escaped() {
        let pattern = Pattern::compile("/files/{name}.txt").unwrap();
        let params = pattern.captures("/files/report.txt").unwrap().unwrap();
        assert_eq!(params["name"], "report");
        assert!(pattern.captures("/files/reportxtxt").is_none());
    }

    #[test]
    fn test_placeholder_excludes_reserved_chars() {
        let pattern = Pattern::compile("/a/{x}").unwrap();
        assert!(!pattern.is_match("/a/b#c"));
        assert!(!pattern.is_match("/a/b?c"));
        assert!(!pattern.is_match("/a/b/c"));
    }

    #[test]
    fn test_multiple_params() {
        let pattern = Pattern::compile("/example/{userID}/profile/{profileID}").unwrap();
        let names: Vec<&str> = pattern.param_names().collect();
        assert_eq!(names, vec!["userID", "profileID"]);

        let params = pattern.captures("/example/7/profile/42").unwrap().unwrap();
        assert_eq!(params["userID"], "7");
        assert_eq!(params["profileID"], "42");
    }

    #[test]
    fn test_deterministic() {
        let a = Pattern::compile("/x/{id}/y").unwrap();
        let b = Pattern::compile("/x/{id}/y/").unwrap();
        assert_eq!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_malformed_templates() {
        assert!(matches!(
            Pattern::compile("/a/{id"),
            Err(PatternError::Unterminated(_))
        ));
        assert!(matches!(
            Pattern::compile("/a/{}"),
            Err(PatternError::EmptyName(_))
        ));
        assert!(matches!(
            Pattern::compile("/a/{bad name}"),
            Err(PatternError::Regex { .. })
        ));
        assert!(matches!(
            Pattern::compile("/a/{id}/{id}"),
            Err(PatternError::Regex { .. })
        ));
    }
}
