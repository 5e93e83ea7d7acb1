//! HTTP verbs understood by the router.
//!
//! # Design Decisions
//! - Canonical form is lower-case; parsing is case-insensitive
//! - The allow-list is a single anchored alternation compiled once at startup

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use thiserror::Error;

/// One of the eleven recognized request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    Copy,
    Delete,
    Get,
    Head,
    Link,
    Options,
    Patch,
    Post,
    Purge,
    Put,
    Unlink,
}

impl Method {
    /// Every recognized method, in canonical order.
    pub const ALL: [Method; 11] = [
        Method::Copy,
        Method::Delete,
        Method::Get,
        Method::Head,
        Method::Link,
        Method::Options,
        Method::Patch,
        Method::Post,
        Method::Purge,
        Method::Put,
        Method::Unlink,
    ];

    /// Lower-case canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Copy => "copy",
            Method::Delete => "delete",
            Method::Get => "get",
            Method::Head => "head",
            Method::Link => "link",
            Method::Options => "options",
            Method::Patch => "patch",
            Method::Post => "post",
            Method::Purge => "purge",
            Method::Put => "put",
            Method::Unlink => "unlink",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names none of the recognized methods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Method::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == lower)
            .ok_or(UnknownMethod(s.to_string()))
    }
}

/// Precompiled matcher over the configured method names.
#[derive(Debug, Clone)]
pub struct MethodAllowList {
    /// `None` when nothing is allowed.
    matcher: Option<Regex>,
}

impl MethodAllowList {
    /// Build the alternation `^(?:m1|m2|...)$` from configured names.
    ///
    /// Names are lower-cased and escaped. An empty list produces a matcher
    /// that rejects every method.
    pub fn new<I, S>(methods: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = methods
            .into_iter()
            .map(|m| regex::escape(&m.as_ref().to_ascii_lowercase()))
            .filter(|m| !m.is_empty())
            .collect();

        if names.is_empty() {
            return Ok(Self { matcher: None });
        }

        let matcher = Regex::new(&format!("^(?:{})$", names.join("|")))?;
        Ok(Self {
            matcher: Some(matcher),
        })
    }

    /// True if the lower-cased method is in the allow-list.
    pub fn allows(&self, method: &str) -> bool {
        self.matcher
            .as_ref()
            .map(|m| m.is_match(method))
            .unwrap_or(false)
    }

    pub fn as_str(&self) -> &str {
        self.matcher.as_ref().map(Regex::as_str).unwrap_or("")
    }
}

impl Default for MethodAllowList {
    fn default() -> Self {
        let source = format!(
            "^(?:{})$",
            Method::ALL.iter().map(Method::as_str).collect::<Vec<_>>().join("|")
        );
        Self {
            matcher: Regex::new(&source).ok(),
        }
    }
}
