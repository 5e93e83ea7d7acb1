//! Lexical URL path cleaning.
//!
//! Applied to templates before compilation and to request paths before
//! matching, so both sides agree on one canonical spelling. Request paths
//! are percent-decoded first.

use std::str::Utf8Error;

use percent_encoding::percent_decode_str;

/// Percent-decode a raw request path. Fails if the bytes are not UTF-8.
pub fn decode_path(raw: &str) -> Result<String, Utf8Error> {
    percent_decode_str(raw).decode_utf8().map(|decoded| decoded.into_owned())
}

/// Returns the canonical form of a URL path.
///
/// - Adds a leading `/` if missing
/// - Collapses runs of `/`
/// - Removes `.` elements and resolves `..` against the preceding element
/// - A `..` at the root is dropped
/// - A trailing slash survives only if the input had one (or ended in `.`/`..`)
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut trailing = path.len() > 1 && path.ends_with('/');
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len() - 1;
    let mut stack: Vec<&str> = Vec::with_capacity(segments.len());

    for (i, segment) in segments.iter().enumerate() {
        match *segment {
            "" => {}
            "." => trailing |= i == last,
            ".." => {
                stack.pop();
                trailing |= i == last;
            }
            s => stack.push(s),
        }
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    cleaned.push('/');
    cleaned.push_str(&stack.join("/"));
    if trailing && cleaned.len() > 1 {
        cleaned.push('/');
    }
    cleaned
}
