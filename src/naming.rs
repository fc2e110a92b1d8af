//! String transforms shared by flag and environment variable naming.
//!
//! Flag names are camelCase (`curlHeaders`), environment variable names are
//! UPPER_SNAKE_CASE (`MY_CLI_CURL_HEADERS`). Both derive from the same pieces
//! through the functions below.

use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

static UPPER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]+").expect("valid upper-case run regex"));

/// Change the case of the first character only. Empty input is returned as is.
pub fn capitalize_first(s: &str, upper: bool) -> String {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut out = String::with_capacity(s.len());
    if upper {
        out.extend(first.to_uppercase());
    } else {
        out.extend(first.to_lowercase());
    }
    out.push_str(chars.as_str());
    out
}

pub fn first_upper_case(s: &str) -> String {
    capitalize_first(s, true)
}

pub fn first_lower_case(s: &str) -> String {
    capitalize_first(s, false)
}

/// Insert `_` before every run of upper-case letters, keeping the original case.
///
/// A run of consecutive capitals counts as one word (`HTTPServer` stays one
/// word), a leading separator is dropped, hyphens become underscores and
/// doubled underscores collapse.
///
/// ```text
/// listCount        -> list_Count
/// OhPleaseFormatMe -> Oh_Please_Format_Me
/// List-Of_thing    -> List_Of_thing
/// ```
pub fn snake_case(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }

    let snaked = UPPER_RUN.replace_all(s, "_$0");
    let snaked = snaked.strip_prefix('_').unwrap_or(&snaked);

    snaked.replace('-', "_").replace("__", "_")
}

/// [`snake_case`] then upper-case: the environment variable form of a name.
pub fn to_upper_snake_case(s: &str) -> String {
    snake_case(s).to_uppercase()
}

/// SHA-256 of `content` as lowercase hex. Used as a grouping key.
pub fn content_digest(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}
