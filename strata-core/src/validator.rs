//! Metric identifier grammar.
//!
//! ```text
//! identifier := name ['{' [tag (',' [' '] tag)*] '}']
//! tag        := name '=' '"' escaped '"'
//! name       := [A-Za-z_:.][A-Za-z0-9_:.]*
//! ```
//!
//! Identifiers are kept as text. Tags are never parsed into a map, so their
//! order and escaping survive untouched through [`add_tag`] and
//! [`split_identifier`].

use crate::error::{Error, Result};

/// Validates a metric identifier such as `foo` or `foo{bar="baz",x="y"}`.
pub fn validate_identifier(s: &str) -> Result<()> {
    if s.is_empty() {
        return Err(Error::Grammar("metric cannot be empty".into()));
    }
    let Some(n) = s.find('{') else {
        return validate_name(s);
    };
    let name = &s[..n];
    validate_name(name)?;
    let Some(tags) = s[n + 1..].strip_suffix('}') else {
        return Err(Error::Grammar(format!(
            "missing closing curly brace at the end of {name:?}"
        )));
    };
    validate_tags(tags)
}

fn validate_tags(mut s: &str) -> Result<()> {
    if s.is_empty() {
        return Ok(());
    }
    loop {
        let Some(n) = s.find('=') else {
            return Err(Error::Grammar(format!("missing `=` after {s:?}")));
        };
        let key = &s[..n];
        s = &s[n + 1..];
        validate_name(key)?;

        let Some(value) = s.strip_prefix('"') else {
            return Err(Error::Grammar(format!(
                "missing starting `\"` for {key:?} value; tail={s:?}"
            )));
        };
        let Some(end) = closing_quote(value) else {
            return Err(Error::Grammar(format!(
                "missing trailing `\"` for {key:?} value; tail={value:?}"
            )));
        };
        s = &value[end + 1..];
        if s.is_empty() {
            return Ok(());
        }

        let Some(rest) = s.strip_prefix(',') else {
            return Err(Error::Grammar(format!(
                "missing `,` after {key:?} value; tail={s:?}"
            )));
        };
        s = rest.strip_prefix(' ').unwrap_or(rest);
    }
}

/// Returns the offset of the first `"` in `s` that is not escaped.
///
/// A quote preceded by an odd run of backslashes is part of the value.
fn closing_quote(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut from = 0;
    loop {
        let n = from + bytes[from..].iter().position(|&b| b == b'"')?;
        let backslashes = bytes[..n].iter().rev().take_while(|&&b| b == b'\\').count();
        if backslashes % 2 == 0 {
            return Some(n);
        }
        from = n + 1;
    }
}

fn validate_name(s: &str) -> Result<()> {
    let mut bytes = s.bytes();
    let valid = match bytes.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || matches!(first, b'_' | b':' | b'.'))
                && bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b':' | b'.'))
        }
        None => false,
    };
    if !valid {
        return Err(Error::Grammar(format!("invalid identifier {s:?}")));
    }
    Ok(())
}

/// Splits an identifier into its bare name and its literal `{...}` tag list.
///
/// The tag list keeps its braces and is empty when the identifier has none.
/// Nothing is validated.
pub fn split_identifier(s: &str) -> (&str, &str) {
    match s.find('{') {
        Some(n) => s.split_at(n),
        None => (s, ""),
    }
}

/// Appends `tag` as the last entry of the identifier's tag list, creating the
/// list when the identifier has none.
///
/// ```
/// use strata_core::add_tag;
///
/// assert_eq!(add_tag("m", r#"le="1""#), r#"m{le="1"}"#);
/// assert_eq!(add_tag("m{}", r#"le="1""#), r#"m{le="1"}"#);
/// assert_eq!(add_tag(r#"m{a="b"}"#, r#"le="1""#), r#"m{a="b",le="1"}"#);
/// ```
pub fn add_tag(identifier: &str, tag: &str) -> String {
    let Some(head) = identifier.strip_suffix('}') else {
        return format!("{identifier}{{{tag}}}");
    };
    if head.ends_with('{') {
        format!("{head}{tag}}}")
    } else {
        format!("{head},{tag}}}")
    }
}

/// Validates histogram upper bounds.
///
/// Every bound must be finite and non-negative, and strictly greater than its
/// predecessor.
pub fn validate_boundaries(bounds: &[f64]) -> Result<()> {
    for (i, &v) in bounds.iter().enumerate() {
        if v.is_nan() || v < 0.0 {
            return Err(Error::InvalidBuckets(format!(
                "buckets must be non-negative and not NaN: {v}"
            )));
        }
        if v.is_infinite() {
            return Err(Error::InvalidBuckets(format!(
                "buckets must be finite, the +Inf bucket is implicit: {v}"
            )));
        }
        if let Some(&next) = bounds.get(i + 1) {
            if v >= next {
                return Err(Error::InvalidBuckets(format!(
                    "buckets must be sorted in increasing order: {v} >= {next}"
                )));
            }
        }
    }
    Ok(())
}
