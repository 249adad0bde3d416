use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

pub mod buckets;
pub mod config;
pub mod error;
pub mod histogram;
pub mod registry;
pub mod validator;

pub use buckets::{
    DEFAULT_BUCKETS, exponential_buckets, exponential_buckets_range, linear_buckets,
};
pub use config::{BucketLayout, HistogramConfig, RegistryConfig};
pub use error::{Error, Result};
pub use histogram::HistogramStatic;
pub use registry::Registry;
pub use validator::{add_tag, split_identifier, validate_boundaries, validate_identifier};

/// A structured set of tags, written as `key="value"` pairs separated by commas.
pub trait Tags {
    fn fmt_tags(&self, f: &mut Formatter<'_>) -> fmt::Result;
}

impl Tags for () {
    fn fmt_tags(&self, _f: &mut Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

struct TagList<'a, T: ?Sized>(&'a T);

impl<T: Tags + ?Sized> Display for TagList<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt_tags(f)
    }
}

/// Builds the identifier `root{tags}`, or just `root` when `tags` is empty.
///
/// ```
/// use strata_core::identifier;
///
/// assert_eq!(identifier("requests", &()), "requests");
/// ```
pub fn identifier<T: Tags + ?Sized>(root: &str, tags: &T) -> String {
    let tags = TagList(tags).to_string();
    if tags.is_empty() {
        root.to_string()
    } else {
        format!("{root}{{{tags}}}")
    }
}

#[cfg(not(feature = "no-escaping"))]
pub fn escape_tag_value(s: &str) -> Cow<'_, str> {
    // Fast path: check if escaping is needed
    if !s.chars().any(|ch| matches!(ch, '"' | '\\' | '\n')) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 2);
    for ch in s.chars() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            _ => result.push(ch),
        }
    }
    Cow::Owned(result)
}

#[cfg(feature = "no-escaping")]
#[inline(always)]
pub fn escape_tag_value(s: &str) -> Cow<'_, str> {
    Cow::Borrowed(s)
}
